mod common;

use common::{Failure, Harness};
use shared::{
    domain::requests::{ApprovePaymentRequest, CreateReservationRequest},
    errors::{ErrorKind, GatewayError, ServiceError},
    model::{
        payment::PaymentStatus,
        reservation::{AbandonOutcome, ReservationStatus},
    },
};

fn booking_request(quantity: i32) -> CreateReservationRequest {
    CreateReservationRequest {
        lesson_id: 1,
        quantity,
    }
}

fn approval(reservation_id: i64) -> ApprovePaymentRequest {
    ApprovePaymentRequest {
        reservation_id,
        pg_token: "pg-token".into(),
    }
}

#[tokio::test]
async fn create_starts_pending_and_ready() {
    let harness = Harness::new().await;

    let booking = harness.reservations.create(1, 1, 2).await.unwrap();

    assert_eq!(booking.reservation.status, ReservationStatus::Pending);
    assert_eq!(booking.payment.status, PaymentStatus::Ready);
    assert_eq!(booking.payment.total_amount, 20000);
    assert_eq!(booking.payment.cancel_available_amount.total, 20000);
    assert!(booking.payment.canceled_amount.is_zero());
}

#[tokio::test]
async fn create_rejects_non_positive_quantity() {
    let harness = Harness::new().await;

    let err = harness.reservations.create(1, 1, 0).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidQuantity(0)));
    assert!(harness.store.all().await.is_empty());
}

#[tokio::test]
async fn create_for_missing_lesson_is_not_found() {
    let harness = Harness::new().await;

    let err = harness.reservations.create(1, 99, 1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn request_payment_attaches_provider_tid() {
    let harness = Harness::new().await;

    let response = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap();

    let id = response.data.reservation.id;
    assert!(response.data.redirect_url.contains(&format!("T{id}")));

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.payment.tid.as_deref(), Some(format!("T{id}").as_str()));
    assert_eq!(stored.reservation.status, ReservationStatus::Pending);
}

#[tokio::test]
async fn failed_prepare_closes_reservation() {
    let harness = Harness::new().await;
    harness.gateway.fail_prepare(Failure::Unavailable);

    let err = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GatewayUnavailable);

    let stored = harness.store.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].reservation.status, ReservationStatus::Canceled);
    assert_eq!(stored[0].payment.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn approve_confirms_reservation() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(2))
        .await
        .unwrap()
        .data
        .reservation
        .id;

    let response = harness.checkout.approve_payment(&approval(id)).await.unwrap();

    assert_eq!(response.data.status, ReservationStatus::Confirmed);
    assert_eq!(response.data.payment.status, PaymentStatus::Approved);
    assert_eq!(response.data.payment.cancel_available_amount.total, 20000);
}

#[tokio::test]
async fn double_confirm_is_not_pending_and_changes_nothing() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap()
        .data
        .reservation
        .id;
    harness.checkout.approve_payment(&approval(id)).await.unwrap();
    let before = harness.reservations.find_by_id(id).await.unwrap();

    let err = harness
        .checkout
        .approve_payment(&approval(id))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotPending { .. }));
    assert_eq!(harness.gateway.approve_calls(), 1);
    assert_eq!(harness.reservations.find_by_id(id).await.unwrap(), before);
}

#[tokio::test]
async fn approve_timeout_leaves_checkout_open() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap()
        .data
        .reservation
        .id;
    harness.gateway.fail_approve(Failure::Unavailable);

    let err = harness
        .checkout
        .approve_payment(&approval(id))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Gateway(GatewayError::Unavailable(_))
    ));

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::Pending);
    assert_eq!(stored.payment.status, PaymentStatus::Ready);
}

#[tokio::test]
async fn rejected_approval_cancels_reservation() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap()
        .data
        .reservation
        .id;
    harness.gateway.fail_approve(Failure::Rejected);

    let err = harness
        .checkout
        .approve_payment(&approval(id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GatewayRejected);

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::Canceled);
    assert_eq!(stored.payment.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn user_leaving_checkout_marks_quit() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap()
        .data
        .reservation
        .id;

    let response = harness
        .checkout
        .abandon_payment(id, AbandonOutcome::Quit)
        .await
        .unwrap();
    assert_eq!(response.data.status, ReservationStatus::Canceled);
    assert_eq!(response.data.payment.status, PaymentStatus::Quit);

    let err = harness
        .checkout
        .approve_payment(&approval(id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotPending { .. }));
}

#[tokio::test]
async fn lost_race_is_retried_once() {
    let harness = Harness::new().await;
    let id = harness
        .checkout
        .request_payment(1, &booking_request(1))
        .await
        .unwrap()
        .data
        .reservation
        .id;

    harness.racing.lose_next_saves(1);
    let response = harness.checkout.approve_payment(&approval(id)).await.unwrap();
    assert_eq!(response.data.status, ReservationStatus::Confirmed);
}

#[tokio::test]
async fn losing_twice_surfaces_conflict() {
    let harness = Harness::new().await;
    let booking = harness.reservations.create(1, 1, 1).await.unwrap();

    harness.racing.lose_next_saves(2);
    let err = harness
        .reservations
        .abandon(booking.id(), AbandonOutcome::Quit)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceConflict);
    let stored = harness.reservations.find_by_id(booking.id()).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::Pending);
}

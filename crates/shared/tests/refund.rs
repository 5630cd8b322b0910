mod common;

use common::{Failure, Harness};
use shared::{
    config::{Claims, TokenType},
    domain::requests::{ApprovePaymentRequest, CreateReservationRequest, RefundRequest},
    errors::{ErrorKind, ServiceError},
    model::{payment::PaymentStatus, reservation::ReservationStatus, user::Role},
};

async fn confirmed_booking(harness: &Harness, quantity: i32) -> i64 {
    let id = harness
        .checkout
        .request_payment(
            1,
            &CreateReservationRequest {
                lesson_id: 1,
                quantity,
            },
        )
        .await
        .unwrap()
        .data
        .reservation
        .id;
    harness
        .checkout
        .approve_payment(&ApprovePaymentRequest {
            reservation_id: id,
            pg_token: "pg".into(),
        })
        .await
        .unwrap();
    id
}

fn claims(sub: i64, role: Role) -> Claims {
    Claims {
        sub,
        role,
        token_type: TokenType::Access,
        iat: 0,
        exp: 0,
        jti: "test".into(),
    }
}

#[tokio::test]
async fn two_seat_booking_refunded_one_seat_at_a_time() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 2).await;
    let payment_id = harness.reservations.find_by_id(id).await.unwrap().payment.id;

    let first = harness.refunds.refund(payment_id, Some(1), None).await.unwrap();
    assert_eq!(first.approved_cancel_this_request.total, 10000);
    assert_eq!(first.canceled_cumulative.total, 10000);
    assert_eq!(first.cancel_available_remaining.total, 10000);
    assert!(!first.is_full());

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::PartiallyCanceled);
    assert_eq!(stored.payment.status, PaymentStatus::PartiallyCanceled);

    let second = harness.refunds.refund(payment_id, Some(1), None).await.unwrap();
    assert_eq!(second.canceled_cumulative.total, 20000);
    assert_eq!(second.cancel_available_remaining.total, 0);
    assert!(second.is_full());

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::Canceled);
    assert_eq!(stored.payment.status, PaymentStatus::Canceled);
}

#[tokio::test]
async fn totals_balance_after_every_refund() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 3).await;
    let payment_id = harness.reservations.find_by_id(id).await.unwrap().payment.id;

    for amount in [1234, 5000, 23766] {
        let record = harness
            .refunds
            .refund(payment_id, None, Some(amount))
            .await
            .unwrap();
        assert_eq!(
            record.canceled_cumulative.total + record.cancel_available_remaining.total,
            30000
        );

        let stored = harness.reservations.find_by_id(id).await.unwrap();
        assert_eq!(
            stored.payment.canceled_amount.total + stored.payment.cancel_available_amount.total,
            stored.payment.total_amount
        );
    }

    let stored = harness.reservations.find_by_id(id).await.unwrap();
    assert_eq!(stored.reservation.status, ReservationStatus::Canceled);
}

#[tokio::test]
async fn excessive_refund_changes_nothing() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 2).await;
    let before = harness.reservations.find_by_id(id).await.unwrap();

    let err = harness
        .refunds
        .refund(before.payment.id, None, Some(20001))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::ExcessiveCancelAmount {
            requested: 20001,
            available: 20000
        }
    ));
    assert_eq!(harness.gateway.cancel_calls(), 0);
    assert_eq!(harness.reservations.find_by_id(id).await.unwrap(), before);
}

#[tokio::test]
async fn refund_without_input_cancels_everything_left() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 2).await;
    let payment_id = harness.reservations.find_by_id(id).await.unwrap().payment.id;

    let record = harness.refunds.refund(payment_id, None, None).await.unwrap();
    assert!(record.is_full());
    assert_eq!(record.canceled_cumulative.total, 20000);

    let err = harness
        .refunds
        .refund(payment_id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotConfirmed { .. }));
}

#[tokio::test]
async fn pending_reservation_cannot_be_refunded() {
    let harness = Harness::new().await;
    let booking = harness.reservations.create(1, 1, 1).await.unwrap();

    let err = harness
        .refunds
        .refund(booking.payment.id, Some(1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotConfirmed { .. }));
    assert_eq!(harness.gateway.cancel_calls(), 0);
}

#[tokio::test]
async fn provider_failure_mutates_nothing() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 2).await;
    let before = harness.reservations.find_by_id(id).await.unwrap();
    harness.gateway.fail_cancel(Failure::Unavailable);

    let err = harness
        .refunds
        .refund(before.payment.id, Some(1), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GatewayUnavailable);
    assert_eq!(harness.reservations.find_by_id(id).await.unwrap(), before);
}

#[tokio::test]
async fn only_owner_or_admin_may_refund() {
    let harness = Harness::new().await;
    let id = confirmed_booking(&harness, 2).await;
    let payment_id = harness.reservations.find_by_id(id).await.unwrap().payment.id;
    let request = RefundRequest {
        quantity: Some(1),
        cancel_amount: None,
    };

    let err = harness
        .refunds
        .request_refund(&claims(2, Role::User), payment_id, &request)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let response = harness
        .refunds
        .request_refund(&claims(9, Role::Admin), payment_id, &request)
        .await
        .unwrap();
    assert!(!response.data.full);
    assert_eq!(response.data.cancel_available_amount.total, 10000);

    let response = harness
        .refunds
        .request_refund(&claims(1, Role::User), payment_id, &request)
        .await
        .unwrap();
    assert!(response.data.full);
}

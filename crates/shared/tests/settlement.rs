mod common;

use common::{BrokenTutorSettlementRepository, Harness, date, lesson, telemetry};
use shared::{
    abstract_trait::settlement::service::SettlementServiceTrait,
    config::{Claims, TokenType},
    domain::requests::{ApprovePaymentRequest, CreateReservationRequest, FindSales},
    errors::{ErrorKind, ServiceError},
    model::user::Role,
    repository::memory::InMemorySettlementRepository,
    service::settlement::SettlementService,
};
use std::sync::{Arc, atomic::AtomicBool};

async fn book_and_pay(harness: &Harness, lesson_id: i64, quantity: i32) -> i64 {
    let id = harness
        .checkout
        .request_payment(
            1,
            &CreateReservationRequest {
                lesson_id,
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

/// Tutor 100 teaches lesson 1 (June 2024) and lesson 2 (March 2024),
/// tutor 200 teaches lesson 3 (June 2024).
async fn seeded() -> Harness {
    let harness = Harness::new().await;
    harness
        .lessons
        .insert(lesson(2, 2, 100, 5000, date(2024, 3, 2)))
        .await;
    harness
        .lessons
        .insert(lesson(3, 3, 200, 7000, date(2024, 6, 20)))
        .await;

    book_and_pay(&harness, 1, 2).await;
    book_and_pay(&harness, 2, 1).await;
    book_and_pay(&harness, 3, 1).await;
    harness
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
async fn aggregate_buckets_confirmed_sales_by_month_and_class() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = SettlementService::new(Arc::new(repo), telemetry());

    let aggregate = service.aggregate(100, 2024).await.unwrap();

    assert_eq!(aggregate.monthly.len(), 12);
    assert_eq!(aggregate.monthly[2].amount, 5000);
    assert_eq!(aggregate.monthly[5].amount, 20000);
    assert_eq!(aggregate.grand_total, 25000);
    let classes: Vec<(i64, u32)> = aggregate
        .by_class
        .iter()
        .map(|c| (c.class_id, c.month))
        .collect();
    assert_eq!(classes, vec![(1, 6), (2, 3)]);
}

#[tokio::test]
async fn refunded_reservations_leave_the_aggregate() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = SettlementService::new(Arc::new(repo), telemetry());

    let refunded = harness
        .store
        .all()
        .await
        .into_iter()
        .find(|b| b.reservation.lesson_id == 2)
        .unwrap();
    harness
        .refunds
        .refund(refunded.payment.id, None, None)
        .await
        .unwrap();

    let aggregate = service.aggregate(100, 2024).await.unwrap();
    assert_eq!(aggregate.grand_total, 20000);
    assert_eq!(aggregate.monthly[2].amount, 0);
}

#[tokio::test]
async fn running_twice_writes_identical_snapshots() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = SettlementService::new(Arc::new(repo.clone()), telemetry());

    let first = service.run(2024).await.unwrap();
    let snapshot = service
        .find_sales(
            &claims(0, Role::Admin),
            &FindSales {
                tutor_id: 100,
                year: 2024,
            },
        )
        .await
        .unwrap()
        .data;

    let second = service.run(2024).await.unwrap();
    let again = service
        .find_sales(
            &claims(0, Role::Admin),
            &FindSales {
                tutor_id: 100,
                year: 2024,
            },
        )
        .await
        .unwrap()
        .data;

    assert_eq!(first, second);
    assert_eq!(first.tutors, vec![100, 200]);
    assert_eq!(repo.snapshot_count().await, 2);
    assert_eq!(snapshot.grand_total, again.grand_total);
    assert_eq!(again.grand_total, 25000);
}

#[tokio::test]
async fn one_failing_tutor_does_not_stop_the_run() {
    let harness = seeded().await;
    let inner = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let repo = BrokenTutorSettlementRepository {
        inner: inner.clone(),
        broken_tutor: 100,
        tripped: AtomicBool::new(false),
    };
    let service = SettlementService::new(Arc::new(repo), telemetry());

    let report = service.run(2024).await.unwrap();

    assert_eq!(report.tutors, vec![200]);
    assert_eq!(report.failed, vec![100]);
    assert_eq!(inner.snapshot_count().await, 1);
}

#[tokio::test]
async fn sales_are_computed_on_demand_without_snapshot() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = SettlementService::new(Arc::new(repo.clone()), telemetry());

    let sales = service
        .find_sales(
            &claims(200, Role::Tutor),
            &FindSales {
                tutor_id: 200,
                year: 2024,
            },
        )
        .await
        .unwrap()
        .data;

    assert_eq!(sales.grand_total, 7000);
    assert_eq!(repo.snapshot_count().await, 0);
}

#[tokio::test]
async fn tutors_only_see_their_own_sales() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = SettlementService::new(Arc::new(repo), telemetry());
    let request = FindSales {
        tutor_id: 100,
        year: 2024,
    };

    for requester in [claims(200, Role::Tutor), claims(100, Role::User)] {
        let err = service.find_sales(&requester, &request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}

#[tokio::test]
async fn overlapping_runs_are_skipped() {
    let harness = seeded().await;
    let repo = InMemorySettlementRepository::new(harness.store.clone(), harness.lessons.clone());
    let service = Arc::new(SettlementService::new(Arc::new(repo), telemetry()));

    let (a, b) = tokio::join!(service.run(2024), service.run(2024));
    let skipped = [&a, &b]
        .iter()
        .filter(|r| matches!(r, Err(ServiceError::SettlementAlreadyRunning)))
        .count();
    let completed = [&a, &b].iter().filter(|r| r.is_ok()).count();

    assert_eq!(completed + skipped, 2);
    assert!(completed >= 1);
}

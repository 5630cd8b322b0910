#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use shared::{
    abstract_trait::{
        gateway::{DynPaymentGateway, PaymentGatewayTrait},
        payment::DynCheckoutService,
        refund::DynRefundService,
        reservation::{
            repository::{ReservationCommandRepositoryTrait, DynReservationCommandRepository},
            service::DynReservationService,
        },
        settlement::repository::SettlementRepositoryTrait,
    },
    domain::requests::{ApproveRequest, CancelRequest, NewReservation, PrepareRequest},
    errors::{GatewayError, RepositoryError},
    model::{
        amount::Amount,
        gateway::{ApproveResult, CancelResult, PrepareResult},
        lesson::LessonModel,
        payment::PaymentStatus,
        reservation::ReservationWithPayment,
        sales::{SalesAggregate, SalesRow},
    },
    repository::memory::{
        InMemoryLessonRepository, InMemoryReservationRepository, InMemorySettlementRepository,
    },
    service::{
        payment::CheckoutService, refund::RefundService, reservation::ReservationService,
    },
    utils::{Metrics, Telemetry},
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unavailable,
    Rejected,
}

impl Failure {
    fn into_error(self) -> GatewayError {
        match self {
            Failure::Unavailable => GatewayError::Unavailable("operation timed out".into()),
            Failure::Rejected => GatewayError::Rejected {
                code: -780,
                message: "approval failure".into(),
            },
        }
    }
}

/// Provider double that replays the happy path unless told to fail.
#[derive(Default)]
pub struct FakeGateway {
    totals: Mutex<HashMap<String, i64>>,
    prepare_failure: Mutex<Option<Failure>>,
    approve_failure: Mutex<Option<Failure>>,
    cancel_failure: Mutex<Option<Failure>>,
    approve_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn fail_prepare(&self, failure: Failure) {
        *self.prepare_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_approve(&self, failure: Failure) {
        *self.approve_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_cancel(&self, failure: Failure) {
        *self.cancel_failure.lock().unwrap() = Some(failure);
    }

    pub fn approve_calls(&self) -> usize {
        self.approve_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

fn now() -> chrono::NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl PaymentGatewayTrait for FakeGateway {
    async fn prepare(&self, request: &PrepareRequest) -> Result<PrepareResult, GatewayError> {
        if let Some(failure) = *self.prepare_failure.lock().unwrap() {
            return Err(failure.into_error());
        }
        let tid = format!("T{}", request.partner_order_id);
        self.totals
            .lock()
            .unwrap()
            .insert(tid.clone(), request.total_amount);

        Ok(PrepareResult {
            redirect_url: format!("https://pay.test/checkout/{tid}"),
            tid,
            created_at: now(),
        })
    }

    async fn approve(&self, request: &ApproveRequest) -> Result<ApproveResult, GatewayError> {
        self.approve_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = *self.approve_failure.lock().unwrap() {
            return Err(failure.into_error());
        }
        let total = self
            .totals
            .lock()
            .unwrap()
            .get(&request.tid)
            .copied()
            .ok_or_else(|| GatewayError::Rejected {
                code: -701,
                message: format!("unknown tid {}", request.tid),
            })?;

        Ok(ApproveResult {
            tid: request.tid.clone(),
            approved_at: now(),
            amount: Amount::total_only(total),
            payment_method_type: "MONEY".into(),
        })
    }

    async fn cancel(&self, request: &CancelRequest) -> Result<CancelResult, GatewayError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = *self.cancel_failure.lock().unwrap() {
            return Err(failure.into_error());
        }
        let remaining = request.cancel_available_amount - request.cancel_amount;
        let approved = Amount {
            total: request.cancel_amount,
            tax_free: request.cancel_tax_free_amount,
            ..Amount::ZERO
        };

        Ok(CancelResult {
            tid: request.tid.clone(),
            status: if remaining == 0 {
                PaymentStatus::Canceled
            } else {
                PaymentStatus::PartiallyCanceled
            },
            approved_cancel_amount: approved,
            canceled_amount: approved,
            cancel_available_amount: Amount::total_only(remaining),
            canceled_at: now(),
        })
    }
}

/// Lets one save lose a race against a concurrent writer.
pub struct RacingCommandRepository {
    inner: InMemoryReservationRepository,
    races_left: AtomicUsize,
}

impl RacingCommandRepository {
    pub fn new(inner: InMemoryReservationRepository) -> Self {
        Self {
            inner,
            races_left: AtomicUsize::new(0),
        }
    }

    pub fn lose_next_saves(&self, count: usize) {
        self.races_left.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReservationCommandRepositoryTrait for RacingCommandRepository {
    async fn create(
        &self,
        request: &NewReservation,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        self.inner.create(request).await
    }

    async fn save(
        &self,
        booking: &ReservationWithPayment,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        let lose = self
            .races_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if lose {
            self.inner.touch(booking.id()).await?;
        }
        self.inner.save(booking).await
    }
}

/// Fails every read for one tutor.
pub struct BrokenTutorSettlementRepository {
    pub inner: InMemorySettlementRepository,
    pub broken_tutor: i64,
    pub tripped: AtomicBool,
}

#[async_trait]
impl SettlementRepositoryTrait for BrokenTutorSettlementRepository {
    async fn find_tutor_ids(&self) -> Result<Vec<i64>, RepositoryError> {
        self.inner.find_tutor_ids().await
    }

    async fn find_confirmed_reservations_by_tutor_and_year(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Vec<SalesRow>, RepositoryError> {
        if tutor_id == self.broken_tutor {
            self.tripped.store(true, Ordering::SeqCst);
            return Err(RepositoryError::Custom("connection reset".into()));
        }
        self.inner
            .find_confirmed_reservations_by_tutor_and_year(tutor_id, year)
            .await
    }

    async fn save_snapshot(&self, aggregate: &SalesAggregate) -> Result<(), RepositoryError> {
        self.inner.save_snapshot(aggregate).await
    }

    async fn find_snapshot(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Option<SalesAggregate>, RepositoryError> {
        self.inner.find_snapshot(tutor_id, year).await
    }
}

pub fn lesson(id: i64, class_id: i64, tutor_id: i64, price: i64, date: NaiveDate) -> LessonModel {
    LessonModel {
        id,
        class_id,
        class_name: format!("Class {class_id}"),
        tutor_id,
        price,
        lesson_date: date,
        remaining_capacity: 10,
    }
}

pub fn telemetry() -> Telemetry {
    Telemetry::new("test", Metrics::new())
}

pub struct Harness {
    pub store: InMemoryReservationRepository,
    pub lessons: InMemoryLessonRepository,
    pub racing: Arc<RacingCommandRepository>,
    pub gateway: Arc<FakeGateway>,
    pub reservations: DynReservationService,
    pub checkout: DynCheckoutService,
    pub refunds: DynRefundService,
}

impl Harness {
    pub async fn new() -> Self {
        let store = InMemoryReservationRepository::new();
        let lessons = InMemoryLessonRepository::new();
        lessons
            .insert(lesson(1, 1, 100, 10000, date(2024, 6, 15)))
            .await;

        let racing = Arc::new(RacingCommandRepository::new(store.clone()));
        let gateway = Arc::new(FakeGateway::default());
        let gateway_dyn: DynPaymentGateway = gateway.clone();
        let command: DynReservationCommandRepository = racing.clone();

        let reservations: DynReservationService = Arc::new(ReservationService::new(
            Arc::new(store.clone()),
            command,
            Arc::new(lessons.clone()),
            "TC0ONETIME",
        ));
        let checkout: DynCheckoutService = Arc::new(CheckoutService::new(
            reservations.clone(),
            gateway_dyn.clone(),
            telemetry(),
        ));
        let refunds: DynRefundService = Arc::new(RefundService::new(
            reservations.clone(),
            gateway_dyn,
            telemetry(),
        ));

        Self {
            store,
            lessons,
            racing,
            gateway,
            reservations,
            checkout,
            refunds,
        }
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

use crate::{
    errors::ServiceError,
    model::{
        gateway::{ApproveResult, CancelResult, PrepareResult},
        refund::RefundRecord,
        reservation::{AbandonOutcome, ReservationWithPayment},
    },
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynReservationService = Arc<dyn ReservationServiceTrait + Send + Sync>;

/// Persisted reservation/payment state machine.
#[async_trait]
pub trait ReservationServiceTrait {
    async fn create(
        &self,
        user_id: i64,
        lesson_id: i64,
        quantity: i32,
    ) -> Result<ReservationWithPayment, ServiceError>;
    async fn attach_tid(
        &self,
        reservation_id: i64,
        prepared: &PrepareResult,
    ) -> Result<ReservationWithPayment, ServiceError>;
    async fn confirm(
        &self,
        reservation_id: i64,
        approved: &ApproveResult,
    ) -> Result<ReservationWithPayment, ServiceError>;
    async fn cancel(
        &self,
        reservation_id: i64,
        canceled: &CancelResult,
        full: bool,
    ) -> Result<(ReservationWithPayment, RefundRecord), ServiceError>;
    async fn abandon(
        &self,
        reservation_id: i64,
        outcome: AbandonOutcome,
    ) -> Result<ReservationWithPayment, ServiceError>;
    async fn find_by_id(&self, reservation_id: i64)
    -> Result<ReservationWithPayment, ServiceError>;
    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<ReservationWithPayment, ServiceError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<ReservationWithPayment>, ServiceError>;
}

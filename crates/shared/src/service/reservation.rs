use crate::{
    abstract_trait::{
        lesson::DynLessonQueryRepository,
        reservation::{
            repository::{DynReservationCommandRepository, DynReservationQueryRepository},
            service::ReservationServiceTrait,
        },
    },
    domain::requests::NewReservation,
    errors::{RepositoryError, ServiceError},
    model::{
        gateway::{ApproveResult, CancelResult, PrepareResult},
        refund::RefundRecord,
        reservation::{AbandonOutcome, ReservationWithPayment},
    },
};
use async_trait::async_trait;
use tracing::{error, info, warn};

pub struct ReservationService {
    query: DynReservationQueryRepository,
    command: DynReservationCommandRepository,
    lessons: DynLessonQueryRepository,
    cid: String,
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService")
            .field("query", &"DynReservationQueryRepository")
            .field("command", &"DynReservationCommandRepository")
            .field("lessons", &"DynLessonQueryRepository")
            .field("cid", &self.cid)
            .finish()
    }
}

impl ReservationService {
    pub fn new(
        query: DynReservationQueryRepository,
        command: DynReservationCommandRepository,
        lessons: DynLessonQueryRepository,
        cid: impl Into<String>,
    ) -> Self {
        Self {
            query,
            command,
            lessons,
            cid: cid.into(),
        }
    }

    async fn load(&self, reservation_id: i64) -> Result<ReservationWithPayment, ServiceError> {
        self.query
            .find_by_id(reservation_id)
            .await?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))
    }

    /// Reloads, applies `apply` and commits. A version conflict is retried
    /// once against fresh state.
    async fn transition<T, F>(
        &self,
        reservation_id: i64,
        operation: &str,
        apply: F,
    ) -> Result<(ReservationWithPayment, T), ServiceError>
    where
        T: Send,
        F: Fn(&mut ReservationWithPayment) -> Result<T, ServiceError> + Send + Sync,
    {
        let mut retried = false;

        loop {
            let mut booking = self.load(reservation_id).await?;

            let outcome = apply(&mut booking).inspect_err(|e| {
                warn!("⚡ {operation} rejected for reservation {reservation_id}: {e}");
            })?;

            match self.command.save(&booking).await {
                Ok(saved) => {
                    info!(
                        "✅ {operation} committed for reservation {reservation_id}: {} / {}",
                        saved.reservation.status, saved.payment.status
                    );
                    return Ok((saved, outcome));
                }
                Err(RepositoryError::Conflict(msg)) if !retried => {
                    warn!("🔁 {operation} hit a concurrent update ({msg}), retrying once");
                    retried = true;
                }
                Err(e) => {
                    error!("❌ {operation} failed to persist reservation {reservation_id}: {e}");
                    return Err(e.into());
                }
            }
        }
    }
}

#[async_trait]
impl ReservationServiceTrait for ReservationService {
    async fn create(
        &self,
        user_id: i64,
        lesson_id: i64,
        quantity: i32,
    ) -> Result<ReservationWithPayment, ServiceError> {
        info!("🏗️ Creating reservation user={user_id} lesson={lesson_id} quantity={quantity}");

        if quantity <= 0 {
            return Err(ServiceError::InvalidQuantity(quantity));
        }

        let lesson = self
            .lessons
            .find_by_id(lesson_id)
            .await?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))?;

        let total_amount = lesson
            .price
            .checked_mul(i64::from(quantity))
            .ok_or_else(|| {
                ServiceError::Validation(vec![format!(
                    "total price of {quantity} x {} overflows",
                    lesson.price
                )])
            })?;

        let request = NewReservation {
            user_id,
            lesson_id,
            quantity,
            item_name: lesson.class_name.clone(),
            total_amount,
            tax_free_amount: 0,
            cid: self.cid.clone(),
        };

        let booking = self.command.create(&request).await.map_err(|e| {
            error!("❌ Failed to create reservation for user {user_id}: {e}");
            ServiceError::from(e)
        })?;

        info!(
            "✅ Reservation {} created, payment {} READY for {}",
            booking.reservation.id, booking.payment.id, booking.payment.total_amount
        );
        Ok(booking)
    }

    async fn attach_tid(
        &self,
        reservation_id: i64,
        prepared: &PrepareResult,
    ) -> Result<ReservationWithPayment, ServiceError> {
        let (booking, ()) = self
            .transition(reservation_id, "attach_tid", |b| b.attach_tid(prepared))
            .await?;
        Ok(booking)
    }

    async fn confirm(
        &self,
        reservation_id: i64,
        approved: &ApproveResult,
    ) -> Result<ReservationWithPayment, ServiceError> {
        let (booking, ()) = self
            .transition(reservation_id, "confirm", |b| b.confirm(approved))
            .await?;
        Ok(booking)
    }

    async fn cancel(
        &self,
        reservation_id: i64,
        canceled: &CancelResult,
        full: bool,
    ) -> Result<(ReservationWithPayment, RefundRecord), ServiceError> {
        self.transition(reservation_id, "cancel", |b| b.cancel(canceled, full))
            .await
    }

    async fn abandon(
        &self,
        reservation_id: i64,
        outcome: AbandonOutcome,
    ) -> Result<ReservationWithPayment, ServiceError> {
        let (booking, ()) = self
            .transition(reservation_id, "abandon", |b| b.abandon(outcome))
            .await?;
        Ok(booking)
    }

    async fn find_by_id(
        &self,
        reservation_id: i64,
    ) -> Result<ReservationWithPayment, ServiceError> {
        self.load(reservation_id).await
    }

    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<ReservationWithPayment, ServiceError> {
        self.query
            .find_by_payment_id(payment_id)
            .await?
            .ok_or(ServiceError::Repo(RepositoryError::NotFound))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<ReservationWithPayment>, ServiceError> {
        Ok(self.query.find_by_user(user_id).await?)
    }
}

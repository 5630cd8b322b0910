use crate::{
    abstract_trait::reservation::repository::{
        ReservationCommandRepositoryTrait, ReservationQueryRepositoryTrait,
    },
    domain::requests::NewReservation,
    errors::RepositoryError,
    model::{
        amount::Amount,
        payment::{PaymentModel, PaymentStatus},
        reservation::{ReservationModel, ReservationStatus, ReservationWithPayment},
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

#[derive(Default)]
struct Bookings {
    next_id: i64,
    rows: BTreeMap<i64, ReservationWithPayment>,
}

/// Reservation and payment rows keyed by reservation id. Payment ids
/// mirror reservation ids.
#[derive(Clone, Default)]
pub struct InMemoryReservationRepository {
    inner: Arc<RwLock<Bookings>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<ReservationWithPayment> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    /// Bumps the stored payment version as a concurrent writer would.
    pub async fn touch(&self, reservation_id: i64) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let booking = inner
            .rows
            .get_mut(&reservation_id)
            .ok_or(RepositoryError::NotFound)?;
        booking.payment.version += 1;
        Ok(())
    }
}

#[async_trait]
impl ReservationCommandRepositoryTrait for InMemoryReservationRepository {
    async fn create(
        &self,
        req: &NewReservation,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now().naive_utc();

        let booking = ReservationWithPayment {
            reservation: ReservationModel {
                id,
                user_id: req.user_id,
                lesson_id: req.lesson_id,
                quantity: req.quantity,
                status: ReservationStatus::Pending,
                created_at: now,
            },
            payment: PaymentModel {
                id,
                reservation_id: id,
                item_name: req.item_name.clone(),
                quantity: req.quantity,
                total_amount: req.total_amount,
                tax_free_amount: req.tax_free_amount,
                status: PaymentStatus::Ready,
                tid: None,
                cid: req.cid.clone(),
                payment_method_type: None,
                approved_amount: None,
                canceled_amount: Amount::ZERO,
                cancel_available_amount: Amount::total_only(req.total_amount),
                created_at: now,
                approved_at: None,
                canceled_at: None,
                version: 0,
            },
        };

        inner.rows.insert(id, booking.clone());
        Ok(booking)
    }

    async fn save(
        &self,
        booking: &ReservationWithPayment,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .rows
            .get_mut(&booking.id())
            .ok_or(RepositoryError::NotFound)?;

        if stored.payment.version != booking.payment.version {
            return Err(RepositoryError::Conflict(format!(
                "payment {} is no longer at version {}",
                booking.payment.id, booking.payment.version
            )));
        }

        let mut saved = booking.clone();
        saved.payment.version += 1;
        *stored = saved.clone();
        Ok(saved)
    }
}

#[async_trait]
impl ReservationQueryRepositoryTrait for InMemoryReservationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ReservationWithPayment>, RepositoryError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Option<ReservationWithPayment>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .find(|b| b.payment.id == payment_id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReservationWithPayment>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .rows
            .values()
            .rev()
            .filter(|b| b.reservation.user_id == user_id)
            .cloned()
            .collect())
    }
}

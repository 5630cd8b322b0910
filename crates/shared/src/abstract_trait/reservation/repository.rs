use crate::{
    domain::requests::NewReservation, errors::RepositoryError,
    model::reservation::ReservationWithPayment,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynReservationCommandRepository =
    Arc<dyn ReservationCommandRepositoryTrait + Send + Sync>;
pub type DynReservationQueryRepository = Arc<dyn ReservationQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ReservationCommandRepositoryTrait {
    /// Inserts a reservation and its payment in one transaction.
    async fn create(
        &self,
        request: &NewReservation,
    ) -> Result<ReservationWithPayment, RepositoryError>;

    /// Writes both rows if `booking.payment.version` is still current and
    /// returns the pair with the bumped version. A stale version yields
    /// `RepositoryError::Conflict`.
    async fn save(
        &self,
        booking: &ReservationWithPayment,
    ) -> Result<ReservationWithPayment, RepositoryError>;
}

#[async_trait]
pub trait ReservationQueryRepositoryTrait {
    async fn find_by_id(&self, id: i64) -> Result<Option<ReservationWithPayment>, RepositoryError>;
    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Option<ReservationWithPayment>, RepositoryError>;
    async fn find_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReservationWithPayment>, RepositoryError>;
}

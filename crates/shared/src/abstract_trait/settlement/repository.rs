use crate::{
    errors::RepositoryError,
    model::sales::{SalesAggregate, SalesRow},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSettlementRepository = Arc<dyn SettlementRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait SettlementRepositoryTrait {
    async fn find_tutor_ids(&self) -> Result<Vec<i64>, RepositoryError>;

    /// Rows for reservations still `CONFIRMED` whose lesson falls in `year`.
    async fn find_confirmed_reservations_by_tutor_and_year(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Vec<SalesRow>, RepositoryError>;

    /// Replaces the stored snapshot for `(tutor_id, year)`.
    async fn save_snapshot(&self, aggregate: &SalesAggregate) -> Result<(), RepositoryError>;

    async fn find_snapshot(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Option<SalesAggregate>, RepositoryError>;
}

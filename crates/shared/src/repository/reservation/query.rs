use super::row::{SELECT_BOOKING, booking_from_row};
use crate::{
    abstract_trait::reservation::repository::ReservationQueryRepositoryTrait,
    config::ConnectionPool, errors::RepositoryError, model::reservation::ReservationWithPayment,
};
use async_trait::async_trait;
use tracing::error;

pub struct ReservationQueryRepository {
    db: ConnectionPool,
}

impl ReservationQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn get_conn(
        &self,
    ) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>, RepositoryError> {
        self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn find_one(
        &self,
        filter: &str,
        id: i64,
    ) -> Result<Option<ReservationWithPayment>, RepositoryError> {
        let mut conn = self.get_conn().await?;
        let sql = format!("{SELECT_BOOKING} WHERE {filter} = $1");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Database error loading reservation by {filter}={id}: {e:?}");
                RepositoryError::from(e)
            })?;

        row.as_ref().map(booking_from_row).transpose()
    }
}

#[async_trait]
impl ReservationQueryRepositoryTrait for ReservationQueryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ReservationWithPayment>, RepositoryError> {
        self.find_one("r.id", id).await
    }

    async fn find_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Option<ReservationWithPayment>, RepositoryError> {
        self.find_one("p.id", payment_id).await
    }

    async fn find_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReservationWithPayment>, RepositoryError> {
        let mut conn = self.get_conn().await?;
        let sql = format!("{SELECT_BOOKING} WHERE r.user_id = $1 ORDER BY r.created_at DESC");

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Database error listing reservations of user {user_id}: {e:?}");
                RepositoryError::from(e)
            })?;

        rows.iter().map(booking_from_row).collect()
    }
}

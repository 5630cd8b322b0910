use crate::{
    abstract_trait::settlement::repository::SettlementRepositoryTrait,
    config::ConnectionPool,
    errors::RepositoryError,
    model::{
        reservation::ReservationStatus,
        sales::{SalesAggregate, SalesRow},
    },
};
use async_trait::async_trait;
use sqlx::types::Json;
use tracing::{error, info};

pub struct SettlementRepository {
    db: ConnectionPool,
}

impl SettlementRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettlementRepositoryTrait for SettlementRepository {
    async fn find_tutor_ids(&self) -> Result<Vec<i64>, RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT DISTINCT tutor_id FROM classes ORDER BY tutor_id")
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Database error listing tutors: {e:?}");
                RepositoryError::from(e)
            })
    }

    async fn find_confirmed_reservations_by_tutor_and_year(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Vec<SalesRow>, RepositoryError> {
        sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT r.id AS reservation_id,
                   c.id AS class_id,
                   c.name AS class_name,
                   l.lesson_date,
                   p.total_amount AS total_price
            FROM reservations r
            JOIN payments p ON p.reservation_id = r.id
            JOIN lessons l ON l.id = r.lesson_id
            JOIN classes c ON c.id = l.class_id
            WHERE c.tutor_id = $1
              AND r.status = $2
              AND l.lesson_date >= make_date($3, 1, 1)
              AND l.lesson_date < make_date($3 + 1, 1, 1)
            ORDER BY c.id, l.lesson_date, r.id
            "#,
        )
        .bind(tutor_id)
        .bind(ReservationStatus::Confirmed.as_str())
        .bind(year)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Database error loading sales of tutor {tutor_id} for {year}: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn save_snapshot(&self, aggregate: &SalesAggregate) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO sales_snapshots (tutor_id, year, aggregate, grand_total, computed_at)
            VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
            ON CONFLICT (tutor_id, year)
            DO UPDATE SET aggregate = EXCLUDED.aggregate,
                          grand_total = EXCLUDED.grand_total,
                          computed_at = EXCLUDED.computed_at
            "#,
        )
        .bind(aggregate.tutor_id)
        .bind(aggregate.year)
        .bind(Json(aggregate))
        .bind(aggregate.grand_total)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to store sales snapshot of tutor {}: {e:?}",
                aggregate.tutor_id
            );
            RepositoryError::from(e)
        })?;

        info!(
            "💾 Stored sales snapshot tutor={} year={}",
            aggregate.tutor_id, aggregate.year
        );
        Ok(())
    }

    async fn find_snapshot(
        &self,
        tutor_id: i64,
        year: i32,
    ) -> Result<Option<SalesAggregate>, RepositoryError> {
        let snapshot = sqlx::query_scalar::<_, Json<SalesAggregate>>(
            "SELECT aggregate FROM sales_snapshots WHERE tutor_id = $1 AND year = $2",
        )
        .bind(tutor_id)
        .bind(year)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to load sales snapshot of tutor {tutor_id}: {e:?}");
            RepositoryError::from(e)
        })?;

        Ok(snapshot.map(|json| json.0))
    }
}

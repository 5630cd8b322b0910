use crate::{
    abstract_trait::reservation::repository::ReservationCommandRepositoryTrait,
    config::ConnectionPool,
    domain::requests::NewReservation,
    errors::RepositoryError,
    model::{
        amount::Amount,
        payment::{PaymentModel, PaymentStatus},
        reservation::{ReservationModel, ReservationStatus, ReservationWithPayment},
    },
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Row, types::Json};
use tracing::{error, info, warn};

pub struct ReservationCommandRepository {
    db: ConnectionPool,
}

impl ReservationCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationCommandRepositoryTrait for ReservationCommandRepository {
    async fn create(
        &self,
        req: &NewReservation,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {e:?}");
            RepositoryError::from(e)
        })?;

        let reservation_row = sqlx::query(
            r#"
            INSERT INTO reservations (user_id, lesson_id, quantity, status, created_at)
            VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP)
            RETURNING id, created_at
            "#,
        )
        .bind(req.user_id)
        .bind(req.lesson_id)
        .bind(req.quantity)
        .bind(ReservationStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Database error inserting reservation: {e:?}");
            RepositoryError::from(e)
        })?;

        let reservation_id: i64 = reservation_row.try_get("id")?;
        let reservation_created_at: NaiveDateTime = reservation_row.try_get("created_at")?;
        let cancel_available = Amount::total_only(req.total_amount);

        let payment_row = sqlx::query(
            r#"
            INSERT INTO payments (
                reservation_id, item_name, quantity, total_amount, tax_free_amount,
                status, cid, canceled_amount, cancel_available_amount, created_at, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, CURRENT_TIMESTAMP, 0)
            RETURNING id, created_at, version
            "#,
        )
        .bind(reservation_id)
        .bind(&req.item_name)
        .bind(req.quantity)
        .bind(req.total_amount)
        .bind(req.tax_free_amount)
        .bind(PaymentStatus::Ready.as_str())
        .bind(&req.cid)
        .bind(Json(Amount::ZERO))
        .bind(Json(cancel_available))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Database error inserting payment: {e:?}");
            RepositoryError::from(e)
        })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit reservation: {e:?}");
            RepositoryError::from(e)
        })?;

        info!("✅ Stored reservation {reservation_id} with its payment");

        Ok(ReservationWithPayment {
            reservation: ReservationModel {
                id: reservation_id,
                user_id: req.user_id,
                lesson_id: req.lesson_id,
                quantity: req.quantity,
                status: ReservationStatus::Pending,
                created_at: reservation_created_at,
            },
            payment: PaymentModel {
                id: payment_row.try_get("id")?,
                reservation_id,
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
                cancel_available_amount: cancel_available,
                created_at: payment_row.try_get("created_at")?,
                approved_at: None,
                canceled_at: None,
                version: payment_row.try_get("version")?,
            },
        })
    }

    async fn save(
        &self,
        booking: &ReservationWithPayment,
    ) -> Result<ReservationWithPayment, RepositoryError> {
        let payment = &booking.payment;
        let mut tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {e:?}");
            RepositoryError::from(e)
        })?;

        let updated = sqlx::query(
            r#"
            UPDATE payments
            SET status = $3,
                tid = $4,
                payment_method_type = $5,
                approved_amount = $6,
                canceled_amount = $7,
                cancel_available_amount = $8,
                approved_at = $9,
                canceled_at = $10,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(payment.id)
        .bind(payment.version)
        .bind(payment.status.as_str())
        .bind(&payment.tid)
        .bind(&payment.payment_method_type)
        .bind(payment.approved_amount.map(Json))
        .bind(Json(payment.canceled_amount))
        .bind(Json(payment.cancel_available_amount))
        .bind(payment.approved_at)
        .bind(payment.canceled_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("❌ Database error updating payment {}: {e:?}", payment.id);
            RepositoryError::from(e)
        })?;

        if updated.rows_affected() == 0 {
            warn!(
                "🔒 Payment {} changed since version {}",
                payment.id, payment.version
            );
            return Err(RepositoryError::Conflict(format!(
                "payment {} is no longer at version {}",
                payment.id, payment.version
            )));
        }

        sqlx::query("UPDATE reservations SET status = $2 WHERE id = $1")
            .bind(booking.reservation.id)
            .bind(booking.reservation.status.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "❌ Database error updating reservation {}: {e:?}",
                    booking.reservation.id
                );
                RepositoryError::from(e)
            })?;

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit reservation {}: {e:?}", booking.id());
            RepositoryError::from(e)
        })?;

        let mut saved = booking.clone();
        saved.payment.version += 1;
        Ok(saved)
    }
}

use crate::{
    errors::RepositoryError,
    model::{
        amount::Amount,
        payment::{PaymentModel, PaymentStatus},
        reservation::{ReservationModel, ReservationStatus, ReservationWithPayment},
    },
};
use sqlx::{Row, postgres::PgRow, types::Json};

pub(super) const SELECT_BOOKING: &str = r#"
    SELECT
        r.id            AS reservation_id,
        r.user_id,
        r.lesson_id,
        r.quantity      AS reservation_quantity,
        r.status        AS reservation_status,
        r.created_at    AS reservation_created_at,
        p.id            AS payment_id,
        p.item_name,
        p.quantity      AS payment_quantity,
        p.total_amount,
        p.tax_free_amount,
        p.status        AS payment_status,
        p.tid,
        p.cid,
        p.payment_method_type,
        p.approved_amount,
        p.canceled_amount,
        p.cancel_available_amount,
        p.created_at    AS payment_created_at,
        p.approved_at,
        p.canceled_at,
        p.version
    FROM reservations r
    JOIN payments p ON p.reservation_id = r.id
"#;

fn parse_status<T: std::str::FromStr<Err = String>>(raw: String) -> Result<T, RepositoryError> {
    raw.parse::<T>().map_err(RepositoryError::Custom)
}

pub(super) fn booking_from_row(row: &PgRow) -> Result<ReservationWithPayment, RepositoryError> {
    let reservation = ReservationModel {
        id: row.try_get("reservation_id")?,
        user_id: row.try_get("user_id")?,
        lesson_id: row.try_get("lesson_id")?,
        quantity: row.try_get("reservation_quantity")?,
        status: parse_status::<ReservationStatus>(row.try_get("reservation_status")?)?,
        created_at: row.try_get("reservation_created_at")?,
    };

    let approved_amount: Option<Json<Amount>> = row.try_get("approved_amount")?;
    let canceled_amount: Json<Amount> = row.try_get("canceled_amount")?;
    let cancel_available_amount: Json<Amount> = row.try_get("cancel_available_amount")?;

    let payment = PaymentModel {
        id: row.try_get("payment_id")?,
        reservation_id: reservation.id,
        item_name: row.try_get("item_name")?,
        quantity: row.try_get("payment_quantity")?,
        total_amount: row.try_get("total_amount")?,
        tax_free_amount: row.try_get("tax_free_amount")?,
        status: parse_status::<PaymentStatus>(row.try_get("payment_status")?)?,
        tid: row.try_get("tid")?,
        cid: row.try_get("cid")?,
        payment_method_type: row.try_get("payment_method_type")?,
        approved_amount: approved_amount.map(|json| json.0),
        canceled_amount: canceled_amount.0,
        cancel_available_amount: cancel_available_amount.0,
        created_at: row.try_get("payment_created_at")?,
        approved_at: row.try_get("approved_at")?,
        canceled_at: row.try_get("canceled_at")?,
        version: row.try_get("version")?,
    };

    Ok(ReservationWithPayment {
        reservation,
        payment,
    })
}

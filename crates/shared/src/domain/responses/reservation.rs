use crate::model::{
    amount::Amount,
    payment::{PaymentModel, PaymentStatus},
    reservation::{ReservationStatus, ReservationWithPayment},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub status: PaymentStatus,
    pub item_name: String,
    pub total_amount: i64,
    pub tax_free_amount: i64,
    pub payment_method_type: Option<String>,
    pub canceled_amount: Amount,
    pub cancel_available_amount: Amount,
    pub approved_at: Option<String>,
    pub canceled_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub quantity: i32,
    pub status: ReservationStatus,
    pub created_at: String,
    pub payment: PaymentResponse,
}

/// Returned when a checkout is opened.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrepareResponse {
    pub reservation: ReservationResponse,
    pub redirect_url: String,
}

impl From<PaymentModel> for PaymentResponse {
    fn from(value: PaymentModel) -> Self {
        PaymentResponse {
            id: value.id,
            status: value.status,
            item_name: value.item_name,
            total_amount: value.total_amount,
            tax_free_amount: value.tax_free_amount,
            payment_method_type: value.payment_method_type,
            canceled_amount: value.canceled_amount,
            cancel_available_amount: value.cancel_available_amount,
            approved_at: value.approved_at.map(|dt| dt.to_string()),
            canceled_at: value.canceled_at.map(|dt| dt.to_string()),
        }
    }
}

impl From<ReservationWithPayment> for ReservationResponse {
    fn from(value: ReservationWithPayment) -> Self {
        let ReservationWithPayment {
            reservation,
            payment,
        } = value;
        ReservationResponse {
            id: reservation.id,
            user_id: reservation.user_id,
            lesson_id: reservation.lesson_id,
            quantity: reservation.quantity,
            status: reservation.status,
            created_at: reservation.created_at.to_string(),
            payment: payment.into(),
        }
    }
}

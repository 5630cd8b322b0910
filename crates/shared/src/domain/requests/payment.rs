use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query string of the provider's approval redirect.
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ApprovePaymentRequest {
    #[validate(range(min = 1, message = "Reservation id must be positive"))]
    pub reservation_id: i64,

    #[validate(length(min = 1, message = "pg_token is required"))]
    pub pg_token: String,
}

/// Query string of the provider's cancel and fail redirects.
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct CheckoutCallback {
    #[validate(range(min = 1, message = "Reservation id must be positive"))]
    pub reservation_id: i64,
}

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Either a seat count or an explicit amount. Neither means a full refund.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RefundRequest {
    #[serde(default)]
    pub quantity: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Cancel amount must be positive"))]
    pub cancel_amount: Option<i64>,
}

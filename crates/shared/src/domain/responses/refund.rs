use crate::model::{amount::Amount, refund::RefundRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefundResponse {
    pub payment_id: i64,
    pub approved_cancel_amount: Amount,
    pub canceled_amount: Amount,
    pub cancel_available_amount: Amount,
    pub full: bool,
}

impl RefundResponse {
    pub fn new(payment_id: i64, record: RefundRecord) -> Self {
        Self {
            payment_id,
            approved_cancel_amount: record.approved_cancel_this_request,
            canceled_amount: record.canceled_cumulative,
            cancel_available_amount: record.cancel_available_remaining,
            full: record.is_full(),
        }
    }
}

use crate::model::amount::Amount;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of one refund request, folded into the payment's running totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RefundRecord {
    pub approved_cancel_this_request: Amount,
    pub canceled_cumulative: Amount,
    pub cancel_available_remaining: Amount,
}

impl RefundRecord {
    pub fn is_full(&self) -> bool {
        self.cancel_available_remaining.is_zero()
    }
}

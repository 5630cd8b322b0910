use crate::{
    config::Claims,
    domain::{
        requests::RefundRequest,
        responses::{ApiResponse, RefundResponse},
    },
    errors::ServiceError,
    model::refund::RefundRecord,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynRefundService = Arc<dyn RefundServiceTrait + Send + Sync>;

#[async_trait]
pub trait RefundServiceTrait {
    /// Seat count wins over an explicit amount; neither means a full refund.
    async fn refund(
        &self,
        payment_id: i64,
        requested_quantity: Option<i32>,
        cancel_amount: Option<i64>,
    ) -> Result<RefundRecord, ServiceError>;

    /// Refund on behalf of the reservation owner or an admin.
    async fn request_refund(
        &self,
        requester: &Claims,
        payment_id: i64,
        request: &RefundRequest,
    ) -> Result<ApiResponse<RefundResponse>, ServiceError>;
}

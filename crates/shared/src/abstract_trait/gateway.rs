use crate::{
    domain::requests::{ApproveRequest, CancelRequest, PrepareRequest},
    errors::GatewayError,
    model::gateway::{ApproveResult, CancelResult, PrepareResult},
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

/// Checkout provider. Calls are never retried automatically.
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn prepare(&self, request: &PrepareRequest) -> Result<PrepareResult, GatewayError>;
    async fn approve(&self, request: &ApproveRequest) -> Result<ApproveResult, GatewayError>;
    async fn cancel(&self, request: &CancelRequest) -> Result<CancelResult, GatewayError>;
}

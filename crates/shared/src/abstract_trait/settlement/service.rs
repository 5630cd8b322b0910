use crate::{
    config::Claims,
    domain::{
        requests::FindSales,
        responses::{ApiResponse, SalesResponse, SettlementReport},
    },
    errors::ServiceError,
    model::sales::SalesAggregate,
};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynSettlementService = Arc<dyn SettlementServiceTrait + Send + Sync>;

#[async_trait]
pub trait SettlementServiceTrait {
    async fn aggregate(&self, tutor_id: i64, year: i32) -> Result<SalesAggregate, ServiceError>;
    async fn run(&self, year: i32) -> Result<SettlementReport, ServiceError>;
    async fn find_sales(
        &self,
        requester: &Claims,
        request: &FindSales,
    ) -> Result<ApiResponse<SalesResponse>, ServiceError>;
}

use crate::model::sales::{ClassMonthlySales, MonthlySales, SalesAggregate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesResponse {
    pub tutor_id: i64,
    pub year: i32,
    pub monthly: Vec<MonthlySales>,
    pub by_class: Vec<ClassMonthlySales>,
    pub grand_total: i64,
}

impl From<SalesAggregate> for SalesResponse {
    fn from(value: SalesAggregate) -> Self {
        SalesResponse {
            tutor_id: value.tutor_id,
            year: value.year,
            monthly: value.monthly,
            by_class: value.by_class,
            grand_total: value.grand_total,
        }
    }
}

/// Summary of one settlement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettlementReport {
    pub year: i32,
    /// Tutors whose snapshot was written.
    pub tutors: Vec<i64>,
    /// Tutors whose aggregation or write failed.
    pub failed: Vec<i64>,
}

use crate::{
    abstract_trait::settlement::{
        repository::DynSettlementRepository, service::SettlementServiceTrait,
    },
    config::Claims,
    domain::{
        requests::FindSales,
        responses::{ApiResponse, SalesResponse, SettlementReport},
    },
    errors::ServiceError,
    model::{sales::SalesAggregate, user::Role},
    utils::{Method, Telemetry},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct SettlementService {
    repo: DynSettlementRepository,
    run_lock: Mutex<()>,
    telemetry: Telemetry,
}

impl std::fmt::Debug for SettlementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementService")
            .field("repo", &"DynSettlementRepository")
            .finish()
    }
}

impl SettlementService {
    pub fn new(repo: DynSettlementRepository, telemetry: Telemetry) -> Self {
        Self {
            repo,
            run_lock: Mutex::new(()),
            telemetry,
        }
    }

    async fn settle_tutor(&self, tutor_id: i64, year: i32) -> Result<(), ServiceError> {
        let aggregate = self.aggregate(tutor_id, year).await?;
        self.repo.save_snapshot(&aggregate).await?;
        info!(
            "📊 Snapshot written for tutor {tutor_id}, {year}: grand total {}",
            aggregate.grand_total
        );
        Ok(())
    }
}

#[async_trait]
impl SettlementServiceTrait for SettlementService {
    async fn aggregate(&self, tutor_id: i64, year: i32) -> Result<SalesAggregate, ServiceError> {
        let rows = self
            .repo
            .find_confirmed_reservations_by_tutor_and_year(tutor_id, year)
            .await?;

        Ok(SalesAggregate::from_rows(tutor_id, year, &rows))
    }

    async fn run(&self, year: i32) -> Result<SettlementReport, ServiceError> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("⏳ Settlement for {year} skipped, a run is already in progress");
            return Err(ServiceError::SettlementAlreadyRunning);
        };

        let tracing_ctx = self.telemetry.start_tracing(
            "SettlementRun",
            vec![
                KeyValue::new("component", "settlement"),
                KeyValue::new("year", i64::from(year)),
            ],
        );

        let tutor_ids = match self.repo.find_tutor_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                self.telemetry.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Failed to list tutors: {e}"),
                );
                return Err(e.into());
            }
        };

        let mut report = SettlementReport {
            year,
            ..SettlementReport::default()
        };

        for tutor_id in tutor_ids {
            match self.settle_tutor(tutor_id, year).await {
                Ok(()) => report.tutors.push(tutor_id),
                Err(e) => {
                    error!("❌ Settlement for tutor {tutor_id} in {year} failed: {e}");
                    report.failed.push(tutor_id);
                }
            }
        }

        let message = format!(
            "Settlement {year} done: {} settled, {} failed",
            report.tutors.len(),
            report.failed.len()
        );
        if report.failed.is_empty() {
            self.telemetry
                .complete_tracing_success(&tracing_ctx, Method::Post, &message);
        } else {
            self.telemetry
                .complete_tracing_error(&tracing_ctx, Method::Post, &message);
        }

        Ok(report)
    }

    async fn find_sales(
        &self,
        requester: &Claims,
        request: &FindSales,
    ) -> Result<ApiResponse<SalesResponse>, ServiceError> {
        let allowed = match requester.role {
            Role::Admin => true,
            Role::Tutor => requester.sub == request.tutor_id,
            Role::User => false,
        };
        if !allowed {
            warn!(
                "🚫 User {} ({}) asked for sales of tutor {}",
                requester.sub, requester.role, request.tutor_id
            );
            return Err(ServiceError::Forbidden(format!(
                "sales of tutor {} are not visible",
                request.tutor_id
            )));
        }

        let aggregate = match self
            .repo
            .find_snapshot(request.tutor_id, request.year)
            .await?
        {
            Some(snapshot) => snapshot,
            None => {
                info!(
                    "📊 No snapshot for tutor {} in {}, computing on demand",
                    request.tutor_id, request.year
                );
                self.aggregate(request.tutor_id, request.year).await?
            }
        };

        Ok(ApiResponse::success("Sales retrieved", aggregate.into()))
    }
}

use anyhow::{Context, Result};
use dotenv::dotenv;
use settlement::scheduler::SettlementScheduler;
use shared::{
    abstract_trait::settlement::{
        repository::DynSettlementRepository, service::DynSettlementService,
    },
    config::{ConnectionManager, SchedulerConfig},
    repository::settlement::SettlementRepository,
    service::settlement::SettlementService,
    utils::{Logger, Metrics, Telemetry},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE").is_ok_and(|v| v == "true");
    let _logger = Logger::new("settlement", is_dev);

    let config = SchedulerConfig::init().context("Failed to load configuration")?;

    let pool = ConnectionManager::new_pool(&config.database_url, config.run_migrations)
        .await
        .context("Failed to initialize database pool")?;

    let repo = Arc::new(SettlementRepository::new(pool)) as DynSettlementRepository;
    let service = Arc::new(SettlementService::new(
        repo,
        Telemetry::new("settlement-job", Metrics::new()),
    )) as DynSettlementService;

    info!("🚀 Settlement scheduler started");

    SettlementScheduler::new(service)
        .run_forever(config.run_on_start)
        .await;

    Ok(())
}

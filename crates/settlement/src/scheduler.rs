use chrono::{DateTime, Duration, Local};
use shared::{
    abstract_trait::settlement::service::DynSettlementService,
    domain::responses::SettlementReport,
    errors::ServiceError,
    utils::{next_monthly_run, settlement_year_for, shutdown_signal},
};
use tracing::{error, info, warn};

/// Owns the monthly timer. Holds no state between runs.
pub struct SettlementScheduler {
    service: DynSettlementService,
}

impl SettlementScheduler {
    pub fn new(service: DynSettlementService) -> Self {
        Self { service }
    }

    /// Runs the job for `year`. Errors are logged and swallowed so the timer
    /// keeps going.
    pub async fn trigger(&self, year: i32) -> Option<SettlementReport> {
        info!("🧾 Settlement run for {year} starting");

        match self.service.run(year).await {
            Ok(report) => {
                if report.failed.is_empty() {
                    info!(
                        "✅ Settlement run for {year} finished: {} tutors settled",
                        report.tutors.len()
                    );
                } else {
                    warn!(
                        "⚠️ Settlement run for {year} finished with failures: settled={:?} failed={:?}",
                        report.tutors, report.failed
                    );
                }
                Some(report)
            }
            Err(ServiceError::SettlementAlreadyRunning) => {
                warn!("⏳ Settlement run for {year} skipped, previous run still active");
                None
            }
            Err(e) => {
                error!("❌ Settlement run for {year} failed: {e}");
                None
            }
        }
    }

    /// Fires on day 1 at 00:00 local time until a shutdown signal arrives.
    pub async fn run_forever(&self, run_on_start: bool) {
        if run_on_start {
            self.trigger(settlement_year_for(&Local::now())).await;
        }

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            let now = Local::now();
            let (wait, year) = match next_monthly_run(&now) {
                Some(next) => {
                    info!("⏰ Next settlement run at {next}");
                    (until(&now, &next), Some(settlement_year_for(&next)))
                }
                None => {
                    error!("❌ Could not compute next settlement time after {now}, retrying in 1h");
                    (Duration::hours(1), None)
                }
            };

            tokio::select! {
                _ = &mut shutdown => {
                    info!("🛑 Settlement scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(wait.to_std().unwrap_or_default()) => {
                    if let Some(year) = year {
                        self.trigger(year).await;
                    }
                }
            }
        }
    }
}

fn until(now: &DateTime<Local>, next: &DateTime<Local>) -> Duration {
    (*next - *now).max(Duration::zero())
}

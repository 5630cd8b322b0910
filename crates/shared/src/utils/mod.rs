mod gracefull;
mod logs;
mod metrics;
mod schedule;
mod telemetry;

pub use self::gracefull::shutdown_signal;
pub use self::logs::Logger;
pub use self::metrics::{Method, MethodLabels, Metrics, Status};
pub use self::schedule::{next_monthly_run, settlement_year_for};
pub use self::telemetry::{Telemetry, TracingContext};

use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub kakaopay: KakaoPayConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("Missing env: DATABASE_URL")?;
        let jwt_secret = std::env::var("JWT_SECRET").context("Missing env: JWT_SECRET")?;
        let run_migrations_str =
            std::env::var("RUN_MIGRATIONS").context("Missing env: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing env: PORT")?;

        let run_migrations = parse_bool("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            kakaopay: KakaoPayConfig::from_env()?,
        })
    }
}

/// Settings of the settlement scheduler process.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub database_url: String,
    pub run_migrations: bool,
    pub run_on_start: bool,
}

impl SchedulerConfig {
    pub fn init() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("Missing env: DATABASE_URL")?;

        let run_migrations = match std::env::var("RUN_MIGRATIONS") {
            Ok(value) => parse_bool("RUN_MIGRATIONS", &value)?,
            Err(_) => false,
        };

        let run_on_start = match std::env::var("SETTLEMENT_RUN_ON_START") {
            Ok(value) => parse_bool("SETTLEMENT_RUN_ON_START", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            database_url,
            run_migrations,
            run_on_start,
        })
    }
}

#[derive(Debug, Clone)]
pub struct KakaoPayConfig {
    pub base_url: String,
    pub secret_key: String,
    pub cid: String,
    pub approval_url: String,
    pub cancel_url: String,
    pub fail_url: String,
    pub timeout_secs: u64,
}

impl KakaoPayConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://open-api.kakaopay.com";
    pub const DEFAULT_CID: &'static str = "TC0ONETIME";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("KAKAOPAY_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        let secret_key =
            std::env::var("KAKAOPAY_SECRET_KEY").context("Missing env: KAKAOPAY_SECRET_KEY")?;
        let cid = std::env::var("KAKAOPAY_CID").unwrap_or_else(|_| Self::DEFAULT_CID.to_string());
        let approval_url =
            std::env::var("KAKAOPAY_APPROVAL_URL").context("Missing env: KAKAOPAY_APPROVAL_URL")?;
        let cancel_url =
            std::env::var("KAKAOPAY_CANCEL_URL").context("Missing env: KAKAOPAY_CANCEL_URL")?;
        let fail_url =
            std::env::var("KAKAOPAY_FAIL_URL").context("Missing env: KAKAOPAY_FAIL_URL")?;

        let timeout_secs = match std::env::var("KAKAOPAY_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .context("KAKAOPAY_TIMEOUT_SECS must be a valid u64 integer")?,
            Err(_) => Self::DEFAULT_TIMEOUT_SECS,
        };

        if timeout_secs == 0 {
            return Err(anyhow!("KAKAOPAY_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            secret_key,
            cid,
            approval_url,
            cancel_url,
            fail_url,
            timeout_secs,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{name} must be 'true' or 'false', got '{other}'")),
    }
}

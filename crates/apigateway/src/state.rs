use crate::di::{DependenciesInject, DependenciesInjectDeps};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::jwt::DynJwtService,
    config::{Config, ConnectionPool, JwtConfig},
    utils::Metrics,
};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
}

impl AppState {
    pub fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;

        let metrics = Metrics::new();
        let mut registry = Registry::default();
        metrics.register(&mut registry);

        let deps = DependenciesInjectDeps {
            pool,
            jwt_config,
            kakaopay: config.kakaopay.clone(),
            metrics,
        };

        let di_container = DependenciesInject::new(deps)
            .context("Failed to initialize dependency injection container")?;

        Ok(Self {
            di_container,
            registry: Arc::new(Mutex::new(registry)),
        })
    }
}

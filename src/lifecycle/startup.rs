//! Startup orchestration.
//!
//! Order: database (schema ensured) → token verifier → metrics → server.
//! Any failure is fatal; nothing listens until everything is ready.

use thiserror::Error;

use crate::auth::{self, AuthError};
use crate::config::ApiConfig;
use crate::http::{ApiServer, AppState};
use crate::observability::metrics;
use crate::store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("token verifier: {0}")]
    Auth(#[from] AuthError),

    #[error("metrics: {0}")]
    Metrics(String),
}

/// Initialize every subsystem and return a server ready to run.
pub async fn bootstrap(config: ApiConfig) -> Result<ApiServer, StartupError> {
    let pool = store::connect(&config.database).await?;
    let verifier = auth::from_config(&config)?;

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e| StartupError::Metrics(format!("{}", e)))?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics(e.to_string()))?;
    }

    let state = AppState::new(pool, verifier, config.reports.clone());
    Ok(ApiServer::new(config, state))
}

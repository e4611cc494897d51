use domain::services::SyncError;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Failure wiring up the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigValidationError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Trial count must be at least 1")]
    InvalidTrialCount,

    #[error("Block size must be at least 1")]
    InvalidBlockSize,

    #[error("Down factor must lie in (0, 1), got {0}")]
    InvalidDownFactor(f64),

    #[error("Up factor must be greater than 1, got {0}")]
    InvalidUpFactor(f64),

    #[error("Invalid log filter '{0}'")]
    InvalidLogFilter(String),
}

//! Engine configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MCDA_SIM` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mcda_sim::config::EngineConfig;
//! use mcda_sim::domain::simulation::SimulationSettings;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let settings = SimulationSettings::from(&config.simulation);
//! println!("Running {} trials", settings.trials);
//! ```

mod error;
mod sensitivity;
mod simulation;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use sensitivity::SensitivityConfig;
pub use simulation::SimulationConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "MCDA_SIM";
const ENV_SEPARATOR: &str = "__";

/// Root engine configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Monte Carlo run settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Sensitivity analysis factors
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Logging output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `MCDA_SIM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MCDA_SIM__SIMULATION__TRIALS=50000` -> `simulation.trials = 50000`
    /// - `MCDA_SIM__TELEMETRY__JSON=true` -> `telemetry.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a file, with environment variables on top
    ///
    /// The file format is inferred from its extension (TOML, YAML, JSON, ...).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.simulation.validate()?;
        self.sensitivity.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

//! Simulation run configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::ConfidenceLevel;
use crate::domain::simulation::{
    ExecutionMode, SimulationSettings, DEFAULT_BLOCK_SIZE, DEFAULT_TRIALS,
};

/// Simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Number of Monte Carlo trials
    #[serde(default = "default_trials")]
    pub trials: u64,

    /// Fixed master seed; generated per run when absent
    pub seed: Option<u64>,

    /// Coverage of the percentile confidence interval, strictly inside (0, 1)
    #[serde(default)]
    pub confidence_level: ConfidenceLevel,

    /// `sequential` or `parallel`
    #[serde(default)]
    pub execution: ExecutionMode,

    /// Consecutive trials accumulated together
    #[serde(default = "default_block_size")]
    pub block_size: u64,
}

impl SimulationConfig {
    /// Validate simulation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trials == 0 {
            return Err(ValidationError::InvalidTrialCount);
        }
        if self.block_size == 0 {
            return Err(ValidationError::InvalidBlockSize);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            confidence_level: ConfidenceLevel::default(),
            execution: ExecutionMode::default(),
            block_size: default_block_size(),
        }
    }
}

impl From<&SimulationConfig> for SimulationSettings {
    fn from(config: &SimulationConfig) -> Self {
        SimulationSettings {
            trials: config.trials,
            seed: config.seed,
            confidence_level: config.confidence_level,
            execution: config.execution,
            block_size: config.block_size,
        }
    }
}

fn default_trials() -> u64 {
    DEFAULT_TRIALS
}

fn default_block_size() -> u64 {
    DEFAULT_BLOCK_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_defaults() {
        let config: SimulationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.trials, 10_000);
        assert_eq!(config.seed, None);
        assert_eq!(config.confidence_level.value(), 0.90);
        assert_eq!(config.execution, ExecutionMode::Parallel);
        assert_eq!(config.block_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let config = SimulationConfig {
            trials: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTrialCount));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let config = SimulationConfig {
            block_size: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBlockSize));
    }

    #[test]
    fn test_confidence_level_out_of_range_fails_to_parse() {
        let result = serde_json::from_str::<SimulationConfig>(r#"{"confidence_level": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_into_settings() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{"trials": 500, "seed": 9, "confidence_level": 0.8, "execution": "sequential"}"#,
        )
        .unwrap();
        let settings = SimulationSettings::from(&config);
        assert_eq!(settings.trials, 500);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.confidence_level.value(), 0.8);
        assert_eq!(settings.execution, ExecutionMode::Sequential);
        assert_eq!(settings.block_size, 1024);
    }
}

//! Sensitivity analysis configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::sensitivity::SensitivitySettings;

/// Sensitivity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SensitivityConfig {
    /// Dispersion multiplier for the narrowed run
    #[serde(default = "default_down_factor")]
    pub down_factor: f64,

    /// Dispersion multiplier for the widened run
    #[serde(default = "default_up_factor")]
    pub up_factor: f64,
}

impl SensitivityConfig {
    /// Validate sensitivity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.down_factor.is_finite() && self.down_factor > 0.0 && self.down_factor < 1.0) {
            return Err(ValidationError::InvalidDownFactor(self.down_factor));
        }
        if !(self.up_factor.is_finite() && self.up_factor > 1.0) {
            return Err(ValidationError::InvalidUpFactor(self.up_factor));
        }
        Ok(())
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            down_factor: default_down_factor(),
            up_factor: default_up_factor(),
        }
    }
}

impl From<&SensitivityConfig> for SensitivitySettings {
    fn from(config: &SensitivityConfig) -> Self {
        SensitivitySettings {
            down_factor: config.down_factor,
            up_factor: config.up_factor,
        }
    }
}

fn default_down_factor() -> f64 {
    0.5
}

fn default_up_factor() -> f64 {
    2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_defaults() {
        let config = SensitivityConfig::default();
        assert_eq!(config.down_factor, 0.5);
        assert_eq!(config.up_factor, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_factor_bounds() {
        let down = SensitivityConfig {
            down_factor: 1.0,
            ..SensitivityConfig::default()
        };
        assert_eq!(down.validate(), Err(ValidationError::InvalidDownFactor(1.0)));

        let up = SensitivityConfig {
            up_factor: 0.9,
            ..SensitivityConfig::default()
        };
        assert_eq!(up.validate(), Err(ValidationError::InvalidUpFactor(0.9)));

        let nan = SensitivityConfig {
            up_factor: f64::NAN,
            ..SensitivityConfig::default()
        };
        assert!(nan.validate().is_err());
    }
}

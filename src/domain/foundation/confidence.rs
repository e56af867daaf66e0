//! Confidence level value object (open interval 0-1).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Two-sided coverage of a percentile confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// The default 90% level.
    pub const NINETY: Self = Self(0.90);

    /// Creates a confidence level, returning error unless strictly inside (0, 1).
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(value > 0.0 && value < 1.0) {
            return Err(ValidationError::out_of_range(
                "confidence_level",
                0.0,
                1.0,
                value,
            ));
        }
        Ok(Self(value))
    }

    /// Returns the level as a fraction.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Lower and upper quantile probabilities bounding the central interval.
    pub fn quantiles(&self) -> (f64, f64) {
        let tail = (1.0 - self.0) / 2.0;
        (tail, 1.0 - tail)
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0 * 100.0)
    }
}

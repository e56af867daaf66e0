//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

use super::DistributionSlot;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' contains duplicate value '{value}'")]
    Duplicate { field: String, value: String },

    #[error("Field '{field}' references unknown id {id}")]
    UnknownReference { field: String, id: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates a duplicate value validation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown reference validation error.
    pub fn unknown_reference(field: impl Into<String>, id: impl fmt::Display) -> Self {
        ValidationError::UnknownReference {
            field: field.into(),
            id: id.to_string(),
        }
    }
}

/// Moments a distribution may be asked for analytically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moment {
    Mean,
    Variance,
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::Mean => write!(f, "mean"),
            Moment::Variance => write!(f, "variance"),
        }
    }
}

/// Errors surfaced by the evaluation engine.
///
/// Every failure reflects a defect in the caller's input, so none of these
/// are retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("Invalid {kind} parameter '{parameter}': {reason}")]
    InvalidParameter {
        kind: &'static str,
        parameter: &'static str,
        reason: String,
    },

    #[error("Decision is incomplete: no distribution for {missing}")]
    IncompleteDecision { missing: DistributionSlot },

    #[error("Invalid decision: {0}")]
    InvalidDecision(ValidationError),

    #[error("Invalid settings: {0}")]
    InvalidSettings(ValidationError),

    #[error("Sampling failed{}: {reason}", describe_site(.trial, .slot))]
    SamplingFailure {
        trial: Option<u64>,
        slot: Option<DistributionSlot>,
        reason: String,
    },

    #[error("Cannot aggregate an empty trial set")]
    EmptyTrialSet,

    #[error("The {moment} of a {kind} distribution has no closed form")]
    UnsupportedAnalyticMoment { kind: &'static str, moment: Moment },

    #[error("Run cancelled after {completed_trials} trials")]
    Cancelled { completed_trials: u64 },

    #[error("Cannot transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

fn describe_site(trial: &Option<u64>, slot: &Option<DistributionSlot>) -> String {
    match (trial, slot) {
        (Some(trial), Some(slot)) => format!(" in trial {} for {}", trial, slot),
        (Some(trial), None) => format!(" in trial {}", trial),
        (None, Some(slot)) => format!(" for {}", slot),
        (None, None) => String::new(),
    }
}

impl SimulationError {
    /// Creates an invalid parameter error for a distribution kind.
    pub fn invalid_parameter(
        kind: &'static str,
        parameter: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        SimulationError::InvalidParameter {
            kind,
            parameter,
            reason: reason.into(),
        }
    }

    /// Creates a sampling failure attributed to one trial and one distribution.
    pub fn sampling_failure(trial: u64, slot: DistributionSlot, reason: impl Into<String>) -> Self {
        SimulationError::SamplingFailure {
            trial: Some(trial),
            slot: Some(slot),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SimulationError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            SimulationError::IncompleteDecision { .. } => ErrorCode::IncompleteDecision,
            SimulationError::InvalidDecision(_) => ErrorCode::InvalidDecision,
            SimulationError::InvalidSettings(_) => ErrorCode::InvalidSettings,
            SimulationError::SamplingFailure { .. } => ErrorCode::SamplingFailure,
            SimulationError::EmptyTrialSet => ErrorCode::EmptyTrialSet,
            SimulationError::UnsupportedAnalyticMoment { .. } => {
                ErrorCode::UnsupportedAnalyticMoment
            }
            SimulationError::Cancelled { .. } => ErrorCode::Cancelled,
            SimulationError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
        }
    }
}

/// Error codes for mapping engine failures onto external transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidParameter,
    IncompleteDecision,
    InvalidDecision,
    InvalidSettings,
    SamplingFailure,
    EmptyTrialSet,
    UnsupportedAnalyticMoment,
    Cancelled,
    InvalidStateTransition,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::IncompleteDecision => "INCOMPLETE_DECISION",
            ErrorCode::InvalidDecision => "INVALID_DECISION",
            ErrorCode::InvalidSettings => "INVALID_SETTINGS",
            ErrorCode::SamplingFailure => "SAMPLING_FAILURE",
            ErrorCode::EmptyTrialSet => "EMPTY_TRIAL_SET",
            ErrorCode::UnsupportedAnalyticMoment => "UNSUPPORTED_ANALYTIC_MOMENT",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CriterionId, OptionId};

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("option.name");
        assert_eq!(format!("{}", err), "Field 'option.name' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("confidence_level", 0.0, 1.0, 1.5);
        assert_eq!(
            format!("{}", err),
            "Field 'confidence_level' must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn invalid_parameter_displays_kind_and_parameter() {
        let err = SimulationError::invalid_parameter("uniform", "low", "must not exceed high");
        assert_eq!(
            format!("{}", err),
            "Invalid uniform parameter 'low': must not exceed high"
        );
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn sampling_failure_names_trial_and_slot() {
        let criterion = CriterionId::new();
        let err = SimulationError::sampling_failure(
            7,
            DistributionSlot::Weight { criterion },
            "non-finite draw",
        );
        let text = format!("{}", err);
        assert!(text.starts_with("Sampling failed in trial 7 for weight of criterion"));
        assert!(text.ends_with(": non-finite draw"));
    }

    #[test]
    fn sampling_failure_without_site_is_terse() {
        let err = SimulationError::SamplingFailure {
            trial: None,
            slot: None,
            reason: "rejection limit reached".to_string(),
        };
        assert_eq!(format!("{}", err), "Sampling failed: rejection limit reached");
    }

    #[test]
    fn incomplete_decision_names_missing_pair() {
        let option = OptionId::new();
        let criterion = CriterionId::new();
        let err = SimulationError::IncompleteDecision {
            missing: DistributionSlot::Score { option, criterion },
        };
        let text = format!("{}", err);
        assert!(text.contains(&option.to_string()));
        assert!(text.contains(&criterion.to_string()));
        assert_eq!(err.code(), ErrorCode::IncompleteDecision);
    }

    #[test]
    fn unsupported_moment_displays_moment() {
        let err = SimulationError::UnsupportedAnalyticMoment {
            kind: "truncated normal",
            moment: Moment::Variance,
        };
        assert_eq!(
            format!("{}", err),
            "The variance of a truncated normal distribution has no closed form"
        );
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::EmptyTrialSet), "EMPTY_TRIAL_SET");
        assert_eq!(
            format!("{}", ErrorCode::UnsupportedAnalyticMoment),
            "UNSUPPORTED_ANALYTIC_MOMENT"
        );
    }
}

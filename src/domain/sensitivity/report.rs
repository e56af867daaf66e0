//! Sensitivity report types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DistributionSlot, OptionId};
use crate::domain::simulation::OptionSummary;

/// How one option reacted to the perturbation of one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSensitivity {
    pub option_id: OptionId,
    pub name: String,
    pub baseline_rank1: f64,
    pub down_rank1: f64,
    pub up_rank1: f64,
    pub baseline_expected_score: f64,
    pub down_expected_score: f64,
    pub up_expected_score: f64,
}

impl OptionSensitivity {
    pub(crate) fn from_summaries(
        baseline: &OptionSummary,
        down: &OptionSummary,
        up: &OptionSummary,
    ) -> Self {
        Self {
            option_id: baseline.option_id,
            name: baseline.name.clone(),
            baseline_rank1: baseline.rank1_probability(),
            down_rank1: down.rank1_probability(),
            up_rank1: up.rank1_probability(),
            baseline_expected_score: baseline.expected_score,
            down_expected_score: down.expected_score,
            up_expected_score: up.expected_score,
        }
    }

    /// Change in rank-1 probability when dispersion shrinks.
    pub fn rank1_delta_down(&self) -> f64 {
        self.down_rank1 - self.baseline_rank1
    }

    /// Change in rank-1 probability when dispersion grows.
    pub fn rank1_delta_up(&self) -> f64 {
        self.up_rank1 - self.baseline_rank1
    }

    pub fn expected_score_delta_down(&self) -> f64 {
        self.down_expected_score - self.baseline_expected_score
    }

    pub fn expected_score_delta_up(&self) -> f64 {
        self.up_expected_score - self.baseline_expected_score
    }

    /// Largest absolute rank-1 change in either direction.
    pub fn max_rank1_shift(&self) -> f64 {
        self.rank1_delta_down().abs().max(self.rank1_delta_up().abs())
    }
}

/// One-at-a-time result for a single input distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub target: DistributionSlot,
    pub down_factor: f64,
    pub up_factor: f64,
    /// Master seed shared by the baseline and both perturbed runs.
    pub seed: u64,
    pub trials: u64,
    /// In decision option order.
    pub options: Vec<OptionSensitivity>,
}

impl SensitivityReport {
    pub fn option(&self, id: &OptionId) -> Option<&OptionSensitivity> {
        self.options.iter().find(|o| &o.option_id == id)
    }

    /// Largest rank-1 shift over all options; how much this input matters.
    pub fn max_rank1_shift(&self) -> f64 {
        self.options
            .iter()
            .map(OptionSensitivity::max_rank1_shift)
            .fold(0.0, f64::max)
    }
}

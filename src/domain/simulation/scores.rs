//! Score Matrix Sampler - one oriented score per (option, criterion) per trial.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::decision::{Criterion, Decision};
use crate::domain::distribution::Distribution;
use crate::domain::foundation::{CriterionId, DistributionSlot, OptionId, SimulationError};

/// Scores for one trial, already oriented so that larger is better.
///
/// Stored row-major: one row per option, one column per criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    options: Arc<[OptionId]>,
    criteria: Arc<[CriterionId]>,
    values: Vec<f64>,
}

impl ScoreMatrix {
    pub fn options(&self) -> &[OptionId] {
        &self.options
    }

    pub fn criteria(&self) -> &[CriterionId] {
        &self.criteria
    }

    /// Scores of the option at `index`, in criterion order.
    pub fn row(&self, index: usize) -> &[f64] {
        let width = self.criteria.len();
        &self.values[index * width..(index + 1) * width]
    }

    /// Score of one option on one criterion.
    pub fn get(&self, option: &OptionId, criterion: &CriterionId) -> Option<f64> {
        let row = self.options.iter().position(|o| o == option)?;
        let column = self.criteria.iter().position(|c| c == criterion)?;
        Some(self.values[row * self.criteria.len() + column])
    }
}

/// Samples score matrices for one decision.
#[derive(Debug, Clone)]
pub struct ScoreMatrixSampler {
    options: Arc<[OptionId]>,
    criteria: Vec<Criterion>,
    criterion_ids: Arc<[CriterionId]>,
    /// Row-major, same layout as [`ScoreMatrix`].
    distributions: Vec<Distribution>,
}

impl ScoreMatrixSampler {
    /// Resolves the score distribution of every (option, criterion) pair,
    /// option by option.
    ///
    /// Fails with `IncompleteDecision` on the first pair without one.
    pub fn new(decision: &Decision) -> Result<Self, SimulationError> {
        let mut distributions =
            Vec::with_capacity(decision.option_count() * decision.criterion_count());
        for option in &decision.options {
            for criterion in &decision.criteria {
                let distribution = decision.score(&option.id, &criterion.id).ok_or(
                    SimulationError::IncompleteDecision {
                        missing: DistributionSlot::Score {
                            option: option.id,
                            criterion: criterion.id,
                        },
                    },
                )?;
                distributions.push(*distribution);
            }
        }

        Ok(Self {
            options: decision.options.iter().map(|o| o.id).collect(),
            criterion_ids: decision.criteria.iter().map(|c| c.id).collect(),
            criteria: decision.criteria.clone(),
            distributions,
        })
    }

    /// Draws every score and applies each criterion's direction.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        trial: u64,
    ) -> Result<ScoreMatrix, SimulationError> {
        let width = self.criteria.len();
        let mut values = Vec::with_capacity(self.distributions.len());
        for (cell, distribution) in self.distributions.iter().enumerate() {
            let option = self.options[cell / width];
            let criterion = &self.criteria[cell % width];
            let slot = DistributionSlot::Score {
                option,
                criterion: criterion.id,
            };
            let raw = distribution
                .sample(rng)
                .map_err(|e| SimulationError::sampling_failure(trial, slot, e.reason))?;
            let oriented = criterion
                .orient(raw)
                .map_err(|reason| SimulationError::sampling_failure(trial, slot, reason))?;
            values.push(oriented);
        }

        Ok(ScoreMatrix {
            options: Arc::clone(&self.options),
            criteria: Arc::clone(&self.criterion_ids),
            values,
        })
    }
}

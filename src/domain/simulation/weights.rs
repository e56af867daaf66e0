//! Weight Vector Sampler - one normalized weight per criterion per trial.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::decision::Decision;
use crate::domain::distribution::Distribution;
use crate::domain::foundation::{CriterionId, DistributionSlot, SimulationError};

/// Raw weight draws at or below zero are clamped to this value before
/// normalization. A weight distribution that often yields non-positive draws
/// is a modelling error, not a runtime fault.
pub const WEIGHT_FLOOR: f64 = 1e-9;

/// Criterion weights for one trial. Entries are positive and sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    criteria: Arc<[CriterionId]>,
    values: Vec<f64>,
}

impl WeightVector {
    /// Weights in criterion order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Criterion ids in the same order as [`WeightVector::values`].
    pub fn criteria(&self) -> &[CriterionId] {
        &self.criteria
    }

    /// Weight of one criterion.
    pub fn get(&self, criterion: &CriterionId) -> Option<f64> {
        self.criteria
            .iter()
            .position(|c| c == criterion)
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Samples weight vectors for one decision.
#[derive(Debug, Clone)]
pub struct WeightVectorSampler {
    criteria: Arc<[CriterionId]>,
    distributions: Vec<Distribution>,
}

impl WeightVectorSampler {
    /// Resolves the weight distribution of every criterion, in order.
    ///
    /// Fails with `IncompleteDecision` on the first criterion without one.
    pub fn new(decision: &Decision) -> Result<Self, SimulationError> {
        let distributions = decision
            .criteria
            .iter()
            .map(|c| {
                decision
                    .weight(&c.id)
                    .copied()
                    .ok_or(SimulationError::IncompleteDecision {
                        missing: DistributionSlot::Weight { criterion: c.id },
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            criteria: decision.criteria.iter().map(|c| c.id).collect(),
            distributions,
        })
    }

    /// Draws one raw weight per criterion, clamps non-positive draws to
    /// [`WEIGHT_FLOOR`] and normalizes to sum 1.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        trial: u64,
    ) -> Result<WeightVector, SimulationError> {
        let mut values = Vec::with_capacity(self.distributions.len());
        for (criterion, distribution) in self.criteria.iter().zip(&self.distributions) {
            let raw = distribution.sample(rng).map_err(|e| {
                SimulationError::sampling_failure(
                    trial,
                    DistributionSlot::Weight {
                        criterion: *criterion,
                    },
                    e.reason,
                )
            })?;
            values.push(if raw > 0.0 { raw } else { WEIGHT_FLOOR });
        }

        let total: f64 = values.iter().sum();
        if !total.is_finite() {
            return Err(SimulationError::SamplingFailure {
                trial: Some(trial),
                slot: None,
                reason: format!("raw weights sum to {}, cannot normalize", total),
            });
        }
        for value in &mut values {
            *value /= total;
        }

        Ok(WeightVector {
            criteria: Arc::clone(&self.criteria),
            values,
        })
    }
}

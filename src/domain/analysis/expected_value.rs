//! Expected Value Ranking - point-estimate weighted scoring.
//!
//! Scores every option with the analytic means of its distributions. This is
//! the single deterministic answer a probabilistic run is compared against.

use serde::{Deserialize, Serialize};

use crate::domain::decision::Decision;
use crate::domain::foundation::{DistributionSlot, OptionId, SimulationError, ValidationError};
use crate::domain::simulation::{TrialEvaluator, WEIGHT_FLOOR};

/// One option's place in the expected-value ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOption {
    pub option_id: OptionId,
    pub name: String,
    pub expected_total: f64,
    /// Competition rank, 1 = best.
    pub rank: u32,
}

/// Options ordered by weighted total of mean scores, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValueRanking {
    pub options: Vec<RankedOption>,
}

impl ExpectedValueRanking {
    /// Computes the ranking.
    ///
    /// # Algorithm
    /// - weight[c] = mean of the weight distribution, non-positive means
    ///   clamped like sampled weights, then normalized
    /// - total[o] = Σ weight[c] × orient(mean of score[o, c])
    /// - sorted descending; ties share a rank and keep decision order
    ///
    /// # Errors
    /// - `InvalidDecision` / `IncompleteDecision` as for a simulation run
    /// - `UnsupportedAnalyticMoment` when any distribution lacks a closed-form
    ///   mean (truncated normal)
    pub fn compute(decision: &Decision) -> Result<Self, SimulationError> {
        decision.validate().map_err(SimulationError::InvalidDecision)?;
        if let Some(missing) = decision.first_missing() {
            return Err(SimulationError::IncompleteDecision { missing });
        }

        let mut weights = Vec::with_capacity(decision.criterion_count());
        for criterion in &decision.criteria {
            let mean = decision
                .weight(&criterion.id)
                .ok_or(SimulationError::IncompleteDecision {
                    missing: DistributionSlot::Weight {
                        criterion: criterion.id,
                    },
                })?
                .mean()?;
            weights.push(if mean > 0.0 { mean } else { WEIGHT_FLOOR });
        }
        let weight_sum: f64 = weights.iter().sum();

        let mut totals = Vec::with_capacity(decision.option_count());
        for option in &decision.options {
            let mut total = 0.0;
            for (criterion, weight) in decision.criteria.iter().zip(&weights) {
                let mean = decision
                    .score(&option.id, &criterion.id)
                    .ok_or(SimulationError::IncompleteDecision {
                        missing: DistributionSlot::Score {
                            option: option.id,
                            criterion: criterion.id,
                        },
                    })?
                    .mean()?;
                let oriented = criterion.orient(mean).map_err(|_| {
                    SimulationError::InvalidDecision(ValidationError::out_of_range(
                        "score mean under reciprocal transform",
                        0.0,
                        f64::MAX,
                        mean,
                    ))
                })?;
                total += weight / weight_sum * oriented;
            }
            totals.push(total);
        }

        let ranks = TrialEvaluator::competition_ranks(&totals);
        let mut options: Vec<RankedOption> = decision
            .options
            .iter()
            .zip(totals)
            .zip(ranks)
            .map(|((option, expected_total), rank)| RankedOption {
                option_id: option.id,
                name: option.name.clone(),
                expected_total,
                rank,
            })
            .collect();
        options.sort_by_key(|o| o.rank);

        Ok(Self { options })
    }

    /// Top-ranked option (first in decision order among ties).
    pub fn best(&self) -> Option<&RankedOption> {
        self.options.first()
    }

    pub fn rank_of(&self, option: &OptionId) -> Option<u32> {
        self.options
            .iter()
            .find(|o| &o.option_id == option)
            .map(|o| o.rank)
    }
}

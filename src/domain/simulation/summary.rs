//! Simulation summary types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConfidenceLevel, OptionId};

/// Percentile interval of an option's total score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Statistics of one option over all trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSummary {
    pub option_id: OptionId,
    pub name: String,
    pub expected_score: f64,
    pub score_variance: f64,
    pub confidence_interval: ConfidenceInterval,
    /// Entry `k` is P(rank == k + 1).
    pub rank_probabilities: Vec<f64>,
}

impl OptionSummary {
    /// Probability of being ranked first.
    pub fn rank1_probability(&self) -> f64 {
        self.rank_probabilities.first().copied().unwrap_or(0.0)
    }

    /// Probability of the given 1-based rank.
    pub fn probability_of_rank(&self, rank: usize) -> f64 {
        rank.checked_sub(1)
            .and_then(|i| self.rank_probabilities.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Mean rank over all trials.
    pub fn expected_rank(&self) -> f64 {
        self.rank_probabilities
            .iter()
            .enumerate()
            .map(|(i, p)| (i + 1) as f64 * p)
            .sum()
    }

    pub fn score_std_dev(&self) -> f64 {
        self.score_variance.sqrt()
    }
}

/// Output of one Monte Carlo run.
///
/// Identical for a fixed decision, seed and trial count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Master seed the run used, generated or supplied.
    pub seed: u64,
    pub trials: u64,
    pub confidence_level: ConfidenceLevel,
    /// In decision option order.
    pub options: Vec<OptionSummary>,
}

impl SimulationSummary {
    /// Looks up one option.
    pub fn option(&self, id: &OptionId) -> Option<&OptionSummary> {
        self.options.iter().find(|o| &o.option_id == id)
    }

    /// Looks up one option by name.
    pub fn option_named(&self, name: &str) -> Option<&OptionSummary> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Option with the highest rank-1 probability; earliest option wins ties.
    pub fn most_likely_winner(&self) -> Option<&OptionSummary> {
        self.options.iter().fold(None, |best, candidate| match best {
            Some(b) if b.rank1_probability() >= candidate.rank1_probability() => Some(b),
            _ => Some(candidate),
        })
    }

    /// Serializes the summary as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

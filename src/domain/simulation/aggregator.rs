//! Aggregator - reduces trials into per-option statistics.
//!
//! Partials built over disjoint trial ranges can be merged, which is how
//! worker-local accumulation is combined after a parallel run.

use tracing::debug;

use super::summary::{ConfidenceInterval, OptionSummary, SimulationSummary};
use super::TrialResult;
use crate::domain::decision::DecisionOption;
use crate::domain::foundation::{ConfidenceLevel, SimulationError};

/// Running mean and sum of squared deviations (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Pairwise combination of two disjoint partials (Chan et al.).
    fn merge(&mut self, other: &RunningMoments) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
    }

    /// Unbiased sample variance; zero for a single observation.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }
}

/// Accumulates trial results for a fixed set of options.
///
/// Holds running moments and rank histograms per option, plus every total
/// so the confidence interval can be read from the empirical distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    trials: u64,
    moments: Vec<RunningMoments>,
    /// `rank_counts[option][rank - 1]`
    rank_counts: Vec<Vec<u64>>,
    totals: Vec<Vec<f64>>,
}

impl Aggregator {
    /// Creates an empty aggregator for `option_count` options.
    pub fn new(option_count: usize) -> Self {
        Self {
            trials: 0,
            moments: vec![RunningMoments::default(); option_count],
            rank_counts: vec![vec![0; option_count]; option_count],
            totals: vec![Vec::new(); option_count],
        }
    }

    /// Aggregates a batch of trial results in one go.
    pub fn from_trials<'a>(
        option_count: usize,
        trials: impl IntoIterator<Item = &'a TrialResult>,
    ) -> Self {
        let mut aggregator = Self::new(option_count);
        for trial in trials {
            aggregator.record(trial);
        }
        aggregator
    }

    /// Number of trials recorded so far.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Folds one trial into the running statistics.
    pub fn record(&mut self, trial: &TrialResult) {
        self.trials += 1;
        for (option, (&total, &rank)) in trial.totals.iter().zip(&trial.ranks).enumerate() {
            self.moments[option].push(total);
            self.rank_counts[option][rank as usize - 1] += 1;
            self.totals[option].push(total);
        }
    }

    /// Merges a partial covering trials recorded after this one's.
    ///
    /// Floating-point sums are order-sensitive: merging the same partials in
    /// the same order always gives bit-identical results.
    pub fn merge(&mut self, other: Aggregator) {
        self.trials += other.trials;
        for (mine, theirs) in self.moments.iter_mut().zip(&other.moments) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.rank_counts.iter_mut().zip(&other.rank_counts) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        for (mine, theirs) in self.totals.iter_mut().zip(other.totals) {
            mine.extend(theirs);
        }
    }

    /// Produces the summary.
    ///
    /// `options` must be in the order the trials were evaluated in.
    ///
    /// # Errors
    /// - `EmptyTrialSet` if no trial was recorded
    pub fn finish(
        self,
        options: &[DecisionOption],
        confidence_level: ConfidenceLevel,
        seed: u64,
    ) -> Result<SimulationSummary, SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::EmptyTrialSet);
        }

        let n = self.trials as f64;
        let (lower_q, upper_q) = confidence_level.quantiles();
        let summaries = options
            .iter()
            .zip(self.moments)
            .zip(self.rank_counts)
            .zip(self.totals)
            .map(|(((option, moments), counts), mut totals)| {
                totals.sort_by(f64::total_cmp);
                OptionSummary {
                    option_id: option.id,
                    name: option.name.clone(),
                    expected_score: moments.mean,
                    score_variance: moments.variance(),
                    confidence_interval: ConfidenceInterval {
                        lower: percentile(&totals, lower_q),
                        upper: percentile(&totals, upper_q),
                    },
                    rank_probabilities: counts.iter().map(|&c| c as f64 / n).collect(),
                }
            })
            .collect();

        debug!(trials = self.trials, options = options.len(), "Aggregated trials");

        Ok(SimulationSummary {
            seed,
            trials: self.trials,
            confidence_level,
            options: summaries,
        })
    }
}

/// Linear interpolation between closest ranks over sorted data.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

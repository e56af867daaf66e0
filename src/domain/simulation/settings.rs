//! Run settings for the Monte Carlo engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConfidenceLevel, ValidationError};

/// Default number of trials per run.
pub const DEFAULT_TRIALS: u64 = 10_000;

/// Default number of consecutive trials accumulated together.
pub const DEFAULT_BLOCK_SIZE: u64 = 1024;

/// How trial blocks are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One block after another on the calling thread.
    Sequential,
    /// Blocks spread over the rayon thread pool.
    #[default]
    Parallel,
}

/// Inputs of one run besides the decision.
///
/// Summaries depend on `trials`, `seed`, `confidence_level` and
/// `block_size`, never on `execution`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub trials: u64,
    /// Generated per run when absent, then reported in the summary.
    pub seed: Option<u64>,
    pub confidence_level: ConfidenceLevel,
    pub execution: ExecutionMode,
    pub block_size: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            confidence_level: ConfidenceLevel::default(),
            execution: ExecutionMode::default(),
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl SimulationSettings {
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Validates settings the engine cannot run with.
    ///
    /// A trial count of zero is accepted here; the run then fails with
    /// `EmptyTrialSet` when aggregating.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.block_size == 0 {
            return Err(ValidationError::out_of_range(
                "block_size",
                1.0,
                u64::MAX as f64,
                0.0,
            ));
        }
        Ok(())
    }

    /// Number of blocks covering all trials.
    pub(crate) fn block_count(&self) -> u64 {
        self.trials.div_ceil(self.block_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = SimulationSettings::default();
        assert_eq!(s.trials, 10_000);
        assert_eq!(s.seed, None);
        assert_eq!(s.confidence_level.value(), 0.90);
        assert_eq!(s.execution, ExecutionMode::Parallel);
        assert_eq!(s.block_size, 1024);
    }

    #[test]
    fn block_count_rounds_up() {
        let s = SimulationSettings::default().with_block_size(100);
        assert_eq!(s.with_trials(0).block_count(), 0);
        assert_eq!(s.with_trials(100).block_count(), 1);
        assert_eq!(s.with_trials(101).block_count(), 2);
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let s = SimulationSettings::default().with_block_size(0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn execution_mode_uses_snake_case() {
        let json = serde_json::to_string(&ExecutionMode::Sequential).unwrap();
        assert_eq!(json, "\"sequential\"");
    }
}

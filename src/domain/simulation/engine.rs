//! Monte Carlo Engine - runs N independent trials and aggregates them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use super::{
    generate_seed, trial_rng, Aggregator, CancellationToken, ExecutionMode, ScoreMatrixSampler,
    SimulationSettings, SimulationSummary, TrialEvaluator, TrialResult, WeightVectorSampler,
};
use crate::domain::decision::{Decision, DecisionOption};
use crate::domain::foundation::{SimulationError, StateMachine, ValidationError};

/// Lifecycle of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Configured,
    Running,
    Completed,
    Failed,
}

impl StateMachine for RunStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RunStatus::*;
        match self {
            Configured => vec![Running],
            Running => vec![Completed, Failed],
            Completed => vec![],
            Failed => vec![],
        }
    }
}

/// Why a block stopped early.
enum BlockAbort {
    Cancelled { completed: u64 },
    Failed(SimulationError),
    /// A lower-indexed block already failed; this block's work cannot be used.
    Superseded,
}

/// Lowest index of a failed block, shared by all workers of one run.
///
/// Only blocks above the recorded index stop, so the lowest failing block
/// always runs to its failure and the reported error does not depend on
/// scheduling.
struct FailedBlock(AtomicU64);

impl FailedBlock {
    fn none() -> Self {
        Self(AtomicU64::new(u64::MAX))
    }

    fn record(&self, block: u64) {
        self.0.fetch_min(block, Ordering::Relaxed);
    }

    fn precedes(&self, block: u64) -> bool {
        self.0.load(Ordering::Relaxed) < block
    }
}

/// Runs one simulation over a decision snapshot.
///
/// Trials are grouped into blocks of `block_size` consecutive indices. Each
/// block is accumulated on its own and the partials are merged in block
/// order, so the summary is the same whether blocks run sequentially or on
/// any number of workers.
#[derive(Debug)]
pub struct MonteCarloEngine {
    options: Vec<DecisionOption>,
    weights: WeightVectorSampler,
    scores: ScoreMatrixSampler,
    settings: SimulationSettings,
    seed: u64,
    status: RunStatus,
    summary: Option<SimulationSummary>,
    failure: Option<SimulationError>,
}

impl MonteCarloEngine {
    /// Validates the decision and settings and fixes the master seed.
    ///
    /// # Errors
    /// - `InvalidSettings` for unusable settings
    /// - `InvalidDecision` for structural defects
    /// - `IncompleteDecision` naming the first missing distribution
    pub fn configure(
        decision: &Decision,
        settings: SimulationSettings,
    ) -> Result<Self, SimulationError> {
        settings.validate().map_err(SimulationError::InvalidSettings)?;
        decision.validate().map_err(SimulationError::InvalidDecision)?;
        if let Some(missing) = decision.first_missing() {
            return Err(SimulationError::IncompleteDecision { missing });
        }

        Ok(Self {
            options: decision.options.clone(),
            weights: WeightVectorSampler::new(decision)?,
            scores: ScoreMatrixSampler::new(decision)?,
            seed: settings.seed.unwrap_or_else(generate_seed),
            settings,
            status: RunStatus::Configured,
            summary: None,
            failure: None,
        })
    }

    /// Configures and runs in one step.
    pub fn simulate(
        decision: &Decision,
        settings: SimulationSettings,
    ) -> Result<SimulationSummary, SimulationError> {
        Self::configure(decision, settings)?.run()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Master seed of this run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Summary of a completed run.
    pub fn summary(&self) -> Option<&SimulationSummary> {
        self.summary.as_ref()
    }

    /// Error that failed the run.
    pub fn failure(&self) -> Option<&SimulationError> {
        self.failure.as_ref()
    }

    /// Runs all trials.
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        self.run_with_cancellation(&CancellationToken::new())
    }

    /// Runs all trials, checking `token` before each one.
    ///
    /// Any failure discards all partial results and leaves the engine
    /// `Failed`.
    ///
    /// # Errors
    /// - `InvalidStateTransition` unless the engine is `Configured`
    /// - `SamplingFailure` from the lowest failing trial index
    /// - `Cancelled` when the token was set
    /// - `EmptyTrialSet` when `trials` is zero
    pub fn run_with_cancellation(
        &mut self,
        token: &CancellationToken,
    ) -> Result<SimulationSummary, SimulationError> {
        self.status = self.status.transition_to(RunStatus::Running)?;
        let started = Instant::now();

        info!(
            trials = self.settings.trials,
            seed = self.seed,
            execution = ?self.settings.execution,
            block_size = self.settings.block_size,
            "Starting simulation"
        );

        match self.execute(token) {
            Ok(summary) => {
                self.status = self.status.transition_to(RunStatus::Completed)?;
                info!(
                    trials = summary.trials,
                    seed = self.seed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Simulation completed"
                );
                self.summary = Some(summary.clone());
                Ok(summary)
            }
            Err(err) => {
                self.status = self.status.transition_to(RunStatus::Failed)?;
                warn!(
                    code = %err.code(),
                    error = %err,
                    seed = self.seed,
                    "Simulation failed"
                );
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Recomputes one trial of this run in isolation.
    ///
    /// Gives the same result the run itself produced for `index`.
    pub fn replay_trial(&self, index: u64) -> Result<TrialResult, SimulationError> {
        if index >= self.settings.trials {
            return Err(SimulationError::InvalidSettings(ValidationError::out_of_range(
                "trial",
                0.0,
                self.settings.trials.saturating_sub(1) as f64,
                index as f64,
            )));
        }
        self.run_trial(index)
    }

    fn run_trial(&self, index: u64) -> Result<TrialResult, SimulationError> {
        let mut rng = trial_rng(self.seed, index);
        let weights = self.weights.sample(&mut rng, index)?;
        let scores = self.scores.sample(&mut rng, index)?;
        Ok(TrialEvaluator::evaluate(index, weights, scores))
    }

    fn run_block(
        &self,
        block: u64,
        token: &CancellationToken,
        failed: &FailedBlock,
    ) -> Result<Aggregator, BlockAbort> {
        let start = block * self.settings.block_size;
        let end = (start + self.settings.block_size).min(self.settings.trials);
        let mut partial = Aggregator::new(self.options.len());
        for index in start..end {
            if failed.precedes(block) {
                return Err(BlockAbort::Superseded);
            }
            if token.is_cancelled() {
                return Err(BlockAbort::Cancelled {
                    completed: partial.trials(),
                });
            }
            match self.run_trial(index) {
                Ok(trial) => partial.record(&trial),
                Err(err) => {
                    failed.record(block);
                    return Err(BlockAbort::Failed(err));
                }
            }
        }
        Ok(partial)
    }

    fn execute(&self, token: &CancellationToken) -> Result<SimulationSummary, SimulationError> {
        let blocks = self.settings.block_count();
        let failed = FailedBlock::none();
        let outcomes: Vec<Result<Aggregator, BlockAbort>> = match self.settings.execution {
            ExecutionMode::Sequential => {
                let mut outcomes = Vec::new();
                for block in 0..blocks {
                    let outcome = self.run_block(block, token, &failed);
                    let stop = outcome.is_err();
                    outcomes.push(outcome);
                    if stop {
                        break;
                    }
                }
                outcomes
            }
            ExecutionMode::Parallel => (0..blocks as usize)
                .into_par_iter()
                .map(|block| self.run_block(block as u64, token, &failed))
                .collect(),
        };

        let mut total = Aggregator::new(self.options.len());
        let mut completed = 0;
        let mut cancelled = false;
        for outcome in outcomes {
            match outcome {
                Ok(partial) => {
                    completed += partial.trials();
                    total.merge(partial);
                }
                Err(BlockAbort::Cancelled { completed: done }) => {
                    completed += done;
                    cancelled = true;
                }
                Err(BlockAbort::Failed(err)) => return Err(err),
                // Only blocks after a failed one are superseded, and that
                // failure has already been returned above.
                Err(BlockAbort::Superseded) => {}
            }
        }
        if cancelled {
            return Err(SimulationError::Cancelled {
                completed_trials: completed,
            });
        }

        total.finish(&self.options, self.settings.confidence_level, self.seed)
    }
}

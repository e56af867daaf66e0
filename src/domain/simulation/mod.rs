//! Simulation Module - Monte Carlo evaluation of a decision.
//!
//! # Components
//!
//! - `WeightVectorSampler` - Normalized weight vector per trial
//! - `ScoreMatrixSampler` - Oriented option × criterion scores per trial
//! - `TrialEvaluator` - Weighted totals and competition ranks
//! - `MonteCarloEngine` - Runs N trials over private rng streams
//! - `Aggregator` - Reduces trials into a `SimulationSummary`
//!
//! # Determinism
//!
//! Each trial reads only the decision and its own ChaCha stream derived from
//! the master seed and trial index. Combined with block-ordered merging in
//! the engine, a fixed decision, seed and trial count always produce the
//! same summary.

mod aggregator;
mod cancellation;
mod engine;
mod rng;
mod scores;
mod settings;
mod summary;
mod trial;
mod weights;

pub use aggregator::Aggregator;
pub use cancellation::CancellationToken;
pub use engine::{MonteCarloEngine, RunStatus};
pub use rng::{generate_seed, trial_rng, TrialRng};
pub use scores::{ScoreMatrix, ScoreMatrixSampler};
pub use settings::{ExecutionMode, SimulationSettings, DEFAULT_BLOCK_SIZE, DEFAULT_TRIALS};
pub use summary::{ConfidenceInterval, OptionSummary, SimulationSummary};
pub use trial::{TrialEvaluator, TrialResult, TIE_TOLERANCE};
pub use weights::{WeightVector, WeightVectorSampler, WEIGHT_FLOOR};

//! Domain layer containing the evaluation engine.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, errors, state machine, confidence level)
//! - `decision` - The decision snapshot: options, criteria, distributions
//! - `distribution` - Sampleable probability models
//! - `simulation` - Samplers, trial evaluation, Monte Carlo engine, aggregation
//! - `sensitivity` - One-at-a-time sensitivity analysis
//! - `analysis` - Deterministic expected-value ranking

pub mod analysis;
pub mod decision;
pub mod distribution;
pub mod foundation;
pub mod sensitivity;
pub mod simulation;

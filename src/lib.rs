//! MCDA Sim - Probabilistic Multi-Criteria Decision Analysis
//!
//! This crate evaluates decisions whose criterion weights and option scores
//! are uncertain. A Monte Carlo engine samples both, ranks options per trial
//! and aggregates the trials into rank probabilities and score intervals;
//! a one-at-a-time analyzer shows which input uncertainties move the result.

pub mod config;
pub mod domain;
pub mod telemetry;

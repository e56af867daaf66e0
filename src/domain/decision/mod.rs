//! Decision Module - The snapshot handed to the engine.
//!
//! # Components
//!
//! - `Decision` - Root aggregate with options, criteria, and distributions
//! - `DecisionOption` / `Criterion` - Identity-bearing members
//! - `Direction` / `MinimizeTransform` - How minimized criteria are oriented
//! - `DecisionBuilder` - Name-based construction with validation

mod aggregate;
mod builder;
mod criterion;

pub use aggregate::Decision;
pub use builder::DecisionBuilder;
pub use criterion::{Criterion, DecisionOption, Direction, MinimizeTransform};

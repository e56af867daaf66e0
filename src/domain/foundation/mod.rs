//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the evaluation engine.

mod confidence;
mod errors;
mod ids;
mod slot;
mod state_machine;

pub use confidence::ConfidenceLevel;
pub use errors::{ErrorCode, Moment, SimulationError, ValidationError};
pub use ids::{CriterionId, DecisionId, OptionId};
pub use slot::DistributionSlot;
pub use state_machine::StateMachine;

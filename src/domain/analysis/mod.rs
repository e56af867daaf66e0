//! Analysis Module - Deterministic decision analysis.
//!
//! Pure functions over a decision snapshot, with no sampling involved.
//!
//! # Components
//!
//! - `ExpectedValueRanking` - Weighted scoring on analytic means

mod expected_value;

pub use expected_value::{ExpectedValueRanking, RankedOption};

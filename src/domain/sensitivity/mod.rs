//! Sensitivity Module - How much each input's uncertainty moves the outcome.
//!
//! One-at-a-time analysis: the target distribution's dispersion is scaled
//! down and up while every other distribution and the master seed stay
//! fixed, and rank-1 probabilities and expected scores are compared with
//! the baseline run.

mod analyzer;
mod report;

pub use analyzer::{SensitivityAnalyzer, SensitivitySettings};
pub use report::{OptionSensitivity, SensitivityReport};

//! Addresses of the distributions a decision holds.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CriterionId, OptionId};

/// Identifies one distribution inside a decision: the weight of a criterion
/// or the score of an option on a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSlot {
    Weight { criterion: CriterionId },
    Score { option: OptionId, criterion: CriterionId },
}

impl DistributionSlot {
    /// Returns the criterion this slot belongs to.
    pub fn criterion(&self) -> CriterionId {
        match self {
            DistributionSlot::Weight { criterion } => *criterion,
            DistributionSlot::Score { criterion, .. } => *criterion,
        }
    }

    /// Returns true if this slot addresses a weight distribution.
    pub fn is_weight(&self) -> bool {
        matches!(self, DistributionSlot::Weight { .. })
    }
}

impl fmt::Display for DistributionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionSlot::Weight { criterion } => {
                write!(f, "weight of criterion {}", criterion)
            }
            DistributionSlot::Score { option, criterion } => {
                write!(f, "score of option {} on criterion {}", option, criterion)
            }
        }
    }
}

//! Decision aggregate - the read-only snapshot the engine evaluates.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Criterion, DecisionBuilder, DecisionOption};
use crate::domain::distribution::Distribution;
use crate::domain::foundation::{
    CriterionId, DecisionId, DistributionSlot, OptionId, SimulationError, ValidationError,
};

/// Root aggregate: ordered options and criteria plus the weight and score
/// distributions keyed by them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<DecisionOption>,
    pub criteria: Vec<Criterion>,
    /// One weight distribution per criterion.
    #[serde(default)]
    pub weights: HashMap<CriterionId, Distribution>,
    /// Score distributions keyed by option, then criterion.
    #[serde(default)]
    pub scores: HashMap<OptionId, HashMap<CriterionId, Distribution>>,
}

impl Decision {
    /// Creates a builder that wires options, criteria and distributions by name.
    pub fn builder(name: impl Into<String>) -> DecisionBuilder {
        DecisionBuilder::new(name)
    }

    /// Returns the number of options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Returns the number of criteria.
    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Finds an option by name.
    pub fn option_named(&self, name: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Finds a criterion by name.
    pub fn criterion_named(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.name == name)
    }

    /// Gets the weight distribution for a criterion.
    pub fn weight(&self, criterion: &CriterionId) -> Option<&Distribution> {
        self.weights.get(criterion)
    }

    /// Gets the score distribution for an (option, criterion) pair.
    pub fn score(&self, option: &OptionId, criterion: &CriterionId) -> Option<&Distribution> {
        self.scores.get(option).and_then(|row| row.get(criterion))
    }

    /// Gets the distribution a slot addresses.
    pub fn distribution(&self, slot: &DistributionSlot) -> Option<&Distribution> {
        match slot {
            DistributionSlot::Weight { criterion } => self.weight(criterion),
            DistributionSlot::Score { option, criterion } => self.score(option, criterion),
        }
    }

    /// All slots a complete decision fills: weights in criterion order,
    /// then scores option by option.
    pub fn slots(&self) -> Vec<DistributionSlot> {
        let weights = self
            .criteria
            .iter()
            .map(|c| DistributionSlot::Weight { criterion: c.id });
        let scores = self.options.iter().flat_map(|o| {
            self.criteria.iter().map(move |c| DistributionSlot::Score {
                option: o.id,
                criterion: c.id,
            })
        });
        weights.chain(scores).collect()
    }

    /// Returns a copy with the distribution at `slot` replaced.
    ///
    /// The receiver is left untouched.
    pub fn with_distribution(
        &self,
        slot: &DistributionSlot,
        distribution: Distribution,
    ) -> Result<Decision, SimulationError> {
        if self.distribution(slot).is_none() {
            return Err(SimulationError::IncompleteDecision { missing: *slot });
        }
        let mut copy = self.clone();
        match slot {
            DistributionSlot::Weight { criterion } => {
                copy.weights.insert(*criterion, distribution);
            }
            DistributionSlot::Score { option, criterion } => {
                copy.scores
                    .entry(*option)
                    .or_default()
                    .insert(*criterion, distribution);
            }
        }
        Ok(copy)
    }

    /// Checks names, ids and references.
    ///
    /// Completeness of the distribution mappings is checked separately by
    /// [`Decision::first_missing`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("decision.name"));
        }
        if self.options.is_empty() {
            return Err(ValidationError::empty_field("decision.options"));
        }
        if self.criteria.is_empty() {
            return Err(ValidationError::empty_field("decision.criteria"));
        }

        let mut option_ids = HashSet::new();
        let mut option_names = HashSet::new();
        for option in &self.options {
            let name = option.name.trim();
            if name.is_empty() {
                return Err(ValidationError::empty_field("option.name"));
            }
            if !option_names.insert(name) {
                return Err(ValidationError::duplicate("option.name", name));
            }
            if !option_ids.insert(option.id) {
                return Err(ValidationError::duplicate("option.id", option.id.to_string()));
            }
        }

        let mut criterion_ids = HashSet::new();
        let mut criterion_names = HashSet::new();
        for criterion in &self.criteria {
            let name = criterion.name.trim();
            if name.is_empty() {
                return Err(ValidationError::empty_field("criterion.name"));
            }
            if !criterion_names.insert(name) {
                return Err(ValidationError::duplicate("criterion.name", name));
            }
            if !criterion_ids.insert(criterion.id) {
                return Err(ValidationError::duplicate(
                    "criterion.id",
                    criterion.id.to_string(),
                ));
            }
            if let super::Direction::Minimize {
                transform: super::MinimizeTransform::ReferenceMax { reference },
            } = criterion.direction
            {
                if !reference.is_finite() {
                    return Err(ValidationError::out_of_range(
                        "criterion.direction.reference",
                        f64::MIN,
                        f64::MAX,
                        reference,
                    ));
                }
            }
        }

        if let Some(id) = self.weights.keys().find(|id| !criterion_ids.contains(id)) {
            return Err(ValidationError::unknown_reference("weights", id));
        }
        for (option, row) in &self.scores {
            if !option_ids.contains(option) {
                return Err(ValidationError::unknown_reference("scores", option));
            }
            if let Some(id) = row.keys().find(|id| !criterion_ids.contains(id)) {
                return Err(ValidationError::unknown_reference("scores", id));
            }
        }

        Ok(())
    }

    /// First slot, in [`Decision::slots`] order, with no distribution.
    pub fn first_missing(&self) -> Option<DistributionSlot> {
        self.slots()
            .into_iter()
            .find(|slot| self.distribution(slot).is_none())
    }

    /// Returns true when every slot has a distribution.
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}

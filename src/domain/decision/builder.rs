//! Builder for constructing Decision instances by name.

use std::collections::HashMap;

use super::{Criterion, Decision, DecisionOption};
use crate::domain::distribution::Distribution;
use crate::domain::foundation::{DecisionId, ValidationError};

/// Builder for constructing Decision instances.
///
/// Options and criteria are referenced by name while wiring distributions;
/// names are resolved to ids in [`DecisionBuilder::build`].
#[derive(Debug)]
pub struct DecisionBuilder {
    name: String,
    description: String,
    options: Vec<DecisionOption>,
    criteria: Vec<Criterion>,
    weights: Vec<(String, Distribution)>,
    scores: Vec<(String, String, Distribution)>,
}

impl DecisionBuilder {
    /// Creates a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            options: Vec::new(),
            criteria: Vec::new(),
            weights: Vec::new(),
            scores: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an option with a fresh id.
    pub fn option(mut self, name: impl Into<String>) -> Self {
        self.options.push(DecisionOption::new(name));
        self
    }

    /// Adds a fully specified option.
    pub fn option_with(mut self, option: DecisionOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a criterion.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Sets the weight distribution of a criterion. Setting it twice fails
    /// the build.
    pub fn weight(mut self, criterion: impl Into<String>, distribution: Distribution) -> Self {
        self.weights.push((criterion.into(), distribution));
        self
    }

    /// Sets the score distribution of an option on a criterion. Setting it
    /// twice fails the build.
    pub fn score(
        mut self,
        option: impl Into<String>,
        criterion: impl Into<String>,
        distribution: Distribution,
    ) -> Self {
        self.scores
            .push((option.into(), criterion.into(), distribution));
        self
    }

    /// Builds the decision, resolving names and validating structure.
    ///
    /// Missing distributions are not an error here; the engine reports them
    /// as `IncompleteDecision` before sampling.
    pub fn build(self) -> Result<Decision, ValidationError> {
        let option_ids: HashMap<&str, _> = self
            .options
            .iter()
            .map(|o| (o.name.as_str(), o.id))
            .collect();
        let criterion_ids: HashMap<&str, _> = self
            .criteria
            .iter()
            .map(|c| (c.name.as_str(), c.id))
            .collect();

        let mut weights = HashMap::new();
        for (name, distribution) in self.weights {
            let id = criterion_ids
                .get(name.as_str())
                .ok_or_else(|| ValidationError::unknown_reference("weight.criterion", &name))?;
            if weights.insert(*id, distribution).is_some() {
                return Err(ValidationError::duplicate("weight.criterion", name));
            }
        }

        let mut scores: HashMap<_, HashMap<_, _>> = HashMap::new();
        for (option, criterion, distribution) in self.scores {
            let option_id = option_ids
                .get(option.as_str())
                .ok_or_else(|| ValidationError::unknown_reference("score.option", &option))?;
            let criterion_id = criterion_ids
                .get(criterion.as_str())
                .ok_or_else(|| ValidationError::unknown_reference("score.criterion", &criterion))?;
            let replaced = scores
                .entry(*option_id)
                .or_default()
                .insert(*criterion_id, distribution);
            if replaced.is_some() {
                return Err(ValidationError::duplicate(
                    "score",
                    format!("{}/{}", option, criterion),
                ));
            }
        }

        let decision = Decision {
            id: DecisionId::new(),
            name: self.name,
            description: self.description,
            options: self.options,
            criteria: self.criteria,
            weights,
            scores,
        };
        decision.validate()?;
        Ok(decision)
    }
}

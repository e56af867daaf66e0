//! Options and criteria of a decision.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CriterionId, OptionId};

/// An alternative under evaluation. Carries identity only; all numeric
/// data lives in the decision's score mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: OptionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DecisionOption {
    /// Creates a new option with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(),
            name: name.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Rule turning a raw score of a minimized criterion into a
/// maximize-equivalent value. Each rule is injective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MinimizeTransform {
    /// `-raw`
    #[default]
    Negate,
    /// `reference - raw`
    ReferenceMax { reference: f64 },
    /// `1 / raw`; raw scores must be strictly positive.
    Reciprocal,
}

impl MinimizeTransform {
    /// Applies the transform, rejecting raw values outside its domain.
    pub fn apply(&self, raw: f64) -> Result<f64, String> {
        match self {
            MinimizeTransform::Negate => Ok(-raw),
            MinimizeTransform::ReferenceMax { reference } => Ok(reference - raw),
            MinimizeTransform::Reciprocal => {
                if raw <= 0.0 {
                    Err(format!(
                        "reciprocal transform requires a strictly positive score, got {}",
                        raw
                    ))
                } else {
                    Ok(1.0 / raw)
                }
            }
        }
    }
}

/// Whether larger or smaller raw scores are preferred on a criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "goal", rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Maximize,
    Minimize {
        #[serde(default)]
        transform: MinimizeTransform,
    },
}

/// An evaluation dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Criterion {
    /// Creates a criterion where larger scores are better.
    pub fn maximize(name: impl Into<String>) -> Self {
        Self::with_direction(name, Direction::Maximize)
    }

    /// Creates a criterion where smaller scores are better, using negation.
    pub fn minimize(name: impl Into<String>) -> Self {
        Self::with_direction(
            name,
            Direction::Minimize {
                transform: MinimizeTransform::Negate,
            },
        )
    }

    /// Creates a criterion with an explicit direction.
    pub fn with_direction(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            id: CriterionId::new(),
            name: name.into(),
            description: String::new(),
            direction,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Converts a raw score into its maximize-equivalent value.
    pub fn orient(&self, raw: f64) -> Result<f64, String> {
        match self.direction {
            Direction::Maximize => Ok(raw),
            Direction::Minimize { transform } => transform.apply(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximize_passes_raw_score_through() {
        let c = Criterion::maximize("quality");
        assert_eq!(c.orient(7.5), Ok(7.5));
    }

    #[test]
    fn negate_reverses_order() {
        let c = Criterion::minimize("cost");
        let cheap = c.orient(10.0).unwrap();
        let pricey = c.orient(20.0).unwrap();
        assert!(cheap > pricey);
    }

    #[test]
    fn reference_max_subtracts_from_reference() {
        let t = MinimizeTransform::ReferenceMax { reference: 100.0 };
        assert_eq!(t.apply(30.0), Ok(70.0));
    }

    #[test]
    fn reciprocal_rejects_non_positive_scores() {
        let t = MinimizeTransform::Reciprocal;
        assert_eq!(t.apply(4.0), Ok(0.25));
        assert!(t.apply(0.0).is_err());
        assert!(t.apply(-2.0).is_err());
    }

    #[test]
    fn direction_defaults_to_maximize() {
        let json = format!(r#"{{"id": "{}", "name": "speed"}}"#, CriterionId::new());
        let c: Criterion = serde_json::from_str(&json).unwrap();
        assert_eq!(c.direction, Direction::Maximize);
    }

    #[test]
    fn minimize_direction_deserializes_transform() {
        let json = r#"{"goal": "minimize", "transform": {"kind": "reference_max", "reference": 50.0}}"#;
        let d: Direction = serde_json::from_str(json).unwrap();
        assert_eq!(
            d,
            Direction::Minimize {
                transform: MinimizeTransform::ReferenceMax { reference: 50.0 }
            }
        );
    }

    #[test]
    fn minimize_transform_defaults_to_negate() {
        let d: Direction = serde_json::from_str(r#"{"goal": "minimize"}"#).unwrap();
        assert_eq!(
            d,
            Direction::Minimize {
                transform: MinimizeTransform::Negate
            }
        );
    }
}

//! Distribution Module - Sampleable probability models for weights and scores.
//!
//! A closed set of kinds, each with a validated parameter set. Adding a new
//! kind means adding one variant here and one parameter type in `kinds`;
//! every consumer matches exhaustively.

mod draws;
mod kinds;

pub use kinds::{Beta, DrawError, Normal, Triangular, Truncation, Uniform, MAX_REJECTION_ATTEMPTS};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SimulationError, ValidationError};

/// An immutable probability model with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distribution {
    Uniform(Uniform),
    Normal(Normal),
    Triangular(Triangular),
    Beta(Beta),
}

/// How `moments` should treat kinds without closed-form moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentStrategy {
    /// Fail with `UnsupportedAnalyticMoment` when no closed form exists.
    AnalyticOnly,
    /// Fall back to a seeded sample estimate when no closed form exists.
    SampleFallback { samples: usize, seed: u64 },
}

/// Mean and variance of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    /// True when the values come from sampling rather than a closed form.
    pub estimated: bool,
}

impl Distribution {
    /// Point mass at `value`, shorthand for `uniform(value, value)`.
    pub fn fixed(value: f64) -> Result<Self, SimulationError> {
        Ok(Distribution::Uniform(Uniform::new(value, value)?))
    }

    pub fn uniform(low: f64, high: f64) -> Result<Self, SimulationError> {
        Ok(Distribution::Uniform(Uniform::new(low, high)?))
    }

    pub fn normal(mean: f64, std_dev: f64) -> Result<Self, SimulationError> {
        Ok(Distribution::Normal(Normal::new(mean, std_dev, None)?))
    }

    pub fn truncated_normal(
        mean: f64,
        std_dev: f64,
        lower: f64,
        upper: f64,
    ) -> Result<Self, SimulationError> {
        Ok(Distribution::Normal(Normal::new(
            mean,
            std_dev,
            Some(Truncation { lower, upper }),
        )?))
    }

    pub fn triangular(low: f64, mode: f64, high: f64) -> Result<Self, SimulationError> {
        Ok(Distribution::Triangular(Triangular::new(low, mode, high)?))
    }

    pub fn beta(alpha: f64, beta: f64, scale: f64) -> Result<Self, SimulationError> {
        Ok(Distribution::Beta(Beta::new(alpha, beta, scale)?))
    }

    /// Short name of the distribution kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Distribution::Uniform(_) => Uniform::KIND,
            Distribution::Normal(n) => n.kind_label(),
            Distribution::Triangular(_) => Triangular::KIND,
            Distribution::Beta(_) => Beta::KIND,
        }
    }

    /// Draws one value. Deterministic given the rng state.
    ///
    /// Non-finite results are reported as errors rather than returned.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DrawError> {
        let value = match self {
            Distribution::Uniform(d) => d.sample(rng)?,
            Distribution::Normal(d) => d.sample(rng)?,
            Distribution::Triangular(d) => d.sample(rng)?,
            Distribution::Beta(d) => d.sample(rng)?,
        };
        if !value.is_finite() {
            return Err(DrawError::new(format!(
                "{} distribution produced non-finite value {}",
                self.kind(),
                value
            )));
        }
        Ok(value)
    }

    /// Analytic mean, or `UnsupportedAnalyticMoment` when none exists.
    pub fn mean(&self) -> Result<f64, SimulationError> {
        match self {
            Distribution::Uniform(d) => Ok(d.mean()),
            Distribution::Normal(d) => d.mean(),
            Distribution::Triangular(d) => Ok(d.mean()),
            Distribution::Beta(d) => Ok(d.mean()),
        }
    }

    /// Analytic variance, or `UnsupportedAnalyticMoment` when none exists.
    pub fn variance(&self) -> Result<f64, SimulationError> {
        match self {
            Distribution::Uniform(d) => Ok(d.variance()),
            Distribution::Normal(d) => d.variance(),
            Distribution::Triangular(d) => Ok(d.variance()),
            Distribution::Beta(d) => Ok(d.variance()),
        }
    }

    /// Mean and variance under the given strategy.
    pub fn moments(&self, strategy: MomentStrategy) -> Result<Moments, SimulationError> {
        let analytic = self.mean().and_then(|mean| {
            self.variance().map(|variance| Moments {
                mean,
                variance,
                estimated: false,
            })
        });

        match (analytic, strategy) {
            (Ok(moments), _) => Ok(moments),
            (Err(err), MomentStrategy::AnalyticOnly) => Err(err),
            (Err(_), MomentStrategy::SampleFallback { samples, seed }) => {
                self.estimate_moments(samples, seed)
            }
        }
    }

    /// Sample mean and unbiased sample variance from `samples` seeded draws.
    pub fn estimate_moments(&self, samples: usize, seed: u64) -> Result<Moments, SimulationError> {
        if samples < 2 {
            return Err(SimulationError::InvalidSettings(ValidationError::out_of_range(
                "samples",
                2.0,
                f64::MAX,
                samples as f64,
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut count = 0.0;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for _ in 0..samples {
            let x = self
                .sample(&mut rng)
                .map_err(|e| SimulationError::SamplingFailure {
                    trial: None,
                    slot: None,
                    reason: e.reason,
                })?;
            count += 1.0;
            let delta = x - mean;
            mean += delta / count;
            m2 += delta * (x - mean);
        }

        Ok(Moments {
            mean,
            variance: m2 / (count - 1.0),
            estimated: true,
        })
    }

    /// Returns a copy whose spread is scaled by `factor`, location held fixed.
    ///
    /// - uniform: half-width around the midpoint
    /// - normal: standard deviation (truncation bounds unchanged)
    /// - triangular: low, mode and high stretched about the mean
    /// - beta: concentration `alpha + beta` divided by `factor²`
    pub fn scale_dispersion(&self, factor: f64) -> Result<Self, SimulationError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(SimulationError::invalid_parameter(
                self.kind(),
                "dispersion_factor",
                format!("must be positive and finite, got {}", factor),
            ));
        }
        Ok(match self {
            Distribution::Uniform(d) => Distribution::Uniform(d.scaled(factor)?),
            Distribution::Normal(d) => Distribution::Normal(d.scaled(factor)?),
            Distribution::Triangular(d) => Distribution::Triangular(d.scaled(factor)?),
            Distribution::Beta(d) => Distribution::Beta(d.scaled(factor)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Moment;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn fixed_always_returns_value() {
        let d = Distribution::fixed(4.5).unwrap();
        let mut r = rng(1);
        for _ in 0..100 {
            assert_eq!(d.sample(&mut r).unwrap(), 4.5);
        }
    }

    #[test]
    fn support_wider_than_f64_fails_at_construction() {
        let err = Distribution::uniform(-1e308, 1e308).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { kind: "uniform", .. }));
        assert!(Distribution::triangular(-1e308, 0.0, 1e308).is_err());
    }

    #[test]
    fn widening_beyond_f64_fails_instead_of_sampling() {
        let d = Distribution::uniform(-1e307, 1e307).unwrap();
        assert!(d.scale_dispersion(50.0).is_err());
    }

    #[test]
    fn sample_is_deterministic_for_same_seed() {
        let d = Distribution::beta(2.0, 5.0, 3.0).unwrap();
        let a: Vec<f64> = {
            let mut r = rng(99);
            (0..50).map(|_| d.sample(&mut r).unwrap()).collect()
        };
        let b: Vec<f64> = {
            let mut r = rng(99);
            (0..50).map(|_| d.sample(&mut r).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn samples_stay_within_support() {
        let mut r = rng(5);
        let uniform = Distribution::uniform(-1.0, 2.0).unwrap();
        let tri = Distribution::triangular(0.0, 0.2, 1.0).unwrap();
        let beta = Distribution::beta(0.5, 0.5, 4.0).unwrap();
        let trunc = Distribution::truncated_normal(0.0, 5.0, -1.0, 1.0).unwrap();
        for _ in 0..5_000 {
            let u = uniform.sample(&mut r).unwrap();
            assert!((-1.0..=2.0).contains(&u));
            let t = tri.sample(&mut r).unwrap();
            assert!((0.0..=1.0).contains(&t));
            let b = beta.sample(&mut r).unwrap();
            assert!((0.0..=4.0).contains(&b));
            let n = trunc.sample(&mut r).unwrap();
            assert!((-1.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn unreachable_truncation_fails_to_sample() {
        let d = Distribution::truncated_normal(0.0, 1.0, 50.0, 51.0).unwrap();
        let err = d.sample(&mut rng(3)).unwrap_err();
        assert!(err.reason.contains("attempts"));
    }

    #[test]
    fn analytic_moments_for_closed_form_kinds() {
        let d = Distribution::uniform(0.0, 6.0).unwrap();
        let m = d.moments(MomentStrategy::AnalyticOnly).unwrap();
        assert_eq!(m.mean, 3.0);
        assert_eq!(m.variance, 3.0);
        assert!(!m.estimated);

        let b = Distribution::beta(2.0, 2.0, 1.0).unwrap();
        assert!((b.mean().unwrap() - 0.5).abs() < 1e-12);
        assert!((b.variance().unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn analytic_only_fails_for_truncated_normal() {
        let d = Distribution::truncated_normal(0.0, 1.0, -1.0, 1.0).unwrap();
        assert_eq!(
            d.moments(MomentStrategy::AnalyticOnly).unwrap_err(),
            SimulationError::UnsupportedAnalyticMoment {
                kind: "truncated normal",
                moment: Moment::Mean,
            }
        );
    }

    #[test]
    fn sample_fallback_estimates_truncated_normal() {
        let d = Distribution::truncated_normal(0.0, 1.0, 0.0, 10.0).unwrap();
        let m = d
            .moments(MomentStrategy::SampleFallback {
                samples: 20_000,
                seed: 11,
            })
            .unwrap();
        assert!(m.estimated);
        // Half-normal: mean sqrt(2/pi), variance 1 - 2/pi.
        assert!((m.mean - 0.7979).abs() < 0.03, "mean was {}", m.mean);
        assert!((m.variance - 0.3634).abs() < 0.03, "variance was {}", m.variance);
    }

    #[test]
    fn estimate_requires_two_samples() {
        let d = Distribution::normal(0.0, 1.0).unwrap();
        assert!(matches!(
            d.estimate_moments(1, 0),
            Err(SimulationError::InvalidSettings(_))
        ));
    }

    #[test]
    fn scale_dispersion_scales_variance_by_factor_squared() {
        let cases = [
            Distribution::uniform(2.0, 6.0).unwrap(),
            Distribution::normal(1.0, 0.5).unwrap(),
            Distribution::triangular(0.0, 1.0, 4.0).unwrap(),
        ];
        for d in cases {
            let up = d.scale_dispersion(2.0).unwrap();
            let down = d.scale_dispersion(0.5).unwrap();
            let v = d.variance().unwrap();
            assert!((up.variance().unwrap() - 4.0 * v).abs() < 1e-9, "{:?}", d);
            assert!((down.variance().unwrap() - 0.25 * v).abs() < 1e-9, "{:?}", d);
            assert!((up.mean().unwrap() - d.mean().unwrap()).abs() < 1e-9);
        }
    }

    #[test]
    fn scale_dispersion_of_point_mass_is_point_mass() {
        let d = Distribution::fixed(3.0).unwrap();
        assert_eq!(d.scale_dispersion(2.0).unwrap(), d);
    }

    #[test]
    fn scale_dispersion_rejects_bad_factor() {
        let d = Distribution::normal(0.0, 1.0).unwrap();
        assert!(d.scale_dispersion(0.0).is_err());
        assert!(d.scale_dispersion(-1.0).is_err());
        assert!(d.scale_dispersion(f64::NAN).is_err());
    }

    #[test]
    fn distribution_serializes_with_kind_tag() {
        let d = Distribution::triangular(1.0, 2.0, 3.0).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"kind\":\"triangular\""));
        let back: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn invalid_distribution_fails_to_deserialize() {
        let json = r#"{"kind": "beta", "alpha": -1.0, "beta": 2.0, "scale": 1.0}"#;
        assert!(serde_json::from_str::<Distribution>(json).is_err());
    }
}

//! Parameter sets for each supported distribution kind.
//!
//! Every kind validates its parameters on construction and on
//! deserialization, so a value of these types is always sampleable.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::draws;
use crate::domain::foundation::{Moment, SimulationError};

/// Upper bound on rejection attempts for a truncated normal draw.
pub const MAX_REJECTION_ATTEMPTS: usize = 10_000;

/// A draw that could not produce a usable number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct DrawError {
    pub reason: String,
}

impl DrawError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

fn require_finite(kind: &'static str, parameter: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid_parameter(
            kind,
            parameter,
            format!("must be finite, got {}", value),
        ))
    }
}

/// Rejects supports whose width `high - low` overflows `f64`.
fn require_finite_width(kind: &'static str, low: f64, high: f64) -> Result<(), SimulationError> {
    let width = high - low;
    if width.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid_parameter(
            kind,
            "high",
            format!("width {} - {} overflows", high, low),
        ))
    }
}

// =============================================================================
// Uniform
// =============================================================================

/// Continuous uniform distribution on `[low, high]`.
///
/// `low == high` is a legal point mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UniformParams")]
pub struct Uniform {
    low: f64,
    high: f64,
}

#[derive(Deserialize)]
struct UniformParams {
    low: f64,
    high: f64,
}

impl TryFrom<UniformParams> for Uniform {
    type Error = SimulationError;

    fn try_from(p: UniformParams) -> Result<Self, Self::Error> {
        Uniform::new(p.low, p.high)
    }
}

impl Uniform {
    pub const KIND: &'static str = "uniform";

    /// Creates a uniform distribution, rejecting `low > high`.
    pub fn new(low: f64, high: f64) -> Result<Self, SimulationError> {
        require_finite(Self::KIND, "low", low)?;
        require_finite(Self::KIND, "high", high)?;
        if low > high {
            return Err(SimulationError::invalid_parameter(
                Self::KIND,
                "low",
                format!("must not exceed high ({} > {})", low, high),
            ));
        }
        require_finite_width(Self::KIND, low, high)?;
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DrawError> {
        if self.low == self.high {
            return Ok(self.low);
        }
        // Width is finite by construction, so this cannot overflow.
        let u: f64 = rng.random();
        Ok(self.low + u * (self.high - self.low))
    }

    pub fn mean(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn variance(&self) -> f64 {
        (self.high - self.low).powi(2) / 12.0
    }

    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, SimulationError> {
        let center = self.mean();
        let half_width = (self.high - self.low) / 2.0 * factor;
        Self::new(center - half_width, center + half_width)
    }
}

// =============================================================================
// Normal
// =============================================================================

/// Closed truncation interval for a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Truncation {
    pub lower: f64,
    pub upper: f64,
}

/// Normal distribution, optionally truncated to `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NormalParams")]
pub struct Normal {
    mean: f64,
    std_dev: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<Truncation>,
}

#[derive(Deserialize)]
struct NormalParams {
    mean: f64,
    std_dev: f64,
    #[serde(default)]
    truncation: Option<Truncation>,
}

impl TryFrom<NormalParams> for Normal {
    type Error = SimulationError;

    fn try_from(p: NormalParams) -> Result<Self, Self::Error> {
        Normal::new(p.mean, p.std_dev, p.truncation)
    }
}

impl Normal {
    pub const KIND: &'static str = "normal";

    /// Creates a normal distribution.
    ///
    /// A zero standard deviation is a point mass at `mean`, which must then
    /// lie inside any truncation interval.
    pub fn new(mean: f64, std_dev: f64, truncation: Option<Truncation>) -> Result<Self, SimulationError> {
        require_finite(Self::KIND, "mean", mean)?;
        require_finite(Self::KIND, "std_dev", std_dev)?;
        if std_dev < 0.0 {
            return Err(SimulationError::invalid_parameter(
                Self::KIND,
                "std_dev",
                format!("must be non-negative, got {}", std_dev),
            ));
        }
        if let Some(t) = truncation {
            require_finite(Self::KIND, "truncation.lower", t.lower)?;
            require_finite(Self::KIND, "truncation.upper", t.upper)?;
            if t.lower >= t.upper {
                return Err(SimulationError::invalid_parameter(
                    Self::KIND,
                    "truncation",
                    format!("lower bound {} must be below upper bound {}", t.lower, t.upper),
                ));
            }
            if std_dev == 0.0 && (mean < t.lower || mean > t.upper) {
                return Err(SimulationError::invalid_parameter(
                    Self::KIND,
                    "mean",
                    "a zero-variance normal must lie inside its truncation bounds",
                ));
            }
        }
        Ok(Self {
            mean,
            std_dev,
            truncation,
        })
    }

    pub fn mean_parameter(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    pub(crate) fn kind_label(&self) -> &'static str {
        if self.truncation.is_some() {
            "truncated normal"
        } else {
            Self::KIND
        }
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DrawError> {
        if self.std_dev == 0.0 {
            return Ok(self.mean);
        }
        let Some(t) = self.truncation else {
            return Ok(self.mean + self.std_dev * draws::standard_normal(rng));
        };
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let x = self.mean + self.std_dev * draws::standard_normal(rng);
            if x >= t.lower && x <= t.upper {
                return Ok(x);
            }
        }
        Err(DrawError::new(format!(
            "no draw landed in [{}, {}] after {} attempts",
            t.lower, t.upper, MAX_REJECTION_ATTEMPTS
        )))
    }

    pub fn mean(&self) -> Result<f64, SimulationError> {
        match self.truncation {
            None => Ok(self.mean),
            Some(_) => Err(SimulationError::UnsupportedAnalyticMoment {
                kind: self.kind_label(),
                moment: Moment::Mean,
            }),
        }
    }

    pub fn variance(&self) -> Result<f64, SimulationError> {
        match self.truncation {
            None => Ok(self.std_dev * self.std_dev),
            Some(_) => Err(SimulationError::UnsupportedAnalyticMoment {
                kind: self.kind_label(),
                moment: Moment::Variance,
            }),
        }
    }

    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, SimulationError> {
        Self::new(self.mean, self.std_dev * factor, self.truncation)
    }
}

// =============================================================================
// Triangular
// =============================================================================

/// Triangular distribution on `[low, high]` peaking at `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TriangularParams")]
pub struct Triangular {
    low: f64,
    mode: f64,
    high: f64,
}

#[derive(Deserialize)]
struct TriangularParams {
    low: f64,
    mode: f64,
    high: f64,
}

impl TryFrom<TriangularParams> for Triangular {
    type Error = SimulationError;

    fn try_from(p: TriangularParams) -> Result<Self, Self::Error> {
        Triangular::new(p.low, p.mode, p.high)
    }
}

impl Triangular {
    pub const KIND: &'static str = "triangular";

    /// Creates a triangular distribution, requiring `low <= mode <= high`.
    pub fn new(low: f64, mode: f64, high: f64) -> Result<Self, SimulationError> {
        require_finite(Self::KIND, "low", low)?;
        require_finite(Self::KIND, "mode", mode)?;
        require_finite(Self::KIND, "high", high)?;
        if low > mode {
            return Err(SimulationError::invalid_parameter(
                Self::KIND,
                "mode",
                format!("must not be below low ({} < {})", mode, low),
            ));
        }
        if mode > high {
            return Err(SimulationError::invalid_parameter(
                Self::KIND,
                "mode",
                format!("must not exceed high ({} > {})", mode, high),
            ));
        }
        require_finite_width(Self::KIND, low, high)?;
        Ok(Self { low, mode, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn mode(&self) -> f64 {
        self.mode
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DrawError> {
        let (a, c, b) = (self.low, self.mode, self.high);
        if a == b {
            return Ok(a);
        }
        // Inverse transform of the piecewise CDF.
        let u: f64 = rng.random();
        let fc = (c - a) / (b - a);
        let x = if u < fc {
            a + (u * (b - a) * (c - a)).sqrt()
        } else {
            b - ((1.0 - u) * (b - a) * (b - c)).sqrt()
        };
        Ok(x)
    }

    pub fn mean(&self) -> f64 {
        (self.low + self.mode + self.high) / 3.0
    }

    pub fn variance(&self) -> f64 {
        let (a, c, b) = (self.low, self.mode, self.high);
        (a * a + b * b + c * c - a * b - a * c - b * c) / 18.0
    }

    /// Stretches all three points about the mean, which stays put.
    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, SimulationError> {
        let mean = self.mean();
        let stretch = |x: f64| mean + (x - mean) * factor;
        Self::new(stretch(self.low), stretch(self.mode), stretch(self.high))
    }
}

// =============================================================================
// Beta
// =============================================================================

/// Beta(alpha, beta) distribution stretched onto `[0, scale]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BetaParams")]
pub struct Beta {
    alpha: f64,
    beta: f64,
    scale: f64,
}

#[derive(Deserialize)]
struct BetaParams {
    alpha: f64,
    beta: f64,
    #[serde(default = "default_beta_scale")]
    scale: f64,
}

fn default_beta_scale() -> f64 {
    1.0
}

impl TryFrom<BetaParams> for Beta {
    type Error = SimulationError;

    fn try_from(p: BetaParams) -> Result<Self, Self::Error> {
        Beta::new(p.alpha, p.beta, p.scale)
    }
}

impl Beta {
    pub const KIND: &'static str = "beta";

    /// Creates a scaled beta distribution; all parameters must be positive.
    pub fn new(alpha: f64, beta: f64, scale: f64) -> Result<Self, SimulationError> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("scale", scale)] {
            require_finite(Self::KIND, name, value)?;
            if value <= 0.0 {
                return Err(SimulationError::invalid_parameter(
                    Self::KIND,
                    name,
                    format!("must be positive, got {}", value),
                ));
            }
        }
        Ok(Self { alpha, beta, scale })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, DrawError> {
        let x = draws::gamma(rng, self.alpha);
        let y = draws::gamma(rng, self.beta);
        let total = x + y;
        if total <= 0.0 {
            return Err(DrawError::new("both gamma draws underflowed to zero"));
        }
        Ok(self.scale * x / total)
    }

    pub fn mean(&self) -> f64 {
        self.scale * self.alpha / (self.alpha + self.beta)
    }

    pub fn variance(&self) -> f64 {
        let k = self.alpha + self.beta;
        self.scale * self.scale * self.alpha * self.beta / (k * k * (k + 1.0))
    }

    /// Divides the concentration `alpha + beta` by `factor²`, keeping the mean.
    pub(crate) fn scaled(&self, factor: f64) -> Result<Self, SimulationError> {
        let concentration = (self.alpha + self.beta) / (factor * factor);
        let m = self.alpha / (self.alpha + self.beta);
        Self::new(m * concentration, (1.0 - m) * concentration, self.scale)
    }
}

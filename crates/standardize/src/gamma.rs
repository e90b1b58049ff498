//! Three-parameter gamma distribution and statrs bridge.

use statrs::distribution::{ContinuousCDF, Gamma};

/// Validated parameters of a three-parameter gamma distribution.
///
/// `shape` (a) and `scale` must be finite and strictly positive; `loc` must
/// be finite. The distribution is that of `loc + X` with
/// `X ~ Gamma(shape, scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaParams {
    shape: f64,
    loc: f64,
    scale: f64,
}

impl GammaParams {
    /// Create new gamma parameters, or `None` if they do not describe a
    /// valid distribution.
    pub fn new(shape: f64, loc: f64, scale: f64) -> Option<Self> {
        if shape.is_finite() && shape > 0.0 && loc.is_finite() && scale.is_finite() && scale > 0.0
        {
            Some(Self { shape, loc, scale })
        } else {
            None
        }
    }

    /// Shape parameter (a).
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Location parameter.
    pub fn loc(&self) -> f64 {
        self.loc
    }

    /// Scale parameter.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rate parameter (1 / scale). statrs parameterises Gamma by
    /// (shape, rate) rather than (shape, scale).
    fn rate(&self) -> f64 {
        1.0 / self.scale
    }

    /// Cumulative probability at `x`: `P(a, (x - loc) / scale)`, zero at or
    /// below the location.
    ///
    /// Returns `None` if statrs rejects the parameters.
    pub fn cdf(&self, x: f64) -> Option<f64> {
        let z = x - self.loc;
        if z <= 0.0 {
            return Some(0.0);
        }
        let dist = Gamma::new(self.shape, self.rate()).ok()?;
        Some(dist.cdf(z))
    }
}

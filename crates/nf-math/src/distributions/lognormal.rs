//! Log-normal density of the jump multiplier `η`.
//!
//! Wraps the `statrs` crate's log-normal implementation:
//! `g(x; μ, γ) = exp(−(ln x − μ)² / (2γ²)) / (√(2πγ²)·x)`.

use nf_core::{ensure_config, errors::Error, Real, Result};
use statrs::distribution::{Continuous, LogNormal};

/// Log-normal density with log-mean `μ` and log-volatility `γ`.
#[derive(Debug, Clone)]
pub struct LogNormalDensity {
    dist: LogNormal,
    mu: Real,
    gamma: Real,
}

impl LogNormalDensity {
    /// Create the density of `η` with `ln η ~ N(μ, γ²)`.
    ///
    /// Fails unless `μ` is finite and `γ > 0`.
    pub fn new(mu: Real, gamma: Real) -> Result<Self> {
        ensure_config!(mu.is_finite(), "log-normal mean must be finite, got {mu}");
        ensure_config!(
            gamma > 0.0 && gamma.is_finite(),
            "log-normal volatility must be positive, got {gamma}"
        );
        let dist = LogNormal::new(mu, gamma).map_err(|e| {
            Error::FatalConfiguration(format!("invalid log-normal parameters: {e}"))
        })?;
        Ok(Self { dist, mu, gamma })
    }

    /// Log-mean `μ`.
    pub fn mu(&self) -> Real {
        self.mu
    }

    /// Log-volatility `γ`.
    pub fn gamma(&self) -> Real {
        self.gamma
    }

    /// Density at `x`; zero for `x ≤ 0`.
    pub fn pdf(&self, x: Real) -> Real {
        if x <= 0.0 {
            return 0.0;
        }
        self.dist.pdf(x)
    }

    /// `E[η] = exp(μ + γ²/2)`.
    pub fn mean(&self) -> Real {
        (self.mu + 0.5 * self.gamma * self.gamma).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    #[test]
    fn matches_closed_form() {
        let (mu, gamma) = (-0.1, 0.3);
        let g = LogNormalDensity::new(mu, gamma).unwrap();
        for x in [0.3_f64, 0.8, 1.0, 1.7, 4.0] {
            let z = x.ln() - mu;
            let expected =
                (-z * z / (2.0 * gamma * gamma)).exp() / ((2.0 * PI * gamma * gamma).sqrt() * x);
            assert_relative_eq!(g.pdf(x), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn zero_outside_support() {
        let g = LogNormalDensity::new(0.0, 0.2).unwrap();
        assert_eq!(g.pdf(0.0), 0.0);
        assert_eq!(g.pdf(-1.0), 0.0);
    }

    #[test]
    fn rejects_degenerate_volatility() {
        assert!(matches!(
            LogNormalDensity::new(0.0, 0.0),
            Err(Error::FatalConfiguration(_))
        ));
        assert!(LogNormalDensity::new(f64::NAN, 0.1).is_err());
    }

    #[test]
    fn mean_of_multiplier() {
        let g = LogNormalDensity::new(0.0, 0.4).unwrap();
        assert_abs_diff_eq!(g.mean(), 0.08_f64.exp(), epsilon = 1e-15);
    }
}

//! Market and jump parameters.
//!
//! Plain immutable structs; every solver calls `validate()` before any
//! numerical work so a bad parameter set fails fast with
//! [`Error::FatalConfiguration`](nf_core::errors::Error::FatalConfiguration).

use nf_core::{ensure_config, Rate, Real, Result, Volatility};

/// Black-Scholes market: risk-free rate, continuous dividend yield and
/// volatility of the underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketParams {
    /// Risk-free rate `r`.
    pub rate: Rate,
    /// Continuous dividend yield `D`.
    pub dividend: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
}

impl MarketParams {
    /// Create a new parameter set.
    pub fn new(rate: Rate, dividend: Rate, volatility: Volatility) -> Self {
        Self {
            rate,
            dividend,
            volatility,
        }
    }

    /// Fails unless all fields are finite and `σ > 0`.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.rate.is_finite(), "rate must be finite, got {}", self.rate);
        ensure_config!(
            self.dividend.is_finite(),
            "dividend yield must be finite, got {}",
            self.dividend
        );
        ensure_config!(
            self.volatility > 0.0 && self.volatility.is_finite(),
            "volatility must be positive, got {}",
            self.volatility
        );
        Ok(())
    }

    /// `σ²`.
    pub fn variance(&self) -> Real {
        self.volatility * self.volatility
    }
}

/// Merton jump parameters: Poisson intensity `λ` and log-normal multiplier
/// `η` with `ln η ~ N(μ, γ²)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpParams {
    /// Jump intensity `λ` (expected jumps per year).
    pub intensity: Real,
    /// Log-mean `μ` of the jump multiplier.
    pub mean: Real,
    /// Log-volatility `γ` of the jump multiplier.
    pub volatility: Volatility,
}

impl JumpParams {
    /// Create a new parameter set.
    pub fn new(intensity: Real, mean: Real, volatility: Volatility) -> Self {
        Self {
            intensity,
            mean,
            volatility,
        }
    }

    /// No jumps (`λ = 0`); the model reduces to Black-Scholes.
    pub fn none() -> Self {
        Self::default()
    }

    /// `true` when `λ > 0`.
    pub fn has_jumps(&self) -> bool {
        self.intensity > 0.0
    }

    /// Fails if `λ < 0`, or if `λ > 0` and `γ ≤ 0` or `μ` is not finite.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(
            self.intensity >= 0.0 && self.intensity.is_finite(),
            "jump intensity must be non-negative, got {}",
            self.intensity
        );
        if self.has_jumps() {
            ensure_config!(
                self.mean.is_finite(),
                "jump mean must be finite, got {}",
                self.mean
            );
            ensure_config!(
                self.volatility > 0.0 && self.volatility.is_finite(),
                "jump volatility must be positive when jumps are present, got {}",
                self.volatility
            );
        }
        Ok(())
    }

    /// Jump compensator `κ = E[η] − 1 = e^{μ+½γ²} − 1`; zero without jumps.
    pub fn compensator(&self) -> Real {
        if !self.has_jumps() {
            return 0.0;
        }
        (self.mean + 0.5 * self.volatility * self.volatility).exp() - 1.0
    }
}

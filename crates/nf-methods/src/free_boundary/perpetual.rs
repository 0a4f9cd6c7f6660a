//! Perpetual American options in closed form.
//!
//! Away from the exercise region the value solves
//! `½σ²S²V'' + (r−D)SV' − rV = 0`, so `V = A·S^α` with `α` a root of
//!
//! $$\tfrac12\sigma^2\alpha(\alpha-1) + (r-D)\alpha - r = 0.$$
//!
//! The put takes the negative root, the call the root above one. Value
//! matching and smooth pasting at the boundary give
//! `S_f = X/(1 − 1/α)` and `A = ∓(1/α)·S_f^{1−α}`.

use super::FreeBoundarySolver;
use crate::payoff::{OptionType, PayoffFunction, VanillaPayoff};
use nf_core::{ensure_config, Real, Result};

/// Boundary and value function of a perpetual American option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerpetualSolution {
    /// Option type.
    pub option_type: OptionType,
    /// Strike.
    pub strike: Real,
    /// Characteristic root `α`.
    pub alpha: Real,
    /// Exercise boundary `S_f`.
    pub boundary: Real,
    /// Coefficient `A` of `A·S^α`.
    pub coefficient: Real,
}

impl PerpetualSolution {
    /// `true` if `spot` lies in the exercise region.
    pub fn is_exercised(&self, spot: Real) -> bool {
        match self.option_type {
            OptionType::Put => spot <= self.boundary,
            OptionType::Call => spot >= self.boundary,
        }
    }

    /// Option value at `spot`.
    pub fn value(&self, spot: Real) -> Real {
        if self.is_exercised(spot) {
            VanillaPayoff::new(self.option_type, self.strike).value(spot)
        } else {
            self.coefficient * spot.powf(self.alpha)
        }
    }

    /// `∂V/∂S` at `spot`.
    pub fn delta(&self, spot: Real) -> Real {
        if self.is_exercised(spot) {
            self.option_type.sign()
        } else {
            self.alpha * self.coefficient * spot.powf(self.alpha - 1.0)
        }
    }
}

impl FreeBoundarySolver {
    /// Closed-form perpetual American boundary and value function.
    ///
    /// Fails with `FatalConfiguration` when the relevant root degenerates:
    /// `r ≤ 0` for puts, `D ≤ 0` for calls (never optimal to exercise), or
    /// `X ≤ 0`.
    pub fn perpetual(&self, payoff: &VanillaPayoff) -> Result<PerpetualSolution> {
        let strike = payoff.strike;
        ensure_config!(strike > 0.0 && strike.is_finite(), "strike must be positive, got {strike}");
        let alpha = self.characteristic_root(payoff.option_type)?;
        let boundary = strike / (1.0 - 1.0 / alpha);
        let coefficient = payoff.option_type.sign() / alpha * boundary.powf(1.0 - alpha);
        Ok(PerpetualSolution {
            option_type: payoff.option_type,
            strike,
            alpha,
            boundary,
            coefficient,
        })
    }

    /// Root `α` of the characteristic equation for `option_type`.
    pub fn characteristic_root(&self, option_type: OptionType) -> Result<Real> {
        let m = self.market();
        let half_var = 0.5 * m.variance();
        let b = m.rate - m.dividend - half_var;
        let disc = (b * b + 4.0 * half_var * m.rate).sqrt();
        match option_type {
            OptionType::Put => {
                ensure_config!(
                    m.rate > 0.0,
                    "perpetual put needs a positive rate, got {}",
                    m.rate
                );
                Ok((-b - disc) / (2.0 * half_var))
            }
            OptionType::Call => {
                ensure_config!(
                    m.dividend > 0.0,
                    "perpetual call needs a positive dividend yield, got {}",
                    m.dividend
                );
                ensure_config!(
                    disc.is_finite(),
                    "characteristic equation has no real roots"
                );
                Ok((-b + disc) / (2.0 * half_var))
            }
        }
    }
}

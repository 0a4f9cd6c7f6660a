//! Perpetual American boundary by ODE shooting.
//!
//! In `x = ln S` the pricing equation is
//! `½σ²V_xx + (r−D−½σ²)V_x − rV = 0`, integrated as a first-order system
//! on `(V, V_x)`. Starting from a candidate boundary `s` with value matching
//! (`V = φ(s − X)`) and smooth pasting (`V_x = φs`), the equation is
//! integrated with RK4 away from the exercise region to `S_far = X·e^{±L}`.
//! The boundary is the candidate for which `V(S_far) = 0`.

use super::FreeBoundarySolver;
use crate::payoff::{OptionType, VanillaPayoff};
use nalgebra::Vector2;
use nf_core::{ensure_config, Real, Result, Size};
use nf_math::ode::RungeKutta4;
use nf_math::solvers1d::bisection;
use tracing::debug;

/// Shooting settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShootingSettings {
    /// RK4 steps per shot.
    pub steps: Size,
    /// Log-distance `L` from the strike to the far boundary.
    pub log_width: Real,
    /// Root-finder accuracy on the boundary.
    pub accuracy: Real,
}

impl Default for ShootingSettings {
    fn default() -> Self {
        Self {
            steps: 2000,
            log_width: 4.0,
            accuracy: 1.0e-12,
        }
    }
}

impl ShootingSettings {
    /// Fails unless `steps ≥ 1`, `L > 0` and the accuracy is positive.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.steps >= 1, "shooting needs at least one RK4 step");
        ensure_config!(
            self.log_width > 0.0 && self.log_width.is_finite(),
            "log width must be positive, got {}",
            self.log_width
        );
        ensure_config!(
            self.accuracy > 0.0,
            "accuracy must be positive, got {}",
            self.accuracy
        );
        Ok(())
    }
}

impl FreeBoundarySolver {
    /// Perpetual American boundary found by shooting.
    ///
    /// Agrees with [`FreeBoundarySolver::perpetual`] up to the truncation of
    /// the domain at `S_far` and the RK4 error.
    pub fn shoot(&self, payoff: &VanillaPayoff, settings: &ShootingSettings) -> Result<Real> {
        settings.validate()?;
        let strike = payoff.strike;
        ensure_config!(strike > 0.0 && strike.is_finite(), "strike must be positive, got {strike}");

        let m = *self.market();
        let half_var = 0.5 * m.variance();
        let drift = m.rate - m.dividend - half_var;
        let rhs = move |_x: Real, y: &Vector2<Real>| {
            Vector2::new(y[1], (m.rate * y[0] - drift * y[1]) / half_var)
        };
        let rk = RungeKutta4::new(settings.steps)?;
        let phi = payoff.option_type.sign();
        let x_far = strike.ln() - phi * settings.log_width;

        let far_value = |s: Real| {
            let start = Vector2::new(phi * (s - strike), phi * s);
            rk.integrate(&rhs, s.ln(), start, x_far)[0]
        };

        let width = settings.log_width.exp();
        let (lo, hi) = match payoff.option_type {
            OptionType::Put => (strike / width, strike),
            OptionType::Call => (strike, strike * width),
        };
        let boundary = bisection(far_value, lo, hi, settings.accuracy)?;
        debug!(boundary, option_type = %payoff.option_type, "shooting converged");
        Ok(boundary)
    }
}

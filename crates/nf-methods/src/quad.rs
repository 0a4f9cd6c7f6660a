//! QUAD pricing: direct quadrature of the Black-Scholes transition density.
//!
//! With `x = ln S₀`, `y = ln S_T` and `k = 2(r−D)/σ² − 1`, the discounted
//! expectation of a payoff `P` is
//!
//! $$V(x) = A(x) \int B(x, y)\,P(e^y)\,dy,$$
//!
//! $$A(x) = \frac{1}{\sqrt{2\pi\sigma^2 T}}
//!          e^{-\frac12 kx - \frac18\sigma^2k^2T - rT},\qquad
//!   B(x,y) = e^{-\frac{(x-y)^2}{2\sigma^2T} + \frac12 ky}.$$
//!
//! The integral is taken with Simpson's rule, so the payoff's kinks should
//! sit on the ends of the integration range; the error then falls with the
//! fourth power of the spacing.

use crate::params::MarketParams;
use crate::payoff::{OptionType, PayoffFunction, VanillaPayoff};
use nf_core::{ensure, ensure_config, errors::Error, Real, Result, Time};
use nf_math::grid::{Grid, ValueVector};
use nf_math::integrals::simpson;
use std::f64::consts::PI;

/// Integration range half-width in standard deviations of `ln S_T`.
const TRUNCATION_STD_DEVS: Real = 10.0;

/// The `A(x)·B(x, y)` transition kernel over a horizon `T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadKernel {
    variance: Real,
    k: Real,
    rate: Real,
    horizon: Time,
}

impl QuadKernel {
    /// Kernel of `market` over `horizon` years.
    pub fn new(market: &MarketParams, horizon: Time) -> Result<Self> {
        market.validate()?;
        ensure_config!(
            horizon > 0.0 && horizon.is_finite(),
            "QUAD horizon must be positive, got {horizon}"
        );
        let variance = market.variance();
        Ok(Self {
            variance,
            k: 2.0 * (market.rate - market.dividend) / variance - 1.0,
            rate: market.rate,
            horizon,
        })
    }

    /// `k = 2(r−D)/σ² − 1`.
    pub fn k(&self) -> Real {
        self.k
    }

    /// Horizon `T`.
    pub fn horizon(&self) -> Time {
        self.horizon
    }

    /// Standard deviation `σ√T` of `ln S_T`.
    pub fn std_dev(&self) -> Real {
        (self.variance * self.horizon).sqrt()
    }

    /// Risk-neutral mean of `ln S_T` given `ln S₀ = x`.
    pub fn mean(&self, x: Real) -> Real {
        x + 0.5 * self.k * self.variance * self.horizon
    }

    /// `A(x)`.
    pub fn prefactor(&self, x: Real) -> Real {
        let vt = self.variance * self.horizon;
        (-0.5 * self.k * x - 0.125 * self.k * self.k * vt - self.rate * self.horizon).exp()
            / (2.0 * PI * vt).sqrt()
    }

    /// `B(x, y)`.
    pub fn weight(&self, x: Real, y: Real) -> Real {
        let dx = x - y;
        (-dx * dx / (2.0 * self.variance * self.horizon) + 0.5 * self.k * y).exp()
    }
}

/// European pricer by QUAD integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadPricer {
    kernel: QuadKernel,
}

impl QuadPricer {
    /// Pricer for options on `market` expiring in `maturity` years.
    pub fn new(market: &MarketParams, maturity: Time) -> Result<Self> {
        Ok(Self {
            kernel: QuadKernel::new(market, maturity)?,
        })
    }

    /// The transition kernel.
    pub fn kernel(&self) -> &QuadKernel {
        &self.kernel
    }

    /// Value at `spot` of `payoff`, integrated over the log-price `grid`.
    ///
    /// The grid must be uniform with an even number of intervals.
    pub fn value<P: PayoffFunction + ?Sized>(
        &self,
        spot: Real,
        grid: &Grid,
        payoff: &P,
    ) -> Result<Real> {
        ensure_spot(spot)?;
        let x = spot.ln();
        let integrand: ValueVector = grid.map(|y| self.kernel.weight(x, y) * payoff.value(y.exp()));
        Ok(self.kernel.prefactor(x) * simpson(grid, &integrand)?)
    }

    /// Price of a vanilla option using `intervals` (even) Simpson intervals.
    ///
    /// The range is the in-the-money part of `mean ± 10 std devs` of
    /// `ln S_T`, so the payoff kink at `ln X` is an end point.
    pub fn price_vanilla(&self, payoff: &VanillaPayoff, spot: Real, intervals: usize) -> Result<Real> {
        ensure_spot(spot)?;
        ensure!(
            payoff.strike > 0.0,
            "strike must be positive, got {}",
            payoff.strike
        );
        let centre = self.kernel.mean(spot.ln());
        let half_width = TRUNCATION_STD_DEVS * self.kernel.std_dev();
        let (mut lo, mut hi) = (centre - half_width, centre + half_width);
        let log_strike = payoff.strike.ln();
        match payoff.option_type {
            OptionType::Call => lo = lo.max(log_strike),
            OptionType::Put => hi = hi.min(log_strike),
        }
        if hi <= lo {
            // never in the money within the truncated range
            return Ok(0.0);
        }
        let grid = Grid::uniform(lo, hi, intervals)?;
        self.value(spot, &grid, payoff)
    }
}

fn ensure_spot(spot: Real) -> Result<()> {
    if spot > 0.0 && spot.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("spot must be positive, got {spot}")))
    }
}

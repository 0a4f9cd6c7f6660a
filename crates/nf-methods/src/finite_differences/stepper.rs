//! Implicit-explicit time stepping for the Merton jump-diffusion PIDE.
//!
//! Solves
//!
//! $$V_t + \tfrac12\sigma^2 S^2 V_{SS} + (r - d - \lambda\kappa) S V_S
//!   - (r + \lambda) V + \lambda \int_0^\infty V(S\eta) g(\eta)\,d\eta = 0$$
//!
//! backward from expiry on the uniform price grid `S_j = jΔS`. Diffusion,
//! drift and discounting are implicit; the jump integral is evaluated on the
//! previous (later-in-time) level and moved to the right-hand side. Each
//! level is one tridiagonal solve.

use super::jump_integral::JumpIntegralEstimator;
use crate::params::{JumpParams, MarketParams};
use crate::payoff::PayoffFunction;
use nf_core::{ensure_config, errors::Error, Real, Result, Size, Time};
use nf_math::grid::{Grid, ValueVector};
use nf_math::tridiagonal::TridiagonalSystem;
use tracing::{debug, trace};

/// Exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    /// Exercise at expiry only.
    #[default]
    European,
    /// Exercise at any time; values are floored at the payoff after every
    /// timestep.
    American,
}

/// Grid and timestep settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdSettings {
    /// Upper edge of the price grid.
    pub s_max: Real,
    /// Number of price intervals (`j_max + 1` nodes).
    pub j_max: Size,
    /// Number of timesteps.
    pub i_max: Size,
    /// Time to expiry `T`.
    pub maturity: Time,
}

impl FdSettings {
    /// Create new settings.
    pub fn new(s_max: Real, j_max: Size, i_max: Size, maturity: Time) -> Self {
        Self {
            s_max,
            j_max,
            i_max,
            maturity,
        }
    }

    /// Fails unless `s_max > 0`, `j_max ≥ 2`, `i_max ≥ 1` and `T > 0`.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(
            self.s_max > 0.0 && self.s_max.is_finite(),
            "s_max must be positive, got {}",
            self.s_max
        );
        ensure_config!(self.j_max >= 2, "j_max must be at least 2, got {}", self.j_max);
        ensure_config!(self.i_max >= 1, "i_max must be at least 1, got {}", self.i_max);
        ensure_config!(
            self.maturity > 0.0 && self.maturity.is_finite(),
            "maturity must be positive, got {}",
            self.maturity
        );
        Ok(())
    }

    /// `ΔS = s_max / j_max`.
    pub fn ds(&self) -> Real {
        self.s_max / self.j_max as Real
    }

    /// `Δt = T / i_max`.
    pub fn dt(&self) -> Time {
        self.maturity / self.i_max as Real
    }
}

/// Option values on the price grid at time zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FdSolution {
    /// Price grid `S_j = jΔS`.
    pub grid: Grid,
    /// Values at each grid node.
    pub values: ValueVector,
}

impl FdSolution {
    /// Value at `spot`, interpolated linearly between nodes.
    pub fn value_at(&self, spot: Real) -> Result<Real> {
        if spot.is_nan() || spot < self.grid.first() || spot > self.grid.last() {
            return Err(Error::InvalidArgument(format!(
                "spot {spot} outside the price grid [{}, {}]",
                self.grid.first(),
                self.grid.last()
            )));
        }
        Ok(self.grid.interpolate(&self.values, spot))
    }
}

/// Backward stepper for European or American options under Merton
/// jump-diffusion.
#[derive(Debug, Clone)]
pub struct ImplicitExplicitStepper {
    market: MarketParams,
    jumps: JumpParams,
    settings: FdSettings,
    style: ExerciseStyle,
    estimator: Option<JumpIntegralEstimator>,
}

impl ImplicitExplicitStepper {
    /// Create a European stepper. All parameters are validated here.
    pub fn new(market: MarketParams, jumps: JumpParams, settings: FdSettings) -> Result<Self> {
        market.validate()?;
        jumps.validate()?;
        settings.validate()?;
        let estimator = if jumps.has_jumps() {
            Some(JumpIntegralEstimator::from_params(&jumps)?)
        } else {
            None
        };
        Ok(Self {
            market,
            jumps,
            settings,
            style: ExerciseStyle::European,
            estimator,
        })
    }

    /// Switch the exercise style.
    pub fn with_exercise(mut self, style: ExerciseStyle) -> Self {
        self.style = style;
        self
    }

    /// Market parameters.
    pub fn market(&self) -> &MarketParams {
        &self.market
    }

    /// Jump parameters.
    pub fn jumps(&self) -> &JumpParams {
        &self.jumps
    }

    /// Grid settings.
    pub fn settings(&self) -> &FdSettings {
        &self.settings
    }

    /// Exercise style.
    pub fn exercise(&self) -> ExerciseStyle {
        self.style
    }

    /// Warn if the price grid under-resolves the jump distribution at price
    /// `at`. Returns `Ok(true)` if the warning was raised; always `Ok(false)`
    /// without jumps.
    ///
    /// [`solve`](Self::solve) checks at the payoff's kink, or at `s_max/2`
    /// for payoffs without one.
    pub fn check_jump_coverage(&self, at: Real) -> Result<bool> {
        let grid = Grid::uniform(0.0, self.settings.s_max, self.settings.j_max)?;
        Ok(self.coverage_on(&grid, at))
    }

    fn coverage_on(&self, grid: &Grid, at: Real) -> bool {
        match &self.estimator {
            Some(estimator) => estimator.coverage_warning(grid, at.clamp(grid.first(), grid.last())),
            None => false,
        }
    }

    /// Step from expiry back to time zero.
    pub fn solve<P: PayoffFunction + ?Sized>(&self, payoff: &P) -> Result<FdSolution> {
        let FdSettings {
            s_max,
            j_max,
            i_max,
            maturity,
        } = self.settings;
        let grid = Grid::uniform(0.0, s_max, j_max)?;
        let dt = self.settings.dt();
        let n = grid.len();

        let MarketParams {
            rate: r,
            dividend: d,
            ..
        } = self.market;
        let sigma2 = self.market.variance();
        let lambda = self.jumps.intensity;
        let drift = r - d - lambda * self.jumps.compensator();

        self.coverage_on(&grid, payoff.kink().unwrap_or(0.5 * s_max));

        let exercise = grid.map(|s| payoff.value(s));
        let mut values = exercise.clone();
        let mut system = TridiagonalSystem::new(n);

        for i in (0..i_max).rev() {
            let tau = maturity - i as Real * dt;
            for j in 1..n - 1 {
                let jf = j as Real;
                let diffusion = 0.5 * sigma2 * jf * jf;
                let convection = 0.5 * drift * jf;
                let mut rhs = -values[j] / dt;
                if let Some(estimator) = &self.estimator {
                    rhs -= lambda * estimator.estimate(grid[j], &grid, &values)?;
                }
                system.set_row(
                    j,
                    diffusion - convection,
                    -2.0 * diffusion - (r + lambda) - 1.0 / dt,
                    diffusion + convection,
                    rhs,
                );
            }
            let (lower, upper) = payoff.boundary_values(0.0, s_max, tau, &self.market);
            system.set_dirichlet(0, lower);
            system.set_dirichlet(n - 1, upper);

            values = system.solve()?;
            if self.style == ExerciseStyle::American {
                for (v, e) in values.iter_mut().zip(exercise.iter()) {
                    *v = v.max(*e);
                }
            }
            trace!(level = i, tau, "timestep complete");
        }

        debug!(
            j_max,
            i_max,
            style = ?self.style,
            jumps = self.estimator.is_some(),
            "finite-difference solve complete"
        );
        Ok(FdSolution { grid, values })
    }

    /// Solve and interpolate the time-zero value at `spot`.
    pub fn price<P: PayoffFunction + ?Sized>(&self, payoff: &P, spot: Real) -> Result<Real> {
        self.solve(payoff)?.value_at(spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::{black_scholes, merton_jump_diffusion};
    use crate::payoff::{OptionType, VanillaPayoff};
    use approx::assert_abs_diff_eq;

    fn market() -> MarketParams {
        MarketParams::new(0.05, 0.0, 0.15)
    }

    #[test]
    fn european_put_matches_black_scholes() {
        let settings = FdSettings::new(200.0, 400, 100, 0.25);
        let stepper = ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        let price = stepper.price(&VanillaPayoff::put(100.0), 100.0).unwrap();
        let bs = black_scholes(OptionType::Put, 100.0, 100.0, &market(), 0.25);
        assert_abs_diff_eq!(price, bs, epsilon = 0.05);
    }

    #[test]
    fn european_call_matches_black_scholes() {
        let settings = FdSettings::new(200.0, 400, 100, 0.25);
        let stepper = ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        let price = stepper.price(&VanillaPayoff::call(100.0), 100.0).unwrap();
        let bs = black_scholes(OptionType::Call, 100.0, 100.0, &market(), 0.25);
        assert_abs_diff_eq!(price, bs, epsilon = 0.05);
    }

    #[test]
    fn jump_diffusion_put_matches_merton_series() {
        let jumps = JumpParams::new(0.5, -0.1, 0.3);
        let settings = FdSettings::new(300.0, 300, 50, 0.25);
        let stepper = ImplicitExplicitStepper::new(market(), jumps, settings).unwrap();
        let price = stepper.price(&VanillaPayoff::put(100.0), 100.0).unwrap();
        let reference =
            merton_jump_diffusion(OptionType::Put, 100.0, 100.0, &market(), &jumps, 0.25).unwrap();
        assert_abs_diff_eq!(price, reference, epsilon = 0.05);
    }

    #[test]
    fn american_put_dominates_european() {
        let settings = FdSettings::new(200.0, 400, 100, 0.25);
        let european =
            ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        let american = european.clone().with_exercise(ExerciseStyle::American);
        let payoff = VanillaPayoff::put(100.0);
        let eu = european.solve(&payoff).unwrap();
        let am = american.solve(&payoff).unwrap();
        assert!(am.value_at(100.0).unwrap() > eu.value_at(100.0).unwrap());
        for (k, s) in am.grid.iter().enumerate() {
            assert!(am.values[k] >= payoff.value(*s));
        }
        // deep in the money the American put is exercised
        assert_abs_diff_eq!(am.value_at(80.0).unwrap(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn closure_payoff() {
        let settings = FdSettings::new(200.0, 200, 50, 0.25);
        let stepper = ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        let put = |s: Real| (100.0 - s).max(0.0);
        let price = stepper.price(&put, 100.0).unwrap();
        let bs = black_scholes(OptionType::Put, 100.0, 100.0, &market(), 0.25);
        // discounted-payoff boundaries are exact for the put at S = 0
        assert_abs_diff_eq!(price, bs, epsilon = 0.1);
    }

    #[test]
    fn jump_coverage_checked_where_requested() {
        // ΔS = 2, γ = 0.1: about 10 intervals per jump std at S = 200, 2.5 at S = 50
        let jumps = JumpParams::new(0.5, -0.1, 0.1);
        let stepper =
            ImplicitExplicitStepper::new(market(), jumps, FdSettings::new(400.0, 200, 10, 0.25))
                .unwrap();
        assert!(!stepper.check_jump_coverage(200.0).unwrap());
        assert!(stepper.check_jump_coverage(50.0).unwrap());
        assert_eq!(VanillaPayoff::put(50.0).kink(), Some(50.0));

        let settings = FdSettings::new(400.0, 200, 10, 0.25);
        let plain = ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        assert!(!plain.check_jump_coverage(50.0).unwrap());
    }

    #[test]
    fn rejects_bad_configuration() {
        let ok = FdSettings::new(200.0, 400, 100, 0.25);
        let cases = [
            (MarketParams::new(0.05, 0.0, 0.0), JumpParams::none(), ok),
            (market(), JumpParams::new(-1.0, 0.0, 0.1), ok),
            (market(), JumpParams::new(1.0, 0.0, 0.0), ok),
            (market(), JumpParams::none(), FdSettings { j_max: 1, ..ok }),
            (market(), JumpParams::none(), FdSettings { i_max: 0, ..ok }),
            (market(), JumpParams::none(), FdSettings { s_max: 0.0, ..ok }),
            (market(), JumpParams::none(), FdSettings { maturity: 0.0, ..ok }),
        ];
        for (m, j, s) in cases {
            assert!(matches!(
                ImplicitExplicitStepper::new(m, j, s),
                Err(Error::FatalConfiguration(_))
            ));
        }
    }

    #[test]
    fn spot_outside_grid() {
        let settings = FdSettings::new(200.0, 20, 5, 0.25);
        let stepper = ImplicitExplicitStepper::new(market(), JumpParams::none(), settings).unwrap();
        let solution = stepper.solve(&VanillaPayoff::put(100.0)).unwrap();
        assert!(matches!(solution.value_at(250.0), Err(Error::InvalidArgument(_))));
        assert!(solution.value_at(-1.0).is_err());
        assert!(solution.value_at(200.0).is_ok());
    }

    #[test]
    fn repeated_solves_are_identical() {
        let settings = FdSettings::new(200.0, 100, 20, 0.25);
        let stepper =
            ImplicitExplicitStepper::new(market(), JumpParams::new(0.3, 0.0, 0.2), settings)
                .unwrap();
        let payoff = VanillaPayoff::put(100.0);
        let first = stepper.solve(&payoff).unwrap();
        let second = stepper.solve(&payoff).unwrap();
        assert_eq!(first, second);
    }
}

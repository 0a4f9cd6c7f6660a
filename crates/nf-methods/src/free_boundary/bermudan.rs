//! Perpetual Bermudan options: exercise allowed every ΔT, forever.
//!
//! Starting from `θ⁰ = X` and `V₀ = payoff`, each step rolls the value back
//! one exercise period with the QUAD kernel:
//!
//! $$C_k(x) = A(x)\int_{x-w}^{x+w} B(x,y)\,V_{k-1}(y)\,dy.$$
//!
//! The integral is split at `ln θ^{k−1}`. On the exercise side `V_{k−1}` is
//! the intrinsic value and is evaluated exactly; on the other side it is
//! interpolated from the previous value grid. Both pieces use Simpson's rule
//! on their own uniform sub-grid. The value grid spacing is a fixed fraction
//! of `σ√ΔT`, so linear interpolation of `V_{k−1}` stays resolved as the
//! exercise interval shrinks. The new boundary solves
//! `intrinsic(θ^k) = C_k(ln θ^k)`, and the iteration stops once
//! `|θ^k − θ^{k−1}| ≤ tol`.

use super::FreeBoundarySolver;
use crate::payoff::{OptionType, PayoffFunction, VanillaPayoff};
use crate::quad::QuadKernel;
use nf_core::{ensure_config, errors::Error, Real, Result, Size, Time};
use nf_math::comparison::close;
use nf_math::grid::{Grid, ValueVector};
use nf_math::integrals::SimpsonRule;
use nf_math::solvers1d::brent;
use tracing::debug;

/// Settings for the Bermudan boundary iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BermudanSettings {
    /// Time between exercise dates ΔT.
    pub exercise_interval: Time,
    /// Value grid nodes per kernel standard deviation `σ√ΔT`.
    pub points_per_std: Real,
    /// Half-width of the value grid around `ln X`.
    pub log_width: Real,
    /// Simpson intervals on each side of the split.
    pub quad_intervals: Size,
    /// Half-width `w` of the kernel integral in units of `σ√ΔT`.
    pub kernel_width: Real,
    /// Convergence tolerance on the boundary.
    pub tolerance: Real,
    /// Maximum number of exercise steps.
    pub max_exercises: Size,
}

impl Default for BermudanSettings {
    fn default() -> Self {
        Self {
            exercise_interval: 0.25,
            points_per_std: 8.0,
            log_width: 3.0,
            quad_intervals: 48,
            kernel_width: 8.0,
            tolerance: 1.0e-6,
            max_exercises: 10_000,
        }
    }
}

impl BermudanSettings {
    /// Default settings with exercise every `exercise_interval` years.
    pub fn new(exercise_interval: Time) -> Self {
        Self {
            exercise_interval,
            ..Self::default()
        }
    }

    /// Fails with `FatalConfiguration` on any non-positive width, count or
    /// tolerance, or an odd `quad_intervals`.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(
            self.exercise_interval > 0.0 && self.exercise_interval.is_finite(),
            "exercise interval must be positive, got {}",
            self.exercise_interval
        );
        ensure_config!(
            self.points_per_std > 0.0 && self.points_per_std.is_finite(),
            "points per standard deviation must be positive, got {}",
            self.points_per_std
        );
        ensure_config!(
            self.log_width > 0.0,
            "log width must be positive, got {}",
            self.log_width
        );
        ensure_config!(
            self.quad_intervals >= 2 && self.quad_intervals % 2 == 0,
            "Simpson needs an even, positive interval count, got {}",
            self.quad_intervals
        );
        ensure_config!(
            self.kernel_width > 0.0,
            "kernel width must be positive, got {}",
            self.kernel_width
        );
        ensure_config!(
            self.tolerance > 0.0,
            "tolerance must be positive, got {}",
            self.tolerance
        );
        ensure_config!(self.max_exercises >= 1, "max_exercises must be at least 1");
        Ok(())
    }

    /// Intervals of the value grid `ln X ± log_width` for a kernel of
    /// standard deviation `std_dev`.
    pub fn grid_intervals(&self, std_dev: Real) -> Size {
        let n = (2.0 * self.log_width * self.points_per_std / std_dev).ceil();
        (n as Size).max(2)
    }
}

/// Converged Bermudan boundary and value function.
#[derive(Debug, Clone, PartialEq)]
pub struct BermudanSolution {
    /// Boundary iterates `θ⁰ = X, θ¹, …`; the last one is converged.
    pub boundaries: Vec<Real>,
    /// Log-price grid.
    pub grid: Grid,
    /// Values on `grid` at an exercise date.
    pub values: ValueVector,
    option: VanillaPayoff,
}

impl BermudanSolution {
    /// The converged exercise boundary.
    pub fn boundary(&self) -> Real {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Number of exercise steps taken.
    pub fn exercises(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Value at `spot` on an exercise date.
    pub fn value_at(&self, spot: Real) -> Result<Real> {
        if spot.is_nan() || spot <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "spot must be positive, got {spot}"
            )));
        }
        if exercise_side(self.option.option_type, spot.ln(), self.boundary().ln()) {
            return Ok(self.option.value(spot));
        }
        Ok(self.grid.interpolate(&self.values, spot.ln()))
    }
}

/// `true` if log-price `y` is on the exercise side of the split `split`.
fn exercise_side(option_type: OptionType, y: Real, split: Real) -> bool {
    match option_type {
        OptionType::Put => y <= split,
        OptionType::Call => y >= split,
    }
}

impl FreeBoundarySolver {
    /// Iterate the perpetual Bermudan exercise boundary to a fixed point.
    ///
    /// Fails with `FatalConfiguration` if the boundary equation has no root
    /// on the value grid (e.g. a put with `r ≤ 0`), and with
    /// `MaxIterations` if the boundary has not settled after
    /// `max_exercises` steps.
    pub fn bermudan(
        &self,
        payoff: &VanillaPayoff,
        settings: &BermudanSettings,
    ) -> Result<BermudanSolution> {
        settings.validate()?;
        let strike = payoff.strike;
        ensure_config!(strike > 0.0 && strike.is_finite(), "strike must be positive, got {strike}");

        let kernel = QuadKernel::new(self.market(), settings.exercise_interval)?;
        let centre = strike.ln();
        let grid = Grid::uniform(
            centre - settings.log_width,
            centre + settings.log_width,
            settings.grid_intervals(kernel.std_dev()),
        )?;
        let rollback = Rollback {
            kernel,
            payoff: *payoff,
            half_width: settings.kernel_width * kernel.std_dev(),
            rule: SimpsonRule::new(settings.quad_intervals)?,
        };
        let (lo, hi) = match payoff.option_type {
            OptionType::Put => (grid.first().exp(), strike),
            OptionType::Call => (strike, grid.last().exp()),
        };
        let accuracy = 1.0e-3 * settings.tolerance * strike;

        let mut values = grid.map(|y| payoff.value(y.exp()));
        let mut boundaries = vec![strike];
        let mut theta = strike;

        for k in 1..=settings.max_exercises {
            let split = theta.ln();
            let gap = |s: Real| {
                payoff.exercise_value(s) - rollback.continuation(s.ln(), split, &grid, &values)
            };
            let next = brent(gap, lo, hi, accuracy)?;
            let next_split = next.ln();

            let mut rolled = ValueVector::zeros(grid.len());
            for (i, &y) in grid.iter().enumerate() {
                rolled[i] = if exercise_side(payoff.option_type, y, next_split) {
                    payoff.value(y.exp())
                } else {
                    rollback.continuation(y, split, &grid, &values)
                };
            }
            values = rolled;

            let step = (next - theta).abs();
            boundaries.push(next);
            debug!(exercise = k, boundary = next, step, "Bermudan boundary iteration");
            if close(next, theta, settings.tolerance) {
                return Ok(BermudanSolution {
                    boundaries,
                    grid,
                    values,
                    option: *payoff,
                });
            }
            theta = next;
        }
        Err(Error::MaxIterations {
            iterations: settings.max_exercises,
        })
    }
}

/// One exercise period of discounted expectation.
struct Rollback {
    kernel: QuadKernel,
    payoff: VanillaPayoff,
    half_width: Real,
    rule: SimpsonRule,
}

impl Rollback {
    /// `C(x)` given the previous values and their exercise split.
    fn continuation(&self, x: Real, split: Real, grid: &Grid, values: &ValueVector) -> Real {
        let (lo, hi) = (x - self.half_width, x + self.half_width);
        let cut = split.clamp(lo, hi);
        let exercised = |y: Real| self.kernel.weight(x, y) * self.payoff.value(y.exp());
        let held = |y: Real| self.kernel.weight(x, y) * grid.interpolate(values, y);
        let rule = &self.rule;
        let integral = match self.payoff.option_type {
            OptionType::Put => rule.integrate(exercised, lo, cut) + rule.integrate(held, cut, hi),
            OptionType::Call => rule.integrate(held, lo, cut) + rule.integrate(exercised, cut, hi),
        };
        self.kernel.prefactor(x) * integral
    }
}

//! Jump integral of the Merton PIDE.
//!
//! For a reference level `S_j` the jump term needs
//!
//! $$I(S_j) = \int_0^\infty V(S_j\eta)\,g(\eta)\,d\eta
//!          = \frac{1}{S_j}\int_0^\infty V(S)\,g(S/S_j)\,dS,$$
//!
//! with `g` the log-normal density of the jump multiplier `η`. The integral
//! is evaluated on the price grid with the trapezium rule, sampling the
//! density once per interval at the midpoint.

use crate::params::JumpParams;
use nf_core::{errors::Error, Real, Result};
use nf_math::distributions::LogNormalDensity;
use nf_math::grid::{Grid, ValueVector};
use tracing::warn;

/// Fewer grid intervals than this per jump standard deviation triggers a
/// precision warning.
pub const MIN_INTERVALS_PER_JUMP_STD: Real = 4.0;

/// Trapezium-rule estimator of the jump integral `I(S_j)`.
#[derive(Debug, Clone)]
pub struct JumpIntegralEstimator {
    density: LogNormalDensity,
}

impl JumpIntegralEstimator {
    /// Estimator for `ln η ~ N(μ, γ²)`. Fails unless `γ > 0`.
    pub fn new(mu: Real, gamma: Real) -> Result<Self> {
        Ok(Self {
            density: LogNormalDensity::new(mu, gamma)?,
        })
    }

    /// Estimator for the jump distribution of `jumps`.
    pub fn from_params(jumps: &JumpParams) -> Result<Self> {
        Self::new(jumps.mean, jumps.volatility)
    }

    /// The jump multiplier density.
    pub fn density(&self) -> &LogNormalDensity {
        &self.density
    }

    /// `I(S_j)` for the value function `values` sampled on `grid`.
    ///
    /// The grid need not be uniform. Contributions from beyond the grid are
    /// dropped, so the grid should extend well past `S_j·e^{μ+3γ}`.
    pub fn estimate(&self, s_ref: Real, grid: &Grid, values: &ValueVector) -> Result<Real> {
        grid.check_aligned(values)?;
        if !(s_ref > 0.0 && s_ref.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "jump integral reference level must be positive, got {s_ref}"
            )));
        }
        let sum: Real = grid
            .as_slice()
            .windows(2)
            .zip(values.as_slice().windows(2))
            .map(|(s, v)| {
                let mid = 0.5 * (s[0] + s[1]);
                0.5 * (s[1] - s[0]) * (v[0] + v[1]) * self.density.pdf(mid / s_ref)
            })
            .sum();
        Ok(sum / s_ref)
    }

    /// Grid intervals per jump standard deviation around price `at`.
    ///
    /// A jump from `S` moves the price by roughly `γS`; the local spacing is
    /// taken from the grid cell containing `at`.
    pub fn intervals_per_jump_std(&self, grid: &Grid, at: Real) -> Real {
        let i = grid.locate(at);
        let ds = grid[i + 1] - grid[i];
        self.density.gamma() * at.abs() / ds
    }

    /// Emit a precision warning when the grid resolves the jump distribution
    /// at `at` with fewer than [`MIN_INTERVALS_PER_JUMP_STD`] intervals.
    ///
    /// Returns `true` if the warning was raised.
    pub fn coverage_warning(&self, grid: &Grid, at: Real) -> bool {
        let coverage = self.intervals_per_jump_std(grid, at);
        let coarse = coverage < MIN_INTERVALS_PER_JUMP_STD;
        if coarse {
            warn!(
                coverage,
                at,
                gamma = self.density.gamma(),
                "price grid under-resolves the jump distribution; jump integral loses precision"
            );
        }
        coarse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn price_grid(s_max: Real, intervals: usize) -> Grid {
        Grid::uniform(0.0, s_max, intervals).unwrap()
    }

    #[test]
    fn unit_function_integrates_to_one() {
        let est = JumpIntegralEstimator::new(0.0, 0.2).unwrap();
        let grid = price_grid(400.0, 400);
        let ones = ValueVector::from_element(grid.len(), 1.0);
        assert_abs_diff_eq!(est.estimate(100.0, &grid, &ones).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn error_shrinks_with_spacing() {
        let est = JumpIntegralEstimator::new(0.0, 0.1).unwrap();
        let errors: Vec<Real> = [10, 20, 40]
            .iter()
            .map(|&n| {
                let grid = price_grid(300.0, n);
                let ones = ValueVector::from_element(grid.len(), 1.0);
                (est.estimate(100.0, &grid, &ones).unwrap() - 1.0).abs()
            })
            .collect();
        assert!(errors[1] < errors[0] && errors[2] < errors[1], "{errors:?}");
        assert!(errors[2] < 1e-8);
    }

    #[test]
    fn linear_function_gives_expected_jump() {
        // ∫ S_j·η g(η) dη = S_j·E[η]
        let est = JumpIntegralEstimator::new(-0.1, 0.3).unwrap();
        let grid = price_grid(400.0, 800);
        let values = grid.map(|s| s);
        let expected = 100.0 * est.density().mean();
        assert_abs_diff_eq!(est.estimate(100.0, &grid, &values).unwrap(), expected, epsilon = 1e-3);
    }

    #[test]
    fn non_uniform_grid() {
        let est = JumpIntegralEstimator::new(0.0, 0.2).unwrap();
        let points: Vec<Real> = (0..=200).map(|i| 400.0 * (i as Real / 200.0).powi(2)).collect();
        let grid = Grid::from_points(points).unwrap();
        let ones = ValueVector::from_element(grid.len(), 1.0);
        assert_abs_diff_eq!(est.estimate(100.0, &grid, &ones).unwrap(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn rejects_bad_inputs() {
        let est = JumpIntegralEstimator::new(0.0, 0.2).unwrap();
        let grid = price_grid(4.0, 4);
        let ones = ValueVector::from_element(grid.len(), 1.0);
        assert!(matches!(
            est.estimate(0.0, &grid, &ones),
            Err(Error::InvalidArgument(_))
        ));
        let short = ValueVector::from_element(3, 1.0);
        assert!(matches!(
            est.estimate(1.0, &grid, &short),
            Err(Error::DimensionMismatch { expected: 5, found: 3 })
        ));
        assert!(JumpIntegralEstimator::new(0.0, 0.0).is_err());
    }

    #[test]
    fn coverage() {
        let est = JumpIntegralEstimator::new(0.0, 0.1).unwrap();
        let fine = price_grid(200.0, 400);
        let coarse = price_grid(200.0, 20);
        assert_abs_diff_eq!(est.intervals_per_jump_std(&fine, 100.0), 20.0, epsilon = 1e-9);
        assert!(!est.coverage_warning(&fine, 100.0));
        assert!(est.coverage_warning(&coarse, 100.0));
    }
}

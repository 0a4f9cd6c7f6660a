//! Discrete quadrature on sampled data.
//!
//! The pricing methods integrate functions that are known only at grid
//! nodes, so the rules here operate on a [`Grid`] plus an aligned
//! [`ValueVector`], or on a function sampled at uniformly spaced points.
//!
//! Simpson's composite rule needs an even number of sub-intervals; an odd
//! count would silently drop accuracy, so it is rejected instead.

use crate::grid::{Grid, ValueVector};
use nf_core::{ensure, errors::Error, Real, Result};

/// Composite trapezium rule on an arbitrary (possibly non-uniform) grid:
///
/// $$\sum_{k=0}^{n-2} \tfrac12 (x_{k+1}-x_k)(f_k + f_{k+1}).$$
pub fn trapezium(grid: &Grid, values: &ValueVector) -> Result<Real> {
    grid.check_aligned(values)?;
    let x = grid.as_slice();
    let f = values.as_slice();
    let sum: Real = x
        .windows(2)
        .zip(f.windows(2))
        .map(|(xw, fw)| (xw[1] - xw[0]) * (fw[0] + fw[1]))
        .sum();
    Ok(0.5 * sum)
}

/// Composite Simpson's rule on a uniform grid with an even number of
/// sub-intervals.
///
/// Weights are 1 at the end points, 4 at odd interior nodes and 2 at even
/// interior nodes, all scaled by `h/3`.
pub fn simpson(grid: &Grid, values: &ValueVector) -> Result<Real> {
    grid.check_aligned(values)?;
    let h = grid
        .spacing()
        .ok_or_else(|| Error::Precondition("Simpson's rule needs a uniformly spaced grid".into()))?;
    let intervals = grid.intervals();
    ensure!(
        intervals % 2 == 0,
        "Simpson's rule needs an even number of intervals, got {intervals}"
    );
    Ok(simpson_weighted_sum(values.as_slice()) * h / 3.0)
}

/// Composite Simpson's rule with a fixed, validated number of uniform
/// sub-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpsonRule {
    intervals: usize,
}

impl SimpsonRule {
    /// Fails with `Precondition` unless `intervals` is even and positive.
    pub fn new(intervals: usize) -> Result<Self> {
        ensure!(
            intervals >= 2 && intervals % 2 == 0,
            "Simpson's rule needs an even, positive number of intervals, got {intervals}"
        );
        Ok(Self { intervals })
    }

    /// Number of sub-intervals.
    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Integral of `f` over `[a, b]`; `a == b` integrates to zero.
    pub fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Real {
        if a == b {
            return 0.0;
        }
        let n = self.intervals;
        let h = (b - a) / n as Real;
        let mut sum = f(a) + f(b);
        for i in 1..n {
            let w = if i % 2 == 1 { 4.0 } else { 2.0 };
            sum += w * f(a + i as Real * h);
        }
        sum * h / 3.0
    }
}

/// Composite Simpson's rule for `f` on `[a, b]` with `intervals` (even)
/// uniform sub-intervals.
///
/// `a == b` integrates to zero.
pub fn simpson_fn<F: Fn(Real) -> Real>(f: F, a: Real, b: Real, intervals: usize) -> Result<Real> {
    Ok(SimpsonRule::new(intervals)?.integrate(f, a, b))
}

fn simpson_weighted_sum(f: &[Real]) -> Real {
    let n = f.len();
    let interior: Real = f[1..n - 1]
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { 4.0 * v } else { 2.0 * v })
        .sum();
    f[0] + interior + f[n - 1]
}

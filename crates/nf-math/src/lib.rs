//! # nf-math
//!
//! Numerical primitives shared by the pricing methods: aligned grid/value
//! containers, the tridiagonal (Thomas) solver, discrete quadrature rules,
//! 1-D root finders, Runge-Kutta stepping, and the normal / log-normal
//! distributions (via statrs).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Grids and the value vectors aligned with them.
pub mod grid;

/// Discrete quadrature on sampled data.
pub mod integrals;

/// Fixed-step Runge-Kutta integration.
pub mod ode;

/// 1D root-finding solvers.
pub mod solvers1d;

/// Tridiagonal systems and the Thomas algorithm.
pub mod tridiagonal;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, relative_difference};
pub use distributions::{normal_cdf, LogNormalDensity};
pub use grid::{Grid, ValueVector};
pub use integrals::{simpson, simpson_fn, trapezium, SimpsonRule};
pub use ode::{DerivativeFunction, OdeState, RungeKutta4};
pub use solvers1d::{bisection, brent};
pub use tridiagonal::{thomas_solve, TridiagonalSystem};

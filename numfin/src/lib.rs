//! # numfin
//!
//! Classical numerical methods for option pricing: an implicit-explicit
//! finite-difference solver for Merton jump-diffusion, free-boundary solvers
//! for perpetual American and Bermudan options, and QUAD quadrature pricing.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `nf-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use numfin::methods::{FreeBoundarySolver, MarketParams, VanillaPayoff};
//!
//! let solver = FreeBoundarySolver::new(MarketParams::new(0.04, 0.04, 0.2))?;
//! let put = solver.perpetual(&VanillaPayoff::put(1.0))?;
//! assert!((put.boundary - 0.5).abs() < 1e-12);
//! # Ok::<(), numfin::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use nf_core as core;

/// Numerical primitives: grids, tridiagonal solver, quadrature, root
/// finding, Runge-Kutta, distributions.
pub use nf_math as math;

/// Pricing methods: finite differences, free boundaries, QUAD.
pub use nf_methods as methods;

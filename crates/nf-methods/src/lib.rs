//! # nf-methods
//!
//! Pricing methods built on the `nf-math` primitives: a finite-difference
//! solver for Merton jump-diffusion, free-boundary solvers for perpetual
//! American and Bermudan options, and QUAD quadrature pricing.
//!
//! # Modules
//!
//! * [`finite_differences`] — jump integral and implicit-explicit stepper
//! * [`free_boundary`] — perpetual closed form, ODE shooting, Bermudan iteration
//! * [`quad`] — QUAD kernel and European pricer
//! * [`analytic`] — Black-Scholes and Merton reference prices
//! * [`convergence`] — grid-doubling convergence tables

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Closed-form reference prices.
pub mod analytic;

/// Convergence tables for refinement studies.
pub mod convergence;

/// Finite-difference methods: jump integral, implicit-explicit stepper.
pub mod finite_differences;

/// Free-boundary solvers for options without expiry.
pub mod free_boundary;

/// Market and jump parameters.
pub mod params;

/// Payoffs and their boundary conditions.
pub mod payoff;

/// QUAD quadrature pricing.
pub mod quad;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use analytic::{black_scholes, merton_jump_diffusion};
pub use convergence::{ConvergenceRow, ConvergenceTable};
pub use finite_differences::{
    ExerciseStyle, FdSettings, FdSolution, ImplicitExplicitStepper, JumpIntegralEstimator,
};
pub use free_boundary::{
    BermudanSettings, BermudanSolution, FreeBoundarySolver, PerpetualSolution, ShootingSettings,
};
pub use params::{JumpParams, MarketParams};
pub use payoff::{OptionType, PayoffFunction, VanillaPayoff};
pub use quad::{QuadKernel, QuadPricer};

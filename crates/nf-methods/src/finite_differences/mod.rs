//! Finite-difference pricing under Merton jump-diffusion.
//!
//! # Overview
//!
//! * [`JumpIntegralEstimator`] — trapezium-rule jump integral on the price grid
//! * [`ImplicitExplicitStepper`] — implicit diffusion, explicit jumps, one
//!   tridiagonal solve per timestep
//! * [`FdSettings`] / [`FdSolution`] — grid settings and the time-zero result
//! * [`ExerciseStyle`] — European, or American by projection onto the payoff

pub mod jump_integral;
pub mod stepper;

pub use jump_integral::JumpIntegralEstimator;
pub use stepper::{ExerciseStyle, FdSettings, FdSolution, ImplicitExplicitStepper};

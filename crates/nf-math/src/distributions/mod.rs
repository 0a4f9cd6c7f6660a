//! Probability distributions.
//!
//! The normal distribution backs the closed-form reference prices; the
//! log-normal density is the jump-size distribution of the jump-diffusion
//! model. Both delegate to the `statrs` crate.

pub mod lognormal;
pub mod normal;

pub use lognormal::LogNormalDensity;
pub use normal::normal_cdf;

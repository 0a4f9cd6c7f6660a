//! Optimal-exercise (free) boundaries for options without expiry.
//!
//! # Overview
//!
//! * [`FreeBoundarySolver::perpetual`] — closed-form perpetual American
//!   boundary `S_f` and value function
//! * [`FreeBoundarySolver::shoot`] — the same boundary found by integrating
//!   the pricing ODE with Runge-Kutta and root-finding the start point
//! * [`FreeBoundarySolver::bermudan`] — exercise every ΔT forever; the
//!   boundary is iterated to a fixed point with the QUAD kernel
//!
//! All three take a [`VanillaPayoff`](crate::payoff::VanillaPayoff) and work
//! for puts and calls. A put is exercised below its boundary, a call above.

pub mod bermudan;
pub mod perpetual;
pub mod shooting;

pub use bermudan::{BermudanSettings, BermudanSolution};
pub use perpetual::PerpetualSolution;
pub use shooting::ShootingSettings;

use crate::params::MarketParams;
use nf_core::Result;

/// Free-boundary solver for one market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeBoundarySolver {
    market: MarketParams,
}

impl FreeBoundarySolver {
    /// Create a solver. Fails if the market parameters are invalid.
    pub fn new(market: MarketParams) -> Result<Self> {
        market.validate()?;
        Ok(Self { market })
    }

    /// Market parameters.
    pub fn market(&self) -> &MarketParams {
        &self.market
    }
}

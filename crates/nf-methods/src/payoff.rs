//! Option payoffs.
//!
//! A [`PayoffFunction`] supplies the terminal condition of a pricing problem
//! and the Dirichlet values at the edges of a finite-difference domain.
//! Closures `Fn(Real) -> Real` are payoffs too, with discounted-payoff
//! boundaries.

use crate::params::MarketParams;
use nf_core::{Price, Real, Time};
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// Payoff of an option as a function of the underlying price.
pub trait PayoffFunction {
    /// Payoff at underlying price `price`.
    fn value(&self, price: Real) -> Real;

    /// Dirichlet values at `s_min` and `s_max` with `tau` years left to
    /// expiry.
    ///
    /// The default discounts the payoff at the risk-free rate.
    fn boundary_values(
        &self,
        s_min: Real,
        s_max: Real,
        tau: Time,
        market: &MarketParams,
    ) -> (Real, Real) {
        let df = (-market.rate * tau).exp();
        (self.value(s_min) * df, self.value(s_max) * df)
    }

    /// Price where the payoff has its kink, if it has one.
    fn kink(&self) -> Option<Price> {
        None
    }
}

impl<F> PayoffFunction for F
where
    F: Fn(Real) -> Real,
{
    fn value(&self, price: Real) -> Real {
        (self)(price)
    }
}

/// Plain vanilla payoff `max(φ(S − X), 0)`, `φ = +1` for calls and `−1` for
/// puts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Price,
}

impl VanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Price) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    /// A put struck at `strike`.
    pub fn put(strike: Real) -> Self {
        Self::new(OptionType::Put, strike)
    }

    /// A call struck at `strike`.
    pub fn call(strike: Real) -> Self {
        Self::new(OptionType::Call, strike)
    }

    /// Signed exercise value `φ(S − X)`, negative when out of the money.
    pub fn exercise_value(&self, price: Real) -> Real {
        self.option_type.sign() * (price - self.strike)
    }
}

impl PayoffFunction for VanillaPayoff {
    fn value(&self, price: Real) -> Real {
        self.exercise_value(price).max(0.0)
    }

    /// Discounted forward intrinsic value `max(φ(S·e^{−dτ} − X·e^{−rτ}), 0)`:
    /// `X·e^{−rτ}` / `0` for a put at `S = 0` / far out, `0` /
    /// `S·e^{−dτ} − X·e^{−rτ}` for a call.
    fn boundary_values(
        &self,
        s_min: Real,
        s_max: Real,
        tau: Time,
        market: &MarketParams,
    ) -> (Real, Real) {
        let df_r = (-market.rate * tau).exp();
        let df_d = (-market.dividend * tau).exp();
        let phi = self.option_type.sign();
        let edge = |s: Real| (phi * (s * df_d - self.strike * df_r)).max(0.0);
        (edge(s_min), edge(s_max))
    }

    fn kink(&self) -> Option<Price> {
        Some(self.strike)
    }
}

impl fmt::Display for VanillaPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vanilla {} @ {}", self.option_type, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_values() {
        let call = VanillaPayoff::call(100.0);
        let put = VanillaPayoff::put(100.0);
        assert_eq!(call.value(110.0), 10.0);
        assert_eq!(call.value(90.0), 0.0);
        assert_eq!(put.value(90.0), 10.0);
        assert_eq!(put.value(110.0), 0.0);
        assert_eq!(put.exercise_value(110.0), -10.0);
    }

    #[test]
    fn vanilla_boundaries() {
        let market = MarketParams::new(0.05, 0.02, 0.2);
        let tau = 0.5;
        let (lo, hi) = VanillaPayoff::put(100.0).boundary_values(0.0, 400.0, tau, &market);
        assert!((lo - 100.0 * (-0.025_f64).exp()).abs() < 1e-12);
        assert_eq!(hi, 0.0);

        let (lo, hi) = VanillaPayoff::call(100.0).boundary_values(0.0, 400.0, tau, &market);
        assert_eq!(lo, 0.0);
        let expected = 400.0 * (-0.01_f64).exp() - 100.0 * (-0.025_f64).exp();
        assert!((hi - expected).abs() < 1e-12);
    }

    #[test]
    fn closures_are_payoffs() {
        let digital = |s: Real| if s > 1.0 { 1.0 } else { 0.0 };
        let market = MarketParams::new(0.1, 0.0, 0.2);
        assert_eq!(digital.value(2.0), 1.0);
        let (lo, hi) = digital.boundary_values(0.0, 3.0, 1.0, &market);
        assert_eq!(lo, 0.0);
        assert!((hi - (-0.1_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn display() {
        assert_eq!(VanillaPayoff::put(1.5).to_string(), "Vanilla Put @ 1.5");
    }
}

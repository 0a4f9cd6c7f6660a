//! Closed-form European prices used as references for the numerical methods.
//!
//! Black-Scholes-Merton with a continuous dividend yield, and Merton's
//! jump-diffusion price as a Poisson-weighted series of Black-Scholes prices.

use crate::params::{JumpParams, MarketParams};
use crate::payoff::OptionType;
use nf_core::{fail, Real, Result, Time};
use nf_math::distributions::normal_cdf;

/// Series terms are added until the Poisson weight falls below this (after
/// the mode of the distribution has been passed).
const SERIES_TOLERANCE: Real = 1.0e-16;

/// Hard cap on the number of Poisson terms.
const MAX_SERIES_TERMS: usize = 500;

/// Black-Scholes-Merton price of a European option:
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$.
///
/// At or past expiry the intrinsic value is returned.
pub fn black_scholes(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    market: &MarketParams,
    time_to_expiry: Time,
) -> Real {
    let phi = option_type.sign();
    let t = time_to_expiry;
    if t <= 0.0 {
        return (phi * (spot - strike)).max(0.0);
    }

    let (r, q, sigma) = (market.rate, market.dividend, market.volatility);
    let std_dev = sigma * t.sqrt();
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();

    let (d1, d2) = if std_dev > 1e-15 {
        let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
        (d1, d1 - std_dev)
    } else {
        let fwd = spot * ((r - q) * t).exp();
        let big = if fwd > strike { 1e15 } else { -1e15 };
        (big, big)
    };

    phi * (spot * df_q * normal_cdf(phi * d1) - strike * df_r * normal_cdf(phi * d2))
}

/// Merton (1976) jump-diffusion price of a European option.
///
/// $$V = \sum_{n\ge0} \frac{e^{-\lambda' T}(\lambda' T)^n}{n!}\,
///       BS(S, K, r_n, q, \sigma_n, T)$$
///
/// with $\lambda' = \lambda(1+\kappa)$,
/// $r_n = r - \lambda\kappa + n(\mu + \tfrac12\gamma^2)/T$ and
/// $\sigma_n^2 = \sigma^2 + n\gamma^2/T$. Without jumps this is
/// [`black_scholes`].
pub fn merton_jump_diffusion(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    market: &MarketParams,
    jumps: &JumpParams,
    time_to_expiry: Time,
) -> Result<Real> {
    market.validate()?;
    jumps.validate()?;
    let t = time_to_expiry;
    if !jumps.has_jumps() || t <= 0.0 {
        return Ok(black_scholes(option_type, spot, strike, market, t));
    }

    let kappa = jumps.compensator();
    let lambda_t = jumps.intensity * (1.0 + kappa) * t;
    let log_jump = jumps.mean + 0.5 * jumps.volatility * jumps.volatility;
    let gamma2 = jumps.volatility * jumps.volatility;

    let mut weight = (-lambda_t).exp();
    let mut price = 0.0;
    for n in 0..MAX_SERIES_TERMS {
        if n > 0 {
            weight *= lambda_t / n as Real;
        }
        let nf = n as Real;
        let term_market = MarketParams {
            rate: market.rate - jumps.intensity * kappa + nf * log_jump / t,
            dividend: market.dividend,
            volatility: (market.variance() + nf * gamma2 / t).sqrt(),
        };
        price += weight * black_scholes(option_type, spot, strike, &term_market, t);
        if nf > lambda_t && weight < SERIES_TOLERANCE {
            return Ok(price);
        }
    }
    fail!("Merton series did not converge within {MAX_SERIES_TERMS} terms (λ'T = {lambda_t})");
}

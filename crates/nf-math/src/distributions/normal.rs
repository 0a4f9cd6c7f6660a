//! Standard normal distribution.

use nf_core::Real;
use statrs::function::erf::erfc;
use std::f64::consts::FRAC_1_SQRT_2;

/// The standard normal cumulative distribution function Φ(x).
///
/// Computed as `½·erfc(−x/√2)`. Absolute accuracy is about 1e-11, limited
/// by the `statrs` complementary error function.
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

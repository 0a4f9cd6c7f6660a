//! Floating-point comparison utilities.

use nf_core::Real;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// `|a - b| / max(|a|, |b|, 1)`.
///
/// Falls back to the absolute difference for values below one in magnitude,
/// so residuals of nearly-zero right-hand sides stay meaningful.
#[inline]
pub fn relative_difference(a: Real, b: Real) -> Real {
    (a - b).abs() / a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_basic() {
        assert!(close(1.0, 1.0 + 1e-11, 1e-10));
        assert!(!close(1.0, 1.0 + 1e-9, 1e-10));
    }

    #[test]
    fn relative_difference_scales() {
        assert!(relative_difference(1000.0, 1001.0) < 1.1e-3);
        assert!((relative_difference(1e-3, 2e-3) - 1e-3).abs() < 1e-15);
    }
}

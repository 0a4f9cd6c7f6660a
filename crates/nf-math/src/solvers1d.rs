//! 1D root-finding solvers.
//!
//! Both solvers need a bracket `[x_min, x_max]` on which `f` changes sign.
//! A missing sign change means the surrounding problem is badly configured
//! (there is no root to find), so it is reported as
//! [`Error::FatalConfiguration`] rather than as a soft failure.

use nf_core::{errors::Error, Real, Result};

const MAX_ITERATIONS: usize = 200;
const DEFAULT_ACCURACY: Real = 1.0e-11;

fn not_bracketed(method: &str, a: Real, fa: Real, b: Real, fb: Real) -> Error {
    Error::FatalConfiguration(format!(
        "{method}: root not bracketed, f({a}) = {fa} and f({b}) = {fb} have the same sign"
    ))
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 || fa.is_nan() || fb.is_nan() {
        return Err(not_bracketed("brent", a, fa, b, fb));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..MAX_ITERATIONS {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::MaxIterations {
        iterations: MAX_ITERATIONS,
    })
}

// ── Bisection ────────────────────────────────────────────────────────────────

/// Simple bisection method.
pub fn bisection<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let fb = f(b);

    if fa * fb > 0.0 || fa.is_nan() || fb.is_nan() {
        return Err(not_bracketed("bisection", a, fa, b, fb));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (a + b);
        let fm = f(mid);
        if fm == 0.0 || (b - a) * 0.5 < acc {
            return Ok(mid);
        }
        if fm * fa > 0.0 {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    Err(Error::MaxIterations {
        iterations: MAX_ITERATIONS,
    })
}

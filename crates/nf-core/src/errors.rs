//! Error types for numfin-rs.
//!
//! Every fallible routine returns [`Result`]. Failures are deterministic: a
//! computation that fails once fails again with the same inputs, so nothing
//! in the library retries. Soft accuracy problems (coarse grids relative to a
//! jump distribution, for instance) are reported through `tracing` warnings
//! rather than through this type.

use thiserror::Error;

/// The top-level error type used throughout numfin-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated (malformed grid, odd interval count, ...).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two sequences that must be aligned index-for-index have different
    /// lengths.
    #[error("dimension mismatch: expected length {expected}, found {found}")]
    DimensionMismatch {
        /// The required length.
        expected: usize,
        /// The length actually supplied.
        found: usize,
    },

    /// A pivot or denominator vanished (or became non-finite) during
    /// elimination.
    #[error("numerical instability: pivot {pivot} at row {row}")]
    NumericalInstability {
        /// Row at which elimination broke down.
        row: usize,
        /// The offending modified pivot.
        pivot: f64,
    },

    /// Parameters yield a degenerate or unsolvable problem (non-positive
    /// volatility, degenerate characteristic root, non-bracketing root
    /// search, ...).
    #[error("fatal configuration error: {0}")]
    FatalConfiguration(String),

    /// An iteration did not converge within its budget.
    #[error("no convergence after {iterations} iterations")]
    MaxIterations {
        /// Number of iterations performed.
        iterations: usize,
    },
}

/// Shorthand `Result` type used throughout numfin-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use nf_core::{ensure, errors::Error};
/// fn positive(x: f64) -> nf_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::FatalConfiguration(...))` if `$cond` is false.
///
/// Used for parameter checks that must reject a run before any numerical
/// work starts.
///
/// # Example
/// ```
/// use nf_core::{ensure_config, errors::Error};
/// fn vol(sigma: f64) -> nf_core::errors::Result<f64> {
///     ensure_config!(sigma > 0.0, "volatility must be positive, got {sigma}");
///     Ok(sigma)
/// }
/// assert!(matches!(vol(0.0), Err(Error::FatalConfiguration(_))));
/// ```
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::FatalConfiguration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use nf_core::{fail, errors::Error};
/// fn always_err() -> nf_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

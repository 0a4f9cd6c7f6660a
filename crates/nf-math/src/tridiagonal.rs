//! Tridiagonal linear systems and the Thomas algorithm.
//!
//! A [`TridiagonalSystem`] stores the four parallel bands of
//! `a[j]·x[j-1] + b[j]·x[j] + c[j]·x[j+1] = d[j]`, `j = 0..n-1`, with `a[0]`
//! and `c[n-1]` ignored. Finite-difference steppers build one system per
//! timestep and discard it after [`TridiagonalSystem::solve`].

use crate::grid::ValueVector;
use nf_core::{ensure, errors::Error, Real, Result};

/// One tridiagonal linear system: sub-diagonal, diagonal, super-diagonal and
/// right-hand side, all of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    lower: Vec<Real>,
    diag: Vec<Real>,
    upper: Vec<Real>,
    rhs: Vec<Real>,
}

impl TridiagonalSystem {
    /// A zero system of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
            rhs: vec![0.0; n],
        }
    }

    /// Build a system from its four bands, checking that all have the same
    /// length.
    pub fn from_bands(
        lower: Vec<Real>,
        diag: Vec<Real>,
        upper: Vec<Real>,
        rhs: Vec<Real>,
    ) -> Result<Self> {
        let n = diag.len();
        for band in [&lower, &upper, &rhs] {
            if band.len() != n {
                return Err(Error::DimensionMismatch {
                    expected: n,
                    found: band.len(),
                });
            }
        }
        Ok(Self {
            lower,
            diag,
            upper,
            rhs,
        })
    }

    /// Size (number of rows).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Set row `j` to `a·x[j-1] + b·x[j] + c·x[j+1] = d`.
    pub fn set_row(&mut self, j: usize, a: Real, b: Real, c: Real, d: Real) {
        self.lower[j] = a;
        self.diag[j] = b;
        self.upper[j] = c;
        self.rhs[j] = d;
    }

    /// Set row `j` to the Dirichlet condition `x[j] = value`.
    pub fn set_dirichlet(&mut self, j: usize, value: Real) {
        self.set_row(j, 0.0, 1.0, 0.0, value);
    }

    /// Sub-diagonal band.
    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    /// Main diagonal band.
    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    /// Super-diagonal band.
    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    /// Right-hand side.
    pub fn rhs(&self) -> &[Real] {
        &self.rhs
    }

    /// Apply the matrix: `y = A · x`.
    pub fn apply(&self, x: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        if x.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: x.len(),
            });
        }
        let y = (0..n)
            .map(|j| {
                let mut yj = self.diag[j] * x[j];
                if j > 0 {
                    yj += self.lower[j] * x[j - 1];
                }
                if j + 1 < n {
                    yj += self.upper[j] * x[j + 1];
                }
                yj
            })
            .collect();
        Ok(y)
    }

    /// Solve the system by Thomas elimination.
    pub fn solve(&self) -> Result<ValueVector> {
        thomas_solve(&self.lower, &self.diag, &self.upper, &self.rhs).map(ValueVector::from_vec)
    }
}

/// Solve `a[j]·x[j-1] + b[j]·x[j] + c[j]·x[j+1] = d[j]` with the Thomas
/// algorithm.
///
/// Forward sweep: `b'[j] = b[j] − a[j]·c[j-1]/b'[j-1]` and
/// `d'[j] = d[j] − a[j]·d'[j-1]/b'[j-1]`. Back substitution:
/// `x[n-1] = d'[n-1]/b'[n-1]`, `x[j] = (d'[j] − c[j]·x[j+1]) / b'[j]`.
///
/// Exact for non-singular systems whose modified pivots stay non-zero, which
/// holds for diagonally dominant matrices. A zero or non-finite pivot is
/// reported as [`Error::NumericalInstability`].
pub fn thomas_solve(a: &[Real], b: &[Real], c: &[Real], d: &[Real]) -> Result<Vec<Real>> {
    let n = b.len();
    ensure!(n > 0, "tridiagonal system must not be empty");
    for band in [a, c, d] {
        if band.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: band.len(),
            });
        }
    }

    let mut b_mod = vec![0.0; n];
    let mut d_mod = vec![0.0; n];
    b_mod[0] = check_pivot(0, b[0])?;
    d_mod[0] = d[0];

    for j in 1..n {
        let m = a[j] / b_mod[j - 1];
        b_mod[j] = check_pivot(j, b[j] - m * c[j - 1])?;
        d_mod[j] = d[j] - m * d_mod[j - 1];
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_mod[n - 1] / b_mod[n - 1];
    for j in (0..n - 1).rev() {
        x[j] = (d_mod[j] - c[j] * x[j + 1]) / b_mod[j];
    }
    Ok(x)
}

#[inline]
fn check_pivot(row: usize, pivot: Real) -> Result<Real> {
    if pivot == 0.0 || !pivot.is_finite() {
        return Err(Error::NumericalInstability { row, pivot });
    }
    Ok(pivot)
}

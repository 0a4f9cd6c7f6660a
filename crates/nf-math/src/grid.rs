//! Grids and aligned value vectors.
//!
//! A [`Grid`] is a strictly increasing sequence of abscissas (asset prices or
//! log-prices). A [`ValueVector`] holds one real per grid node — typically an
//! option value function at one time level — as a thin newtype over
//! `nalgebra::DVector<f64>`.
//!
//! Both types validate their invariants on construction; routines that take
//! a grid together with a value vector check alignment with
//! [`Grid::check_aligned`] before touching the data.

use nalgebra::DVector;
use nf_core::{ensure, errors::Error, Real, Result};
use std::ops::{Index, IndexMut};

/// Relative tolerance used to decide whether a grid is uniformly spaced.
const UNIFORM_TOLERANCE: Real = 1.0e-9;

// ── Grid ──────────────────────────────────────────────────────────────────────

/// A strictly increasing sequence of at least two finite abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    points: Vec<Real>,
    spacing: Option<Real>,
}

impl Grid {
    /// Build a grid from explicit points.
    ///
    /// Fails if fewer than two points are given, a point is not finite, or
    /// the points are not strictly increasing.
    pub fn from_points(points: Vec<Real>) -> Result<Self> {
        ensure!(
            points.len() >= 2,
            "a grid needs at least 2 points, got {}",
            points.len()
        );
        ensure!(
            points.iter().all(|p| p.is_finite()),
            "grid points must be finite"
        );
        if let Some(k) = points.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::Precondition(format!(
                "grid must be strictly increasing: x[{}] = {} >= x[{}] = {}",
                k,
                points[k],
                k + 1,
                points[k + 1]
            )));
        }
        let spacing = uniform_spacing(&points);
        Ok(Self { points, spacing })
    }

    /// `intervals + 1` equally spaced points from `lower` to `upper`.
    pub fn uniform(lower: Real, upper: Real, intervals: usize) -> Result<Self> {
        ensure!(intervals >= 1, "a uniform grid needs at least one interval");
        ensure!(
            lower.is_finite() && upper.is_finite() && upper > lower,
            "uniform grid bounds must be finite with upper > lower, got [{lower}, {upper}]"
        );
        let h = (upper - lower) / intervals as Real;
        let mut points: Vec<Real> = (0..=intervals).map(|i| lower + i as Real * h).collect();
        points[intervals] = upper;
        Ok(Self {
            points,
            spacing: Some(h),
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a grid has at least two nodes.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of sub-intervals (`len() - 1`).
    pub fn intervals(&self) -> usize {
        self.points.len() - 1
    }

    /// The nodes as a slice.
    pub fn as_slice(&self) -> &[Real] {
        &self.points
    }

    /// Iterator over nodes.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.points.iter()
    }

    /// First node.
    pub fn first(&self) -> Real {
        self.points[0]
    }

    /// Last node.
    pub fn last(&self) -> Real {
        self.points[self.points.len() - 1]
    }

    /// The common spacing `h` if the grid is uniform.
    pub fn spacing(&self) -> Option<Real> {
        self.spacing
    }

    /// `true` if all sub-intervals have the same width.
    pub fn is_uniform(&self) -> bool {
        self.spacing.is_some()
    }

    /// Evaluate `f` at every node.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> ValueVector {
        ValueVector::from_vec(self.points.iter().map(|&x| f(x)).collect())
    }

    /// Fail with [`Error::DimensionMismatch`] unless `values` has one entry
    /// per node.
    pub fn check_aligned(&self, values: &ValueVector) -> Result<()> {
        if values.len() != self.len() {
            return Err(Error::DimensionMismatch {
                expected: self.len(),
                found: values.len(),
            });
        }
        Ok(())
    }

    /// Index `i` of the cell `[x_i, x_{i+1}]` containing `x`, clamped to
    /// `0..=len-2`.
    pub fn locate(&self, x: Real) -> usize {
        let i = self.points.partition_point(|&p| p <= x);
        i.saturating_sub(1).min(self.points.len() - 2)
    }

    /// Piecewise-linear interpolation of `values` at `x`.
    ///
    /// Values outside the grid are extended flat from the nearest end node.
    /// `values` must be aligned with the grid (see [`Grid::check_aligned`]).
    pub fn interpolate(&self, values: &ValueVector, x: Real) -> Real {
        debug_assert_eq!(values.len(), self.len());
        if x <= self.first() {
            return values[0];
        }
        if x >= self.last() {
            return values[self.len() - 1];
        }
        let i = self.locate(x);
        let (x0, x1) = (self.points[i], self.points[i + 1]);
        let w = (x - x0) / (x1 - x0);
        values[i] * (1.0 - w) + values[i + 1] * w
    }
}

impl Index<usize> for Grid {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.points[i]
    }
}

fn uniform_spacing(points: &[Real]) -> Option<Real> {
    let h = (points[points.len() - 1] - points[0]) / (points.len() - 1) as Real;
    let tol = UNIFORM_TOLERANCE * h.abs().max(points[0].abs()).max(1.0);
    points
        .windows(2)
        .all(|w| ((w[1] - w[0]) - h).abs() <= tol)
        .then_some(h)
}

// ── ValueVector ───────────────────────────────────────────────────────────────

/// Values of a discretised function, one per grid node.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueVector(DVector<Real>);

impl ValueVector {
    /// Create a zero-filled vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self(DVector::zeros(n))
    }

    /// Create a vector filled with `value`.
    pub fn from_element(n: usize, value: Real) -> Self {
        Self(DVector::from_element(n, value))
    }

    /// Create a vector from a `Vec`.
    pub fn from_vec(data: Vec<Real>) -> Self {
        Self(DVector::from_vec(data))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the elements as a slice.
    pub fn as_slice(&self) -> &[Real] {
        self.0.as_slice()
    }

    /// Iterator over elements.
    pub fn iter(&self) -> impl Iterator<Item = &Real> {
        self.0.iter()
    }

    /// Mutable iterator over elements.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Real> {
        self.0.iter_mut()
    }

    /// Apply a function element-wise, returning a new vector.
    pub fn map<F: Fn(Real) -> Real>(&self, f: F) -> Self {
        Self(self.0.map(f))
    }
}

impl From<Vec<Real>> for ValueVector {
    fn from(v: Vec<Real>) -> Self {
        Self::from_vec(v)
    }
}

impl From<DVector<Real>> for ValueVector {
    fn from(v: DVector<Real>) -> Self {
        Self(v)
    }
}

impl Index<usize> for ValueVector {
    type Output = Real;
    fn index(&self, i: usize) -> &Real {
        &self.0[i]
    }
}

impl IndexMut<usize> for ValueVector {
    fn index_mut(&mut self, i: usize) -> &mut Real {
        &mut self.0[i]
    }
}

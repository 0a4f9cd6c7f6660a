//! Fixed-step Runge-Kutta integration.
//!
//! The stepper is generic over the state type: anything that can be added
//! and scaled by a real ([`OdeState`]) works, so scalar ODEs use `f64` and
//! small systems use `nalgebra`'s static vectors (e.g. `Vector2<f64>` for a
//! second-order equation written as `(y, y')`).

use nf_core::{ensure, Real, Result};
use std::ops::{Add, Mul};

/// State of an ODE system: closed under addition and scaling by a real.
pub trait OdeState: Clone + Add<Output = Self> + Mul<Real, Output = Self> {}

impl<T> OdeState for T where T: Clone + Add<Output = T> + Mul<Real, Output = T> {}

/// Right-hand side `f(t, y)` of `dy/dt = f(t, y)`.
pub trait DerivativeFunction<S: OdeState> {
    /// Evaluate `dy/dt` at `(t, y)`.
    fn derivative(&self, t: Real, y: &S) -> S;
}

impl<S, F> DerivativeFunction<S> for F
where
    S: OdeState,
    F: Fn(Real, &S) -> S,
{
    fn derivative(&self, t: Real, y: &S) -> S {
        (self)(t, y)
    }
}

/// Classical fourth-order Runge-Kutta with a fixed number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RungeKutta4 {
    steps: usize,
}

impl RungeKutta4 {
    /// A stepper that covers any interval in `steps` equal steps.
    pub fn new(steps: usize) -> Result<Self> {
        ensure!(steps > 0, "Runge-Kutta needs at least one step");
        Ok(Self { steps })
    }

    /// Number of steps per integration.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// One RK4 step of size `h` from `(t, y)`.
    pub fn step<S, F>(f: &F, t: Real, y: &S, h: Real) -> S
    where
        S: OdeState,
        F: DerivativeFunction<S>,
    {
        let k1 = f.derivative(t, y);
        let k2 = f.derivative(t + 0.5 * h, &(y.clone() + k1.clone() * (0.5 * h)));
        let k3 = f.derivative(t + 0.5 * h, &(y.clone() + k2.clone() * (0.5 * h)));
        let k4 = f.derivative(t + h, &(y.clone() + k3.clone() * h));
        y.clone() + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
    }

    /// Integrate from `(t0, y0)` to `t1`, returning `y(t1)`.
    ///
    /// `t1 < t0` integrates backward.
    pub fn integrate<S, F>(&self, f: &F, t0: Real, y0: S, t1: Real) -> S
    where
        S: OdeState,
        F: DerivativeFunction<S>,
    {
        let h = (t1 - t0) / self.steps as Real;
        (0..self.steps).fold(y0, |y, i| Self::step(f, t0 + i as Real * h, &y, h))
    }
}

use alloc::vec::Vec;
use core::fmt;

use crate::matrix::DenseMatrix;
use crate::traits::{Accum, FloatScalar};

/// One completed Newton step, handed to the observer of
/// [`NewtonSolver::solve_with`](super::NewtonSolver::solve_with).
///
/// The `Display` form is a single fixed-width line:
///
/// ```text
/// [newton] iter      0 | F  1.000000e+00 | s  7.071068e-01 | lambda 1.000e+00
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonIteration<T> {
    /// Zero-based iteration index `k`.
    pub iteration: usize,
    /// Iterate `x_k` the step was computed at.
    pub x: DenseMatrix<T>,
    /// Residual vector `F(x_k)`.
    pub residual: DenseMatrix<T>,
    /// `||F(x_k)||_2`.
    pub residual_norm: Accum,
    /// Undamped Newton step `s_k` solving `J s = -F`.
    pub step: DenseMatrix<T>,
    /// `||s_k||_2`.
    pub step_norm: Accum,
    /// Damping factor applied to the step.
    pub damping: T,
    /// Next iterate `x_k + damping * s_k`.
    pub x_next: DenseMatrix<T>,
}

impl<T: FloatScalar> fmt::Display for NewtonIteration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[newton] iter {:>6} | F {:>13.6e} | s {:>13.6e} | lambda {:>9.3e}",
            self.iteration,
            self.residual_norm,
            self.step_norm,
            self.damping.to_accum()
        )
    }
}

/// Collects iteration records from an observer.
///
/// ```
/// use nlsolve::optim::{NewtonSettings, NewtonSolver, NewtonTrace, NonlinearSystem};
/// use nlsolve::DenseMatrix;
///
/// let system = NonlinearSystem::new().with(|x: &[f64]| x[0] * x[0] - 4.0);
/// let solver = NewtonSolver::new(system, NewtonSettings::default());
///
/// let mut trace = NewtonTrace::new();
/// let result = solver
///     .solve_with(&DenseMatrix::column_vector(&[1.0]), |it| trace.record(it))
///     .unwrap();
/// assert_eq!(trace.len(), result.iterations);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewtonTrace<T> {
    records: Vec<NewtonIteration<T>>,
}

impl<T: FloatScalar> NewtonTrace<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Store a copy of `it`.
    pub fn record(&mut self, it: &NewtonIteration<T>) {
        self.records.push(it.clone());
    }

    pub fn records(&self) -> &[NewtonIteration<T>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `||F(x_k)||_2` for every recorded step, in order.
    pub fn residual_norms(&self) -> Vec<Accum> {
        self.records.iter().map(|r| r.residual_norm).collect()
    }
}

impl<T: FloatScalar> fmt::Display for NewtonTrace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in &self.records {
            writeln!(f, "{r}")?;
        }
        Ok(())
    }
}

use crate::linalg::{lup_solve, norm_l2};
use crate::matrix::DenseMatrix;
use crate::traits::{Accum, FloatScalar};

use super::jacobian::{finite_difference_jacobian, FiniteDifference};
use super::system::NonlinearSystem;
use super::trace::NewtonIteration;
use super::NewtonError;

/// Newton-family update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    /// Jacobian refreshed at every iterate.
    #[default]
    Newton,
    /// Jacobian evaluated once at `x0` and reused for every step.
    ModifiedNewton,
}

/// Where the Jacobian comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JacobianSource<T> {
    /// Finite-difference approximation of the residual system.
    Numeric(FiniteDifference),
    /// A fixed `n x n` matrix supplied by the caller, used at every iterate.
    Manual(DenseMatrix<T>),
}

impl<T> Default for JacobianSource<T> {
    fn default() -> Self {
        JacobianSource::Numeric(FiniteDifference::default())
    }
}

/// Settings for the Newton driver.
///
/// Override single fields with struct update syntax:
///
/// ```
/// use nlsolve::optim::NewtonSettings;
/// let s = NewtonSettings { damping: 0.5, ..NewtonSettings::<f64>::default() };
/// assert!(s.validate().is_ok());
/// assert!(NewtonSettings { damping: 0.0, ..s }.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtonSettings<T> {
    /// Step damping factor `λ` in `(0, 1]`.
    pub damping: T,
    /// Convergence tolerance on `||F(x)||_2`.
    pub f_tol: T,
    /// Convergence tolerance on the step, relative to `1 + ||x||_2`.
    pub x_tol: T,
    /// Maximum number of steps.
    pub max_iter: usize,
}

impl Default for NewtonSettings<f64> {
    fn default() -> Self {
        Self {
            damping: 1.0,
            f_tol: 1e-10,
            x_tol: 1e-12,
            max_iter: 100,
        }
    }
}

impl Default for NewtonSettings<f32> {
    fn default() -> Self {
        Self {
            damping: 1.0,
            f_tol: 1e-5,
            x_tol: 1e-6,
            max_iter: 100,
        }
    }
}

impl<T: FloatScalar> NewtonSettings<T> {
    /// Check ranges: `damping` in `(0, 1]`, non-negative tolerances,
    /// `max_iter >= 1`. NaN fails every check.
    pub fn validate(&self) -> Result<(), NewtonError> {
        if !(self.damping > T::zero() && self.damping <= T::one()) {
            return Err(NewtonError::InvalidSettings("damping must be in (0, 1]"));
        }
        if !(self.f_tol >= T::zero()) {
            return Err(NewtonError::InvalidSettings("f_tol must be non-negative"));
        }
        if !(self.x_tol >= T::zero()) {
            return Err(NewtonError::InvalidSettings("x_tol must be non-negative"));
        }
        if self.max_iter == 0 {
            return Err(NewtonError::InvalidSettings("max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// Which test ended a converged run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Criterion {
    /// `||F(x_k)||_2 < f_tol`.
    ResidualNorm,
    /// `||s_k||_2 < x_tol * (1 + ||x_k||_2)`.
    StepNorm,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// One of the tolerances was met; the payload says which.
    Converged(Criterion),
    /// `max_iter` steps were taken without meeting either criterion.
    MaxIterations,
}

impl Status {
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Status::Converged(_))
    }
}

/// Outcome of a Newton run.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonResult<T> {
    /// Final iterate as an `n x 1` column.
    pub x: DenseMatrix<T>,
    pub status: Status,
    /// Number of damped updates applied.
    pub iterations: usize,
    /// `||F(x)||_2` at the final iterate.
    pub residual_norm: Accum,
    /// Number of residual vector evaluations, finite differences included.
    pub f_evals: usize,
    /// Number of finite-difference Jacobians computed.
    pub j_evals: usize,
}

/// Newton / Modified-Newton driver for a square nonlinear system.
///
/// # Example
///
/// ```
/// use nlsolve::optim::{NewtonSettings, NewtonSolver, NonlinearSystem};
/// use nlsolve::DenseMatrix;
///
/// // Circle x^2 + y^2 = 1 meets the line x = y.
/// let system = NonlinearSystem::new()
///     .with(|x: &[f64]| x[0] * x[0] + x[1] * x[1] - 1.0)
///     .with(|x: &[f64]| x[0] - x[1]);
/// let solver = NewtonSolver::new(system, NewtonSettings::default());
///
/// let r = solver.solve(&DenseMatrix::column_vector(&[1.0, 0.5])).unwrap();
/// assert!(r.status.is_converged());
/// let root = core::f64::consts::FRAC_1_SQRT_2;
/// assert!((r.x[(0, 0)] - root).abs() < 1e-8);
/// assert!((r.x[(1, 0)] - root).abs() < 1e-8);
/// ```
#[derive(Debug)]
pub struct NewtonSolver<T> {
    system: NonlinearSystem<T>,
    method: Method,
    jacobian: JacobianSource<T>,
    settings: NewtonSettings<T>,
}

impl<T: FloatScalar> NewtonSolver<T> {
    /// Plain Newton with a two-point numerical Jacobian.
    pub fn new(system: NonlinearSystem<T>, settings: NewtonSettings<T>) -> Self {
        Self {
            system,
            method: Method::default(),
            jacobian: JacobianSource::default(),
            settings,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_jacobian(mut self, jacobian: JacobianSource<T>) -> Self {
        self.jacobian = jacobian;
        self
    }

    pub fn system(&self) -> &NonlinearSystem<T> {
        &self.system
    }

    pub fn settings(&self) -> &NewtonSettings<T> {
        &self.settings
    }

    /// Run from `x0` (a vector of length `n`, either orientation).
    pub fn solve(&self, x0: &DenseMatrix<T>) -> Result<NewtonResult<T>, NewtonError> {
        self.solve_with(x0, |_| {})
    }

    /// Run from `x0`, calling `observer` after every completed step.
    ///
    /// Non-convergence within `max_iter` steps is reported through
    /// [`Status::MaxIterations`], not as an error.
    ///
    /// # Errors
    ///
    /// - [`NewtonError::EmptySystem`], [`NewtonError::DimensionMismatch`] and
    ///   [`NewtonError::InvalidSettings`] before any evaluation.
    /// - [`NewtonError::Linalg`] carrying `MatrixError::Singular` when a
    ///   Jacobian cannot be factored.
    /// - [`NewtonError::NotFinite`] when the residual norm is NaN or infinite.
    pub fn solve_with(
        &self,
        x0: &DenseMatrix<T>,
        mut observer: impl FnMut(&NewtonIteration<T>),
    ) -> Result<NewtonResult<T>, NewtonError> {
        let n = self.check(x0)?;
        let s = &self.settings;
        let f_tol = s.f_tol.to_accum();
        let x_tol = s.x_tol.to_accum();

        let mut x = DenseMatrix::from_fn(n, 1, |i, _| x0.as_slice()[i]);
        let mut f_evals = 0usize;
        let mut j_evals = 0usize;

        let frozen = match (self.method, &self.jacobian) {
            (Method::ModifiedNewton, JacobianSource::Numeric(fd)) => {
                f_evals += fd.evaluations(n);
                j_evals += 1;
                Some(finite_difference_jacobian(&self.system, &x, *fd)?)
            }
            _ => None,
        };

        let mut k = 0usize;
        loop {
            let f = self.system.evaluate(x.as_slice());
            f_evals += 1;
            let f_norm = finite(norm_l2(&f), k)?;

            if f_norm < f_tol {
                return Ok(NewtonResult {
                    x,
                    status: Status::Converged(Criterion::ResidualNorm),
                    iterations: k,
                    residual_norm: f_norm,
                    f_evals,
                    j_evals,
                });
            }

            let fresh;
            let jac = match (&frozen, &self.jacobian) {
                (Some(j), _) => j,
                (None, JacobianSource::Manual(j)) => j,
                (None, JacobianSource::Numeric(fd)) => {
                    f_evals += fd.evaluations(n);
                    j_evals += 1;
                    fresh = finite_difference_jacobian(&self.system, &x, *fd)?;
                    &fresh
                }
            };

            let step = lup_solve(jac, &f.negate())?;
            let step_norm = norm_l2(&step);
            let x_norm = norm_l2(&x);
            let x_next = DenseMatrix::from_fn(n, 1, |i, _| {
                x.as_slice()[i] + s.damping * step.as_slice()[i]
            });

            let record = NewtonIteration {
                iteration: k,
                x,
                residual: f,
                residual_norm: f_norm,
                step,
                step_norm,
                damping: s.damping,
                x_next,
            };
            observer(&record);
            x = record.x_next;
            k += 1;

            if step_norm < x_tol * (1.0 + x_norm) {
                let residual_norm = self.residual_norm(&x, &mut f_evals);
                return Ok(NewtonResult {
                    x,
                    status: Status::Converged(Criterion::StepNorm),
                    iterations: k,
                    residual_norm,
                    f_evals,
                    j_evals,
                });
            }
            if k == s.max_iter {
                let residual_norm = self.residual_norm(&x, &mut f_evals);
                return Ok(NewtonResult {
                    x,
                    status: Status::MaxIterations,
                    iterations: k,
                    residual_norm,
                    f_evals,
                    j_evals,
                });
            }
        }
    }

    /// Validate the run configuration; returns the system dimension.
    fn check(&self, x0: &DenseMatrix<T>) -> Result<usize, NewtonError> {
        let n = self.system.dimension();
        if n == 0 {
            return Err(NewtonError::EmptySystem);
        }
        if !x0.is_vector() || x0.len() != n {
            return Err(NewtonError::DimensionMismatch {
                what: "initial guess",
                expected: (n, 1),
                got: x0.shape(),
            });
        }
        if let JacobianSource::Manual(j) = &self.jacobian {
            if j.shape() != (n, n) {
                return Err(NewtonError::DimensionMismatch {
                    what: "manual Jacobian",
                    expected: (n, n),
                    got: j.shape(),
                });
            }
        }
        self.settings.validate()?;
        Ok(n)
    }

    fn residual_norm(&self, x: &DenseMatrix<T>, f_evals: &mut usize) -> Accum {
        *f_evals += 1;
        norm_l2(&self.system.evaluate(x.as_slice()))
    }
}

fn finite(norm: Accum, iteration: usize) -> Result<Accum, NewtonError> {
    if norm.is_finite() {
        Ok(norm)
    } else {
        Err(NewtonError::NotFinite { iteration })
    }
}

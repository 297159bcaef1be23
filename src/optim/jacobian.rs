use alloc::vec::Vec;

use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::traits::{FloatScalar, MatrixMut};

use super::NonlinearSystem;

/// Finite-difference formula for the numerical Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FiniteDifference {
    /// Forward difference `(F(x + h e_j) - F(x)) / h`.
    #[default]
    TwoPoint,
    /// Central difference `(F(x + h e_j) - F(x - h e_j)) / 2h`.
    ThreePoint,
}

impl FiniteDifference {
    /// Residual vector evaluations needed for one `n`-dimensional Jacobian.
    ///
    /// ```
    /// use nlsolve::optim::FiniteDifference;
    /// assert_eq!(FiniteDifference::TwoPoint.evaluations(3), 4);
    /// assert_eq!(FiniteDifference::ThreePoint.evaluations(3), 6);
    /// ```
    pub fn evaluations(self, n: usize) -> usize {
        match self {
            FiniteDifference::TwoPoint => n + 1,
            FiniteDifference::ThreePoint => 2 * n,
        }
    }
}

/// Approximate the Jacobian of `system` at `x` by finite differences.
///
/// Column `j` uses step `h_j = sqrt(ε) * (1 + |x_j|)`, where `ε` is the
/// machine epsilon of `T`. `x` must be a vector (either orientation) whose
/// length equals the system dimension; the result is `n x n` with
/// `J(i, j) ≈ ∂f_i/∂x_j`.
///
/// # Example
///
/// ```
/// use nlsolve::optim::{finite_difference_jacobian, FiniteDifference, NonlinearSystem};
/// use nlsolve::DenseMatrix;
///
/// // F(x) = [x0^2, x0*x1], J = [[2*x0, 0], [x1, x0]]
/// let system = NonlinearSystem::new()
///     .with(|x: &[f64]| x[0] * x[0])
///     .with(|x: &[f64]| x[0] * x[1]);
/// let x = DenseMatrix::column_vector(&[3.0, 4.0]);
/// let j = finite_difference_jacobian(&system, &x, FiniteDifference::ThreePoint).unwrap();
/// assert!((j[(0, 0)] - 6.0).abs() < 1e-6);
/// assert!(j[(0, 1)].abs() < 1e-6);
/// assert!((j[(1, 0)] - 4.0).abs() < 1e-6);
/// assert!((j[(1, 1)] - 3.0).abs() < 1e-6);
/// ```
pub fn finite_difference_jacobian<T: FloatScalar>(
    system: &NonlinearSystem<T>,
    x: &DenseMatrix<T>,
    formula: FiniteDifference,
) -> Result<DenseMatrix<T>, MatrixError> {
    let n = system.dimension();
    let len = x.vector_len()?;
    if len != n {
        return Err(MatrixError::ShapeMismatch {
            op: "finite_difference_jacobian",
            left: (n, 1),
            right: x.shape(),
        });
    }

    let sqrt_eps = T::epsilon().sqrt();
    let two = T::one() + T::one();
    let mut jac = DenseMatrix::new(n, n);
    let mut xp: Vec<T> = x.as_slice().to_vec();

    match formula {
        FiniteDifference::TwoPoint => {
            let f0 = system.evaluate(&xp);
            for j in 0..n {
                let xj = xp[j];
                let h = sqrt_eps * (T::one() + xj.abs());
                xp[j] = xj + h;
                let f1 = system.evaluate(&xp);
                xp[j] = xj;
                for i in 0..n {
                    *jac.get_mut(i, j) = (f1.as_slice()[i] - f0.as_slice()[i]) / h;
                }
            }
        }
        FiniteDifference::ThreePoint => {
            for j in 0..n {
                let xj = xp[j];
                let h = sqrt_eps * (T::one() + xj.abs());
                xp[j] = xj + h;
                let fp = system.evaluate(&xp);
                xp[j] = xj - h;
                let fm = system.evaluate(&xp);
                xp[j] = xj;
                for i in 0..n {
                    *jac.get_mut(i, j) = (fp.as_slice()[i] - fm.as_slice()[i]) / (two * h);
                }
            }
        }
    }

    Ok(jac)
}

use num_traits::Float;

use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::traits::{Accum, FloatScalar};

use super::kernel::require_vector;

/// Norms at or below this value are treated as zero by the normalizers.
pub const NORM_EPSILON: Accum = 1e-18;

/// Sum of absolute values over all elements.
///
/// Any shape is accepted. The empty matrix has norm `0`.
pub fn norm_l1<T: FloatScalar>(m: &DenseMatrix<T>) -> Accum {
    m.as_slice().iter().map(|&x| x.abs().to_accum()).sum()
}

/// Euclidean (Frobenius) norm over all elements.
///
/// ```
/// use nlsolve::{linalg::norm_l2, DenseMatrix};
/// let v = DenseMatrix::row_vector(&[3.0_f32, 4.0]);
/// assert_eq!(norm_l2(&v), 5.0);
/// ```
pub fn norm_l2<T: FloatScalar>(m: &DenseMatrix<T>) -> Accum {
    let sum_sq: Accum = m
        .as_slice()
        .iter()
        .map(|&x| {
            let a = x.to_accum();
            a * a
        })
        .sum();
    Float::sqrt(sum_sq)
}

/// Largest absolute value over all elements.
pub fn norm_linf<T: FloatScalar>(m: &DenseMatrix<T>) -> Accum {
    m.as_slice()
        .iter()
        .map(|&x| x.abs().to_accum())
        .fold(0.0, Accum::max)
}

/// Scale a vector to unit L1 norm.
///
/// Fails with [`MatrixError::NotAVector`] unless the input is 1xN or Nx1,
/// and with [`MatrixError::DegenerateNorm`] when its norm is at or below
/// [`NORM_EPSILON`].
pub fn normalize_l1<T: FloatScalar>(v: &DenseMatrix<T>) -> Result<DenseMatrix<T>, MatrixError> {
    require_vector(v, "normalize_l1")?;
    divide_by_norm(v, norm_l1(v))
}

/// Scale a vector to unit Euclidean norm.
///
/// ```
/// use nlsolve::{linalg::normalize_l2, DenseMatrix, MatrixError};
/// let v = DenseMatrix::column_vector(&[3.0, 4.0]);
/// assert_eq!(normalize_l2(&v).unwrap().as_slice(), &[0.6, 0.8]);
///
/// let zero = DenseMatrix::<f64>::column_vector(&[0.0, 0.0]);
/// assert!(matches!(normalize_l2(&zero), Err(MatrixError::DegenerateNorm { .. })));
/// ```
pub fn normalize_l2<T: FloatScalar>(v: &DenseMatrix<T>) -> Result<DenseMatrix<T>, MatrixError> {
    require_vector(v, "normalize_l2")?;
    divide_by_norm(v, norm_l2(v))
}

fn divide_by_norm<T: FloatScalar>(
    v: &DenseMatrix<T>,
    norm: Accum,
) -> Result<DenseMatrix<T>, MatrixError> {
    if norm <= NORM_EPSILON {
        return Err(MatrixError::DegenerateNorm { norm });
    }
    Ok(v.map(|x| T::from_accum(x.to_accum() / norm)))
}

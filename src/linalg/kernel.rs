use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::traits::{Accum, FloatScalar, MatrixMut, MatrixRef, Scalar};

/// Element-wise sum of two same-shape matrices.
///
/// ```
/// use nlsolve::{linalg, DenseMatrix};
/// let a = DenseMatrix::row_vector(&[1.0, 2.0]);
/// let b = DenseMatrix::row_vector(&[3.0, 4.0]);
/// assert_eq!(linalg::add(&a, &b).unwrap().as_slice(), &[4.0, 6.0]);
/// assert!(linalg::add(&a, &DenseMatrix::column_vector(&[1.0, 2.0])).is_err());
/// ```
pub fn add<T: Scalar>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>, MatrixError> {
    a.zip_with(b, "add", |x, y| x + y)
}

/// Element-wise difference `a - b`.
pub fn sub<T: Scalar>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>, MatrixError> {
    a.zip_with(b, "sub", |x, y| x - y)
}

/// Element-wise (Hadamard) product.
pub fn hadamard<T: Scalar>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<DenseMatrix<T>, MatrixError> {
    a.zip_with(b, "hadamard", |x, y| x * y)
}

/// Matrix product `a * b`, requiring `a.ncols() == b.nrows()`.
///
/// Classic triple loop over a zeroed output in `i, t, j` order, so each
/// output cell accumulates its terms in ascending `t`.
///
/// ```
/// use nlsolve::{linalg, DenseMatrix};
/// let a = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
/// let b = DenseMatrix::column_vector(&[1.0, 0.0, -1.0]);
/// let c = linalg::matmul(&a, &b).unwrap();
/// assert_eq!(c.shape(), (2, 1));
/// assert_eq!(c.as_slice(), &[-2.0, -2.0]);
/// ```
pub fn matmul<T: Scalar>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<DenseMatrix<T>, MatrixError> {
    if a.ncols() != b.nrows() {
        return Err(MatrixError::ShapeMismatch {
            op: "matmul",
            left: a.shape(),
            right: b.shape(),
        });
    }
    let (m, n, k) = (a.nrows(), a.ncols(), b.ncols());
    let mut out = DenseMatrix::new(m, k);
    for i in 0..m {
        for t in 0..n {
            let av = *a.get(i, t);
            let b_row = b.row_as_slice(t, 0);
            let out_row = out.row_as_mut_slice(i, 0);
            for j in 0..k {
                out_row[j] = out_row[j] + av * b_row[j];
            }
        }
    }
    Ok(out)
}

/// Transpose: an `r x c` input gives a `c x r` output with `out(j, i) = in(i, j)`.
pub fn transpose<T: Scalar>(a: &DenseMatrix<T>) -> DenseMatrix<T> {
    DenseMatrix::from_fn(a.ncols(), a.nrows(), |j, i| *a.get(i, j))
}

/// Dot product of two vectors of equal length (either orientation),
/// accumulated in [`Accum`].
pub fn dot<T: FloatScalar>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Result<Accum, MatrixError> {
    let na = require_vector(a, "dot")?;
    let nb = require_vector(b, "dot")?;
    if na != nb {
        return Err(MatrixError::ShapeMismatch {
            op: "dot",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| x.to_accum() * y.to_accum())
        .sum())
}

/// `n x n` identity matrix.
///
/// ```
/// use nlsolve::linalg::identity;
/// let id = identity::<f64>(3);
/// assert_eq!(id[(1, 1)], 1.0);
/// assert_eq!(id[(1, 2)], 0.0);
/// ```
pub fn identity<T: Scalar>(n: usize) -> DenseMatrix<T> {
    let mut out = DenseMatrix::new(n, n);
    for i in 0..n {
        *out.get_mut(i, i) = T::one();
    }
    out
}

/// Outer shape check shared by the vector-only operations.
pub(crate) fn require_vector<T>(v: &DenseMatrix<T>, op: &'static str) -> Result<usize, MatrixError> {
    if v.is_vector() {
        Ok(v.len())
    } else {
        Err(MatrixError::NotAVector {
            op,
            rows: v.nrows(),
            cols: v.ncols(),
        })
    }
}

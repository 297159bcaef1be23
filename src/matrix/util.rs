use alloc::vec::Vec;

use crate::error::MatrixError;
use crate::traits::{Accum, FloatScalar, Scalar};

use super::DenseMatrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Apply a function to every element, producing a new matrix.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[1.0_f64, 4.0], [9.0, 16.0]]).unwrap();
    /// let r = m.map(|x: f64| x.sqrt());
    /// assert_eq!(r[(0, 0)], 1.0);
    /// assert_eq!(r[(1, 1)], 4.0);
    /// ```
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> DenseMatrix<U> {
        DenseMatrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Replace every element with `f(element)`.
    pub fn apply_in_place(&mut self, f: impl Fn(T) -> T) {
        for x in self.data.iter_mut() {
            *x = f(*x);
        }
    }
}

// ── Scalar arithmetic ───────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Multiply every element by `k`.
    pub fn scale(&self, k: T) -> Self {
        self.map(|x| x * k)
    }

    /// Divide every element by `k`.
    ///
    /// ```
    /// use nlsolve::{DenseMatrix, MatrixError};
    /// let m = DenseMatrix::row_vector(&[2.0, 4.0]);
    /// assert_eq!(m.div_scalar(2.0).unwrap().as_slice(), &[1.0, 2.0]);
    /// assert_eq!(m.div_scalar(0.0).unwrap_err(), MatrixError::DivisionByZero);
    /// ```
    pub fn div_scalar(&self, k: T) -> Result<Self, MatrixError> {
        if k == T::zero() {
            return Err(MatrixError::DivisionByZero);
        }
        Ok(self.map(|x| x / k))
    }

    /// Element-wise negation.
    pub fn negate(&self) -> Self {
        self.map(|x| T::zero() - x)
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Copy of row `r`.
    pub fn row(&self, r: usize) -> Result<Vec<T>, MatrixError> {
        if r >= self.nrows {
            return Err(self.out_of_range(r, 0));
        }
        Ok(self.data[r * self.ncols..(r + 1) * self.ncols].to_vec())
    }

    /// Copy of column `c`.
    pub fn col(&self, c: usize) -> Result<Vec<T>, MatrixError> {
        if c >= self.ncols {
            return Err(self.out_of_range(0, c));
        }
        Ok((0..self.nrows).map(|r| self.data[r * self.ncols + c]).collect())
    }

    /// Row `r` as a 1xN matrix.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let r = m.row_matrix(1).unwrap();
    /// assert_eq!(r.shape(), (1, 2));
    /// assert_eq!(r.as_slice(), &[3.0, 4.0]);
    /// ```
    pub fn row_matrix(&self, r: usize) -> Result<Self, MatrixError> {
        let data = self.row(r)?;
        Ok(DenseMatrix {
            data,
            nrows: 1,
            ncols: self.ncols,
        })
    }

    /// Column `c` as an Nx1 matrix.
    pub fn col_matrix(&self, c: usize) -> Result<Self, MatrixError> {
        let data = self.col(c)?;
        Ok(DenseMatrix {
            data,
            nrows: self.nrows,
            ncols: 1,
        })
    }

    fn out_of_range(&self, row: usize, col: usize) -> MatrixError {
        MatrixError::IndexOutOfRange {
            row,
            col,
            rows: self.nrows,
            cols: self.ncols,
        }
    }
}

// ── Aggregation ─────────────────────────────────────────────────────

impl<T: FloatScalar> DenseMatrix<T> {
    /// Sum of all elements, accumulated in [`Accum`].
    pub fn sum(&self) -> Accum {
        self.data.iter().map(|&x| x.to_accum()).sum()
    }

    /// Mean of all elements.
    pub fn mean(&self) -> Result<Accum, MatrixError> {
        if self.is_empty() {
            return Err(MatrixError::Empty { op: "mean" });
        }
        Ok(self.sum() / self.data.len() as Accum)
    }

    /// Sum of diagonal elements of a square matrix.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.trace().unwrap(), 5.0);
    /// ```
    pub fn trace(&self) -> Result<Accum, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                op: "trace",
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok((0..self.nrows).map(|i| self[(i, i)].to_accum()).sum())
    }

    /// Smallest element.
    pub fn min_element(&self) -> Result<T, MatrixError> {
        self.data
            .iter()
            .copied()
            .reduce(|a, b| if b < a { b } else { a })
            .ok_or(MatrixError::Empty { op: "min_element" })
    }

    /// Largest element.
    pub fn max_element(&self) -> Result<T, MatrixError> {
        self.data
            .iter()
            .copied()
            .reduce(|a, b| if b > a { b } else { a })
            .ok_or(MatrixError::Empty { op: "max_element" })
    }

    /// Element-wise minimum of two same-shape matrices.
    pub fn element_min(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.zip_with(rhs, "element_min", |a, b| if b < a { b } else { a })
    }

    /// Element-wise maximum of two same-shape matrices.
    pub fn element_max(&self, rhs: &Self) -> Result<Self, MatrixError> {
        self.zip_with(rhs, "element_max", |a, b| if b > a { b } else { a })
    }
}

impl<T: Copy> DenseMatrix<T> {
    /// Combine two same-shape matrices element by element.
    pub(crate) fn zip_with(
        &self,
        rhs: &Self,
        op: &'static str,
        f: impl Fn(T, T) -> T,
    ) -> Result<Self, MatrixError> {
        if self.shape() != rhs.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(DenseMatrix {
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        })
    }
}

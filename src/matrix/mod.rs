mod ops;
mod permute;
mod util;

pub use permute::Permutation;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::error::MatrixError;
use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Dynamically-sized, heap-allocated dense matrix.
///
/// Row-major `Vec<T>` storage with runtime dimensions. A matrix with zero
/// rows or zero columns is always stored as the empty 0x0 matrix with no
/// buffer. Vectors are 1xN or Nx1 matrices.
///
/// Checked accessors (`at`, `at_mut`) return [`MatrixError`]; the `Index`
/// operator panics on out-of-range access.
///
/// # Examples
///
/// ```
/// use nlsolve::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [3.0, 4.0]]).unwrap();
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(*a.at(1, 0).unwrap(), 3.0);
/// assert!(a.at(2, 0).is_err());
/// assert_eq!(a.nrows(), 2);
/// assert_eq!(a.ncols(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T> Default for DenseMatrix<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            nrows: 0,
            ncols: 0,
        }
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Create an `nrows x ncols` matrix filled with zeros.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::<f64>::new(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 2)], 0.0);
    ///
    /// assert!(DenseMatrix::<f64>::new(0, 3).is_empty());
    /// ```
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::zero())
    }

    /// Create a matrix with every element set to `value`.
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Self {
        if nrows == 0 || ncols == 0 {
            return Self::default();
        }
        Self {
            data: vec![value; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Create a matrix from a rectangular nested literal, one slice per row.
    ///
    /// Fails with [`MatrixError::RaggedRows`] if the rows differ in length.
    ///
    /// ```
    /// use nlsolve::{DenseMatrix, MatrixError};
    /// let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(m[(1, 0)], 4.0);
    ///
    /// let ragged: [&[f64]; 2] = [&[1.0, 2.0], &[3.0]];
    /// assert!(matches!(
    ///     DenseMatrix::from_rows(&ragged),
    ///     Err(MatrixError::RaggedRows { row: 1, .. })
    /// ));
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        for (i, row) in rows.iter().enumerate() {
            let got = row.as_ref().len();
            if got != ncols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: ncols,
                    got,
                });
            }
        }
        if rows.is_empty() || ncols == 0 {
            return Ok(Self::default());
        }
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for row in rows {
            data.extend_from_slice(row.as_ref());
        }
        Ok(Self {
            data,
            nrows: rows.len(),
            ncols,
        })
    }

    /// Create a matrix by copying a row-major buffer of exactly
    /// `nrows * ncols` elements.
    ///
    /// A zero dimension yields the empty matrix and ignores `slice`.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::from_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(m[(1, 0)], 3.0);
    /// assert!(DenseMatrix::from_slice(2, 2, &[1.0, 2.0, 3.0]).is_err());
    /// ```
    pub fn from_slice(nrows: usize, ncols: usize, slice: &[T]) -> Result<Self, MatrixError> {
        if nrows == 0 || ncols == 0 {
            return Ok(Self::default());
        }
        if slice.len() != nrows * ncols {
            return Err(MatrixError::BufferLength {
                rows: nrows,
                cols: ncols,
                got: slice.len(),
            });
        }
        Ok(Self {
            data: slice.to_vec(),
            nrows,
            ncols,
        })
    }

    /// Take ownership of a row-major `Vec<T>`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        if nrows == 0 || ncols == 0 {
            return Ok(Self::default());
        }
        if data.len() != nrows * ncols {
            return Err(MatrixError::BufferLength {
                rows: nrows,
                cols: ncols,
                got: data.len(),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// 1xN row vector.
    pub fn row_vector(values: &[T]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            data: values.to_vec(),
            nrows: 1,
            ncols: values.len(),
        }
    }

    /// Nx1 column vector.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let v = DenseMatrix::column_vector(&[1.0, 2.0, 3.0]);
    /// assert_eq!(v.shape(), (3, 1));
    /// assert_eq!(v.vector_len().unwrap(), 3);
    /// ```
    pub fn column_vector(values: &[T]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            data: values.to_vec(),
            nrows: values.len(),
            ncols: 1,
        }
    }
}

impl<T> DenseMatrix<T> {
    /// Create a matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let m = DenseMatrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 });
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        if nrows == 0 || ncols == 0 {
            return Self::default();
        }
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Total number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Whether the matrix is a 1xN or Nx1 vector.
    #[inline]
    pub fn is_vector(&self) -> bool {
        self.nrows == 1 || self.ncols == 1
    }

    /// Length of a 1xN or Nx1 vector.
    pub fn vector_len(&self) -> Result<usize, MatrixError> {
        if self.nrows == 1 {
            Ok(self.ncols)
        } else if self.ncols == 1 {
            Ok(self.nrows)
        } else {
            Err(MatrixError::NotAVector {
                op: "vector_len",
                rows: self.nrows,
                cols: self.ncols,
            })
        }
    }

    /// Row-major view of the elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of the elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Checked element access.
    pub fn at(&self, row: usize, col: usize) -> Result<&T, MatrixError> {
        self.check_index(row, col)?;
        Ok(&self.data[row * self.ncols + col])
    }

    /// Checked mutable element access.
    pub fn at_mut(&mut self, row: usize, col: usize) -> Result<&mut T, MatrixError> {
        self.check_index(row, col)?;
        Ok(&mut self.data[row * self.ncols + col])
    }

    /// Drop the buffer and become the empty matrix.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.nrows = 0;
        self.ncols = 0;
    }

    /// Move the contents out, leaving `self` empty.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let mut a = DenseMatrix::column_vector(&[1.0, 2.0]);
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(a.shape(), (0, 0));
    /// assert_eq!(b.shape(), (2, 1));
    /// ```
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.nrows || col >= self.ncols {
            return Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok(())
    }
}

impl<T: Copy> DenseMatrix<T> {
    /// Element `i` of a 1xN or Nx1 vector.
    pub fn vector_at(&self, i: usize) -> Result<T, MatrixError> {
        let n = self.vector_len()?;
        if i >= n {
            return Err(MatrixError::IndexOutOfRange {
                row: if self.nrows == 1 { 0 } else { i },
                col: if self.nrows == 1 { i } else { 0 },
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        Ok(self.data[i])
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        for x in self.data.iter_mut() {
            *x = value;
        }
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Change the shape to `new_rows x new_cols`.
    ///
    /// Fresh storage is allocated; the overlapping top-left
    /// `min(rows, new_rows) x min(cols, new_cols)` block is copied and the
    /// rest is zero. A zero dimension clears the matrix.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// m.resize(3, 1);
    /// assert_eq!(m.as_slice(), &[1.0, 3.0, 0.0]);
    /// ```
    pub fn resize(&mut self, new_rows: usize, new_cols: usize) {
        if new_rows == self.nrows && new_cols == self.ncols {
            return;
        }
        if new_rows == 0 || new_cols == 0 {
            self.clear();
            return;
        }
        let mut data = vec![T::zero(); new_rows * new_cols];
        let min_r = self.nrows.min(new_rows);
        let min_c = self.ncols.min(new_cols);
        for r in 0..min_r {
            let src = &self.data[r * self.ncols..r * self.ncols + min_c];
            data[r * new_cols..r * new_cols + min_c].copy_from_slice(src);
        }
        self.data = data;
        self.nrows = new_rows;
        self.ncols = new_cols;
    }
}

// ── Equality ────────────────────────────────────────────────────────

impl<T: PartialEq> PartialEq for DenseMatrix<T> {
    /// Shape first, then every element exactly.
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols && self.data == other.data
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for DenseMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        let start = row * self.ncols;
        &self.data[start + col_start..start + self.ncols]
    }
}

impl<T> MatrixMut<T> for DenseMatrix<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.data[row * self.ncols + col]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        let start = row * self.ncols;
        &mut self.data[start + col_start..start + self.ncols]
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        &self.data[row * self.ncols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of range for {}x{} matrix",
            row,
            col,
            self.nrows,
            self.ncols,
        );
        &mut self.data[row * self.ncols + col]
    }
}

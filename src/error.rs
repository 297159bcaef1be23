//! Error type shared by the dense matrix, the kernel and the LUP solver.

use thiserror::Error;

/// Errors from matrix construction, access and linear algebra.
///
/// Every checked operation validates its arguments before touching any
/// data, so a returned error always leaves the operands as they were.
///
/// ```
/// use nlsolve::{lup_solve, DenseMatrix, MatrixError};
///
/// let a = DenseMatrix::from_rows(&[[1.0_f64, 2.0], [2.0, 4.0]]).unwrap();
/// let b = DenseMatrix::column_vector(&[1.0, 3.0]);
/// assert_eq!(lup_solve(&a, &b).unwrap_err(), MatrixError::Singular { column: 1 });
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("{op}: shape mismatch (left={left:?}, right={right:?})")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A square matrix was required.
    #[error("{op}: matrix must be square, got {rows}x{cols}")]
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    /// A 1xN or Nx1 matrix was required.
    #[error("{op}: expected a vector (1xN or Nx1), got {rows}x{cols}")]
    NotAVector {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Permutation has the wrong length, an index out of range, or a duplicate.
    #[error("invalid permutation: {reason}")]
    InvalidPermutation { reason: PermutationDefect },

    /// Normalization of a vector whose norm is at or below the guard epsilon.
    #[error("cannot normalize: norm {norm:e} is too small")]
    DegenerateNorm { norm: f64 },

    /// Elimination found no usable pivot in `column`.
    #[error("matrix is singular (no usable pivot in column {column})")]
    Singular { column: usize },

    /// Scalar division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Element, row or column access beyond the matrix bounds.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Nested-literal construction with rows of differing length.
    #[error("matrix rows must have the same length (row {row} has {got}, expected {expected})")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Buffer construction with the wrong number of elements.
    #[error("buffer length {got} does not match {rows}x{cols} matrix")]
    BufferLength { rows: usize, cols: usize, got: usize },

    /// Reduction over an empty matrix.
    #[error("{op}: matrix is empty")]
    Empty { op: &'static str },
}

/// What made a permutation invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermutationDefect {
    /// `len` indices given for a dimension of `expected`.
    Length { expected: usize, len: usize },
    /// `index` is not below `bound`.
    OutOfRange { index: usize, bound: usize },
    /// `index` appears more than once.
    Duplicate { index: usize },
}

impl core::fmt::Display for PermutationDefect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PermutationDefect::Length { expected, len } => {
                write!(f, "length {} does not match dimension {}", len, expected)
            }
            PermutationDefect::OutOfRange { index, bound } => {
                write!(f, "index {} is out of range 0..{}", index, bound)
            }
            PermutationDefect::Duplicate { index } => {
                write!(f, "index {} appears more than once", index)
            }
        }
    }
}

impl From<PermutationDefect> for MatrixError {
    fn from(reason: PermutationDefect) -> Self {
        MatrixError::InvalidPermutation { reason }
    }
}

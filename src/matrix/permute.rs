use alloc::vec;
use alloc::vec::Vec;

use crate::error::{MatrixError, PermutationDefect};

use super::DenseMatrix;

/// A validated bijection on `0..n`.
///
/// Construction checks that every index is in range and appears once, so a
/// `Permutation` can be applied without further checks beyond its length.
///
/// ```
/// use nlsolve::Permutation;
///
/// let p = Permutation::new(vec![2, 0, 1]).unwrap();
/// assert_eq!(p.len(), 3);
/// assert_eq!(p[0], 2);
///
/// assert!(Permutation::new(vec![0, 0, 1]).is_err());
/// assert!(Permutation::new(vec![0, 3, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    /// Validate `indices` as a permutation of `0..indices.len()`.
    pub fn new(indices: Vec<usize>) -> Result<Self, MatrixError> {
        validate(&indices, indices.len())?;
        Ok(Self { indices })
    }

    /// The identity permutation on `0..n`.
    pub fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).collect(),
        }
    }

    /// Number of indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Exchange positions `a` and `b`. Keeps the bijection intact.
    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.indices.swap(a, b);
    }

    /// The inverse bijection: `inv[self[i]] == i`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0usize; self.len()];
        for (i, &p) in self.indices.iter().enumerate() {
            inv[p] = i;
        }
        Self { indices: inv }
    }
}

impl core::ops::Index<usize> for Permutation {
    type Output = usize;

    #[inline]
    fn index(&self, i: usize) -> &usize {
        &self.indices[i]
    }
}

/// Length, range and uniqueness, in that order.
fn validate(perm: &[usize], expected: usize) -> Result<(), PermutationDefect> {
    if perm.len() != expected {
        return Err(PermutationDefect::Length {
            expected,
            len: perm.len(),
        });
    }
    for &p in perm {
        if p >= expected {
            return Err(PermutationDefect::OutOfRange {
                index: p,
                bound: expected,
            });
        }
    }
    let mut seen = vec![false; expected];
    for &p in perm {
        if seen[p] {
            return Err(PermutationDefect::Duplicate { index: p });
        }
        seen[p] = true;
    }
    Ok(())
}

// ── Row / column permutation ────────────────────────────────────────

impl<T: Copy> DenseMatrix<T> {
    /// Reorder rows so that new row `r` is old row `perm[r]`.
    ///
    /// The permutation is validated (length, range, uniqueness) before any
    /// data moves; on error the matrix is unchanged.
    ///
    /// ```
    /// use nlsolve::DenseMatrix;
    /// let mut m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
    /// m.row_permute(&[2, 0, 1]).unwrap();
    /// assert_eq!(m.as_slice(), &[5.0, 6.0, 1.0, 2.0, 3.0, 4.0]);
    ///
    /// let before = m.clone();
    /// assert!(m.row_permute(&[0, 0, 1]).is_err());
    /// assert_eq!(m, before);
    /// ```
    pub fn row_permute(&mut self, perm: &[usize]) -> Result<(), MatrixError> {
        validate(perm, self.nrows)?;
        if self.is_empty() {
            return Ok(());
        }
        let ncols = self.ncols;
        let mut data = Vec::with_capacity(self.data.len());
        for &src in perm {
            data.extend_from_slice(&self.data[src * ncols..(src + 1) * ncols]);
        }
        self.data = data;
        Ok(())
    }

    /// Reorder columns so that new column `c` is old column `perm[c]`.
    ///
    /// Validated before any data moves; on error the matrix is unchanged.
    pub fn col_permute(&mut self, perm: &[usize]) -> Result<(), MatrixError> {
        validate(perm, self.ncols)?;
        if self.is_empty() {
            return Ok(());
        }
        let ncols = self.ncols;
        let mut data = Vec::with_capacity(self.data.len());
        for r in 0..self.nrows {
            let row = &self.data[r * ncols..(r + 1) * ncols];
            data.extend(perm.iter().map(|&c| row[c]));
        }
        self.data = data;
        Ok(())
    }

    /// Permute the elements of a 1xN or Nx1 vector.
    pub fn permute_vector(&mut self, perm: &[usize]) -> Result<(), MatrixError> {
        if self.nrows == 1 {
            self.col_permute(perm)
        } else if self.ncols == 1 {
            self.row_permute(perm)
        } else {
            Err(MatrixError::NotAVector {
                op: "permute_vector",
                rows: self.nrows,
                cols: self.ncols,
            })
        }
    }

    /// Apply a validated [`Permutation`] to the rows.
    pub fn apply_row_permutation(&mut self, perm: &Permutation) -> Result<(), MatrixError> {
        self.row_permute(perm.as_slice())
    }
}

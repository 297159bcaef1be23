use crate::error::MatrixError;
use crate::matrix::{DenseMatrix, Permutation};
use crate::traits::{Accum, FloatScalar, MatrixMut, MatrixRef};

use super::kernel::{identity, require_vector};

/// A pivot whose magnitude is at or below this value, compared in
/// [`Accum`], marks the matrix as singular. So does a NaN pivot.
pub const PIVOT_EPSILON: Accum = 1e-18;

/// LU decomposition with partial pivoting of an `n x n` matrix: `PA = LU`.
///
/// `L` is unit lower triangular, `U` upper triangular, and `P` is recorded
/// as the order in which original rows appear in the factored matrix.
/// The input is copied; the caller's matrix is never touched.
///
/// ```
/// use nlsolve::{DenseMatrix, LupDecomposition};
///
/// let a = DenseMatrix::from_rows(&[[2.0_f64, 1.0], [5.0, 3.0]]).unwrap();
/// let lu = LupDecomposition::new(&a).unwrap();
/// assert!((lu.det() - 1.0).abs() < 1e-12);
///
/// let b = DenseMatrix::column_vector(&[3.0, 8.0]);
/// let x = lu.solve(&b).unwrap();
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LupDecomposition<T> {
    l: DenseMatrix<T>,
    u: DenseMatrix<T>,
    perm: Permutation,
    even: bool,
}

impl<T: FloatScalar> LupDecomposition<T> {
    /// Factor a square matrix.
    ///
    /// Pivot selection takes the strictly largest magnitude in the column,
    /// so on ties the earliest row is kept.
    pub fn new(a: &DenseMatrix<T>) -> Result<Self, MatrixError> {
        if !a.is_square() {
            return Err(MatrixError::NotSquare {
                op: "lup",
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }
        if a.is_empty() {
            return Err(MatrixError::Empty { op: "lup" });
        }

        let n = a.nrows();
        let mut u = a.clone();
        let mut l = identity::<T>(n);
        let mut perm = Permutation::identity(n);
        let mut even = true;

        for k in 0..n {
            let mut pivot_row = k;
            let mut pivot_mag = u.get(k, k).abs().to_accum();
            for row in (k + 1)..n {
                let mag = u.get(row, k).abs().to_accum();
                if mag > pivot_mag {
                    pivot_mag = mag;
                    pivot_row = row;
                }
            }
            // NaN fails the comparison and lands here too.
            if !(pivot_mag > PIVOT_EPSILON) {
                return Err(MatrixError::Singular { column: k });
            }

            if pivot_row != k {
                swap_rows(&mut u, k, pivot_row, 0..n);
                // Only the multipliers already stored in columns 0..k move.
                swap_rows(&mut l, k, pivot_row, 0..k);
                perm.swap(k, pivot_row);
                even = !even;
            }

            let pivot = *u.get(k, k);
            for i in (k + 1)..n {
                let m = *u.get(i, k) / pivot;
                *l.get_mut(i, k) = m;
                *u.get_mut(i, k) = T::zero();
                for j in (k + 1)..n {
                    let ukj = *u.get(k, j);
                    let uij = u.get_mut(i, j);
                    *uij = *uij - m * ukj;
                }
            }
        }

        Ok(Self { l, u, perm, even })
    }

    /// Unit lower-triangular factor.
    pub fn l(&self) -> &DenseMatrix<T> {
        &self.l
    }

    /// Upper-triangular factor.
    pub fn u(&self) -> &DenseMatrix<T> {
        &self.u
    }

    /// Row order of the factored matrix: row `i` of `PA` is row
    /// `permutation()[i]` of `A`.
    pub fn permutation(&self) -> &Permutation {
        &self.perm
    }

    /// Dimension of the factored matrix.
    pub fn dim(&self) -> usize {
        self.u.nrows()
    }

    /// Solve `Ax = b` for a vector `b` of length `n`.
    ///
    /// The result has the orientation of `b`.
    pub fn solve(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>, MatrixError> {
        let len = require_vector(b, "lup_solve")?;
        if len != self.dim() {
            return Err(MatrixError::ShapeMismatch {
                op: "lup_solve",
                left: self.u.shape(),
                right: b.shape(),
            });
        }
        let mut x = b.clone();
        self.solve_slice(b.as_slice(), x.as_mut_slice());
        Ok(x)
    }

    /// Forward then backward substitution; `b` and `x` have length `n`.
    fn solve_slice(&self, b: &[T], x: &mut [T]) {
        let n = self.dim();
        let (l, u) = (&self.l, &self.u);

        // L y = P b
        for i in 0..n {
            let mut sum = b[self.perm[i]];
            for j in 0..i {
                sum = sum - *l.get(i, j) * x[j];
            }
            x[i] = sum;
        }

        // U x = y
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in (i + 1)..n {
                sum = sum - *u.get(i, j) * x[j];
            }
            x[i] = sum / *u.get(i, i);
        }
    }

    /// Determinant of the original matrix.
    pub fn det(&self) -> T {
        let mut d = if self.even { T::one() } else { T::zero() - T::one() };
        for i in 0..self.dim() {
            d = d * *self.u.get(i, i);
        }
        d
    }

    /// Inverse of the original matrix, one column solve per unit vector.
    pub fn inverse(&self) -> DenseMatrix<T> {
        let n = self.dim();
        let mut inv = DenseMatrix::new(n, n);
        let mut e = alloc::vec![T::zero(); n];
        let mut col = alloc::vec![T::zero(); n];
        for j in 0..n {
            e.fill(T::zero());
            e[j] = T::one();
            self.solve_slice(&e, &mut col);
            for (i, &v) in col.iter().enumerate() {
                *inv.get_mut(i, j) = v;
            }
        }
        inv
    }
}

fn swap_rows<T: Copy>(
    m: &mut DenseMatrix<T>,
    a: usize,
    b: usize,
    cols: core::ops::Range<usize>,
) {
    for j in cols {
        let tmp = *m.get(a, j);
        *m.get_mut(a, j) = *m.get(b, j);
        *m.get_mut(b, j) = tmp;
    }
}

/// A square linear system `Ax = b`.
///
/// Shapes are checked once at construction; solving works on copies, so
/// the stored `A` and `b` stay as given.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem<T> {
    a: DenseMatrix<T>,
    b: DenseMatrix<T>,
}

impl<T: FloatScalar> LinearSystem<T> {
    /// Pair an `n x n` matrix with a length-`n` right-hand side.
    pub fn new(a: DenseMatrix<T>, b: DenseMatrix<T>) -> Result<Self, MatrixError> {
        check_system(&a, &b)?;
        Ok(Self { a, b })
    }

    /// Coefficient matrix `A`.
    pub fn matrix(&self) -> &DenseMatrix<T> {
        &self.a
    }

    /// Right-hand side `b`, in the orientation it was given.
    pub fn rhs(&self) -> &DenseMatrix<T> {
        &self.b
    }

    /// Number of unknowns.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    /// Solve by LU decomposition with partial pivoting.
    pub fn solve_lup(&self) -> Result<DenseMatrix<T>, MatrixError> {
        LupDecomposition::new(&self.a)?.solve(&self.b)
    }
}

fn check_system<T>(a: &DenseMatrix<T>, b: &DenseMatrix<T>) -> Result<(), MatrixError> {
    if !a.is_square() {
        return Err(MatrixError::NotSquare {
            op: "linear_system",
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let len = require_vector(b, "linear_system")?;
    if len != a.nrows() {
        return Err(MatrixError::ShapeMismatch {
            op: "linear_system",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Solve `Ax = b` for square `A` and a vector `b` of matching length.
///
/// Returns `x` shaped like `b`. Neither input is modified.
pub fn lup_solve<T: FloatScalar>(
    a: &DenseMatrix<T>,
    b: &DenseMatrix<T>,
) -> Result<DenseMatrix<T>, MatrixError> {
    check_system(a, b)?;
    LupDecomposition::new(a)?.solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{matmul, norm_l2, sub};

    fn residual(a: &DenseMatrix<f64>, x: &DenseMatrix<f64>, b: &DenseMatrix<f64>) -> f64 {
        let ax = matmul(a, x).unwrap();
        norm_l2(&sub(&ax, b).unwrap())
    }

    #[test]
    fn solve_3x3() {
        let a: DenseMatrix<f64> = DenseMatrix::from_rows(&[[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]])
            .unwrap();
        let b = DenseMatrix::column_vector(&[8.0, -11.0, -3.0]);
        let x = lup_solve(&a, &b).unwrap();
        assert!((x[(0, 0)] - 2.0).abs() < 1e-12);
        assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
        assert!((x[(2, 0)] + 1.0).abs() < 1e-12);
        assert!(residual(&a, &x, &b) < 1e-12);
    }

    #[test]
    fn zero_leading_pivot_needs_swap() {
        let a = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let b = DenseMatrix::column_vector(&[2.0, 3.0]);
        let x = lup_solve(&a, &b).unwrap();
        assert_eq!(x.as_slice(), &[3.0, 2.0]);
    }

    #[test]
    fn singular_reports_column() {
        let a = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        let b = DenseMatrix::column_vector(&[1.0, 3.0]);
        assert_eq!(
            lup_solve(&a, &b).unwrap_err(),
            MatrixError::Singular { column: 1 }
        );
        let z = DenseMatrix::<f64>::new(3, 3);
        assert_eq!(
            LupDecomposition::new(&z).unwrap_err(),
            MatrixError::Singular { column: 0 }
        );
    }

    #[test]
    fn nan_pivot_is_singular() {
        let a = DenseMatrix::from_rows(&[[f64::NAN, 1.0], [1.0, 1.0]]).unwrap();
        let b = DenseMatrix::column_vector(&[1.0, 1.0]);
        assert_eq!(
            lup_solve(&a, &b).unwrap_err(),
            MatrixError::Singular { column: 0 }
        );

        // NaN below the pivot poisons the trailing block instead.
        let a = DenseMatrix::from_rows(&[[1.0, 1.0], [f64::NAN, 1.0]]).unwrap();
        assert_eq!(
            LupDecomposition::new(&a).unwrap_err(),
            MatrixError::Singular { column: 1 }
        );
    }

    #[test]
    fn ties_keep_first_row() {
        // |2| == |-2| in column 0: row 0 stays the pivot, no swap.
        let a = DenseMatrix::from_rows(&[[2.0, 1.0], [-2.0, 3.0]]).unwrap();
        let lu = LupDecomposition::new(&a).unwrap();
        assert_eq!(lu.permutation().as_slice(), &[0, 1]);
        assert_eq!(lu.l()[(1, 0)], -1.0);
        assert_eq!(lu.u()[(1, 1)], 4.0);
    }

    #[test]
    fn factors_reconstruct_pa() {
        let a = DenseMatrix::from_rows(&[
            [1.0, 2.0, 3.0, 4.0],
            [4.0, 1.0, 0.5, 2.0],
            [-6.0, 2.0, 1.0, 0.0],
            [2.0, -3.0, 7.0, 1.0],
        ])
        .unwrap();
        let lu = LupDecomposition::new(&a).unwrap();
        let mut pa = a.clone();
        pa.apply_row_permutation(lu.permutation()).unwrap();
        let prod = matmul(lu.l(), lu.u()).unwrap();
        assert!(norm_l2(&sub(&prod, &pa).unwrap()) < 1e-12);
        for i in 0..4 {
            assert_eq!(lu.l()[(i, i)], 1.0);
            for j in (i + 1)..4 {
                assert_eq!(lu.l()[(i, j)], 0.0);
                assert_eq!(lu.u()[(j, i)], 0.0);
            }
        }
    }

    #[test]
    fn inputs_unchanged() {
        let a = DenseMatrix::from_rows(&[[1.0, 3.0], [4.0, 2.0]]).unwrap();
        let b = DenseMatrix::row_vector(&[5.0, 6.0]);
        let (a0, b0) = (a.clone(), b.clone());
        let x = lup_solve(&a, &b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
        assert_eq!(x.shape(), (1, 2));
    }

    #[test]
    fn det_and_inverse() {
        let a: DenseMatrix<f64> = DenseMatrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
        let lu = LupDecomposition::new(&a).unwrap();
        assert!((lu.det() - 10.0).abs() < 1e-12);
        let inv = lu.inverse();
        let id = matmul(&a, &inv).unwrap();
        assert!(norm_l2(&sub(&id, &identity(2)).unwrap()) < 1e-12);

        let swapped = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        assert_eq!(LupDecomposition::new(&swapped).unwrap().det(), -1.0);
    }

    #[test]
    fn linear_system_validation() {
        let sq = DenseMatrix::<f64>::filled(2, 2, 1.0);
        assert!(matches!(
            LinearSystem::new(DenseMatrix::new(2, 3), DenseMatrix::column_vector(&[1.0, 2.0])),
            Err(MatrixError::NotSquare { .. })
        ));
        assert!(matches!(
            LinearSystem::new(sq.clone(), DenseMatrix::new(2, 2)),
            Err(MatrixError::NotAVector { .. })
        ));
        assert!(matches!(
            LinearSystem::new(sq, DenseMatrix::column_vector(&[1.0, 2.0, 3.0])),
            Err(MatrixError::ShapeMismatch { .. })
        ));

        let a = DenseMatrix::from_rows(&[[3.0_f32, 0.0], [0.0, 2.0]]).unwrap();
        let sys = LinearSystem::new(a, DenseMatrix::column_vector(&[6.0, 4.0])).unwrap();
        assert_eq!(sys.solve_lup().unwrap().as_slice(), &[2.0, 2.0]);
        assert_eq!(sys.rhs().as_slice(), &[6.0, 4.0]);
    }

    #[test]
    fn row_swap_moves_only_built_multipliers() {
        // Column 1 pivot forces a swap of rows 1 and 2 after L(1,0), L(2,0) exist.
        let a = DenseMatrix::from_rows(&[[4.0, 1.0, 2.0], [2.0, 0.5, 1.0], [1.0, 3.0, 5.0]])
            .unwrap();
        let lu = LupDecomposition::new(&a);
        // Rows 0 and 1 are dependent after elimination.
        assert!(matches!(lu, Err(MatrixError::Singular { column: 2 })));

        let a = DenseMatrix::from_rows(&[[4.0, 1.0, 2.0], [2.0, 0.5, 3.0], [1.0, 3.0, 5.0]])
            .unwrap();
        let lu = LupDecomposition::new(&a).unwrap();
        assert_eq!(lu.permutation().as_slice(), &[0, 2, 1]);
        assert_eq!(lu.l()[(1, 0)], 0.25);
        assert_eq!(lu.l()[(2, 0)], 0.5);
        assert_eq!(lu.l()[(2, 1)], 0.0);
    }
}

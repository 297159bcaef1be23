//! Operator overloads.
//!
//! Operators panic on incompatible shapes, the usual convention for
//! `std::ops`. The checked versions are the free functions in
//! [`crate::linalg`].

use core::ops::{Add, Mul, Neg, Sub};

use crate::error::MatrixError;
use crate::linalg;
use crate::traits::Scalar;

use super::DenseMatrix;

#[track_caller]
fn expect_shape<T>(result: Result<DenseMatrix<T>, MatrixError>) -> DenseMatrix<T> {
    match result {
        Ok(m) => m,
        Err(e) => panic!("{}", e),
    }
}

// Implements `op` for all owned/borrowed operand combinations by
// forwarding to the checked kernel function.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $kernel:path) => {
        impl<T: Scalar> $trait<&DenseMatrix<T>> for &DenseMatrix<T> {
            type Output = DenseMatrix<T>;

            #[track_caller]
            fn $method(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
                expect_shape($kernel(self, rhs))
            }
        }

        impl<T: Scalar> $trait<DenseMatrix<T>> for &DenseMatrix<T> {
            type Output = DenseMatrix<T>;

            #[track_caller]
            fn $method(self, rhs: DenseMatrix<T>) -> DenseMatrix<T> {
                expect_shape($kernel(self, &rhs))
            }
        }

        impl<T: Scalar> $trait<&DenseMatrix<T>> for DenseMatrix<T> {
            type Output = DenseMatrix<T>;

            #[track_caller]
            fn $method(self, rhs: &DenseMatrix<T>) -> DenseMatrix<T> {
                expect_shape($kernel(&self, rhs))
            }
        }

        impl<T: Scalar> $trait for DenseMatrix<T> {
            type Output = DenseMatrix<T>;

            #[track_caller]
            fn $method(self, rhs: DenseMatrix<T>) -> DenseMatrix<T> {
                expect_shape($kernel(&self, &rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, linalg::add);
impl_binary_op!(Sub, sub, linalg::sub);
// Matrix product, not element-wise. Use `linalg::hadamard` for that.
impl_binary_op!(Mul, mul, linalg::matmul);

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for DenseMatrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl<T: Scalar> Neg for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn neg(self) -> DenseMatrix<T> {
        self.negate()
    }
}

// ── Scalar multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<T> for DenseMatrix<T> {
    type Output = Self;

    fn mul(self, k: T) -> Self {
        self.scale(k)
    }
}

impl<T: Scalar> Mul<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, k: T) -> DenseMatrix<T> {
        self.scale(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> DenseMatrix<f64> {
        DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap()
    }

    #[test]
    fn add_sub_all_forms() {
        let b = DenseMatrix::from_rows(&[[5.0, 6.0], [7.0, 8.0]]).unwrap();
        let expected = DenseMatrix::from_rows(&[[6.0, 8.0], [10.0, 12.0]]).unwrap();
        assert_eq!(&a() + &b, expected);
        assert_eq!(a() + &b, expected);
        assert_eq!(&a() + b.clone(), expected);
        assert_eq!(a() + b.clone(), expected);
        assert_eq!(&expected - &b, a());
    }

    #[test]
    fn mul_is_matmul() {
        let c = &a() * &a();
        assert_eq!(c.as_slice(), &[7.0, 10.0, 15.0, 22.0]);
    }

    #[test]
    fn scalar_and_neg() {
        assert_eq!((a() * 2.0)[(1, 1)], 8.0);
        assert_eq!((-&a())[(0, 1)], -2.0);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn add_mismatch_panics() {
        let _ = a() + DenseMatrix::<f64>::new(3, 2);
    }
}

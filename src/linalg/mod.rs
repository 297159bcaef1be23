//! Dense linear algebra kernels and the LUP solver.
//!
//! The element-wise and product kernels are checked free functions that
//! return [`MatrixError`](crate::MatrixError) on shape problems; the
//! operator overloads on [`DenseMatrix`](crate::DenseMatrix) forward here
//! and panic instead. Norms and dot products accumulate in
//! [`Accum`](crate::traits::Accum) whatever the element type.

mod kernel;
mod lup;
mod norm;

pub use kernel::{add, dot, hadamard, identity, matmul, sub, transpose};
pub use lup::{lup_solve, LinearSystem, LupDecomposition, PIVOT_EPSILON};
pub use norm::{norm_l1, norm_l2, norm_linf, normalize_l1, normalize_l2, NORM_EPSILON};

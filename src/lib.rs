//! # nlsolve
//!
//! Dense linear algebra and Newton-family solvers for square nonlinear
//! systems `F(x) = 0`, no-std compatible (needs `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use nlsolve::{lup_solve, DenseMatrix};
//!
//! // Solve a linear system Ax = b
//! let a = DenseMatrix::from_rows(&[
//!     [2.0_f64, 1.0, -1.0],
//!     [-3.0, -1.0, 2.0],
//!     [-2.0, 1.0, 2.0],
//! ]).unwrap();
//! let b = DenseMatrix::column_vector(&[8.0, -11.0, -3.0]);
//! let x = lup_solve(&a, &b).unwrap(); // x = [2, 3, -1]
//! assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
//! ```
//!
//! ```
//! use nlsolve::optim::{Method, NewtonSettings, NewtonSolver, NonlinearSystem};
//! use nlsolve::DenseMatrix;
//!
//! // Solve x^2 + y^2 = 1, x = y with a frozen Jacobian
//! let system = NonlinearSystem::new()
//!     .with(|x: &[f64]| x[0] * x[0] + x[1] * x[1] - 1.0)
//!     .with(|x: &[f64]| x[0] - x[1]);
//! let settings = NewtonSettings { max_iter: 50, ..NewtonSettings::default() };
//! let r = NewtonSolver::new(system, settings)
//!     .with_method(Method::ModifiedNewton)
//!     .solve(&DenseMatrix::column_vector(&[1.0, 1.0]))
//!     .unwrap();
//! assert!(r.status.is_converged());
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: heap-allocated row-major `DenseMatrix<T>` with runtime
//!   dimensions, checked access, resizing, validated row/column
//!   permutation, and operator overloads.
//!
//! - [`linalg`]: checked kernels (`add`, `sub`, `hadamard`, `matmul`,
//!   `transpose`, `dot`), L1 / L2 / L-infinity norms and normalization,
//!   and LU decomposition with partial pivoting (`LupDecomposition`,
//!   `LinearSystem`, `lup_solve`).
//!
//! - [`optim`]: residual systems, finite-difference Jacobians, and the
//!   Newton / Modified-Newton driver with damping and an iteration observer.
//!
//! - [`traits`]: element trait hierarchy:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`FloatScalar`]: real floats, with the [`Accum`] round trip used by norms
//!   - [`MatrixRef`] / [`MatrixMut`]: generic read/write access for algorithms
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm; `std::error::Error` on error types |
//! | `serde` | no      | `Serialize` / `Deserialize` on settings and status types |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
pub mod linalg;
pub mod matrix;
pub mod optim;
pub mod traits;

pub use error::{MatrixError, PermutationDefect};
pub use linalg::{lup_solve, LinearSystem, LupDecomposition};
pub use matrix::{DenseMatrix, Permutation};
pub use optim::NewtonError;
pub use traits::{Accum, FloatScalar, MatrixMut, MatrixRef, Scalar};

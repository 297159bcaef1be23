//! Newton-family solvers for square nonlinear systems `F(x) = 0`.
//!
//! - [`NonlinearSystem`]: ordered residual components `f_i(x)`
//! - [`finite_difference_jacobian`]: two-point or three-point Jacobian
//! - [`NewtonSolver`]: Newton and Modified-Newton iteration with step damping
//! - [`NewtonTrace`]: per-iteration records collected through an observer
//!
//! Every step solves `J s = -F(x)` with the LUP solver from
//! [`crate::linalg`]. Running out of iterations is a normal outcome
//! ([`Status::MaxIterations`]); only malformed input, a singular Jacobian or
//! a non-finite residual produce a [`NewtonError`].

mod jacobian;
mod newton;
mod system;
mod trace;

#[cfg(test)]
mod tests;

pub use jacobian::{finite_difference_jacobian, FiniteDifference};
pub use newton::{
    Criterion, JacobianSource, Method, NewtonResult, NewtonSettings, NewtonSolver, Status,
};
pub use system::{NonlinearSystem, ResidualComponent};
pub use trace::{NewtonIteration, NewtonTrace};

use thiserror::Error;

use crate::error::MatrixError;

/// Errors from the Newton driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewtonError {
    /// A matrix operation failed; a singular Jacobian shows up here.
    #[error(transparent)]
    Linalg(#[from] MatrixError),

    /// The system has no components.
    #[error("nonlinear system has no equations")]
    EmptySystem,

    /// An input does not match the system dimension.
    #[error("{what}: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// A setting is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),

    /// The residual norm became NaN or infinite.
    #[error("residual is not finite at iteration {iteration}")]
    NotFinite { iteration: usize },
}

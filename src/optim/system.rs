use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::matrix::DenseMatrix;
use crate::traits::Scalar;

/// One scalar equation `f_i(x) = 0` of a nonlinear system.
///
/// Implemented for every `Fn(&[T]) -> T`, so plain closures and function
/// items can be used directly.
pub trait ResidualComponent<T> {
    fn evaluate(&self, x: &[T]) -> T;
}

impl<T, F> ResidualComponent<T> for F
where
    F: Fn(&[T]) -> T,
{
    #[inline]
    fn evaluate(&self, x: &[T]) -> T {
        self(x)
    }
}

/// An ordered set of residual components `F = (f_0, ..., f_{n-1})`.
///
/// The number of components is the dimension of the system.
///
/// ```
/// use nlsolve::optim::NonlinearSystem;
///
/// // x^2 + y^2 = 1, x = y
/// let system = NonlinearSystem::new()
///     .with(|x: &[f64]| x[0] * x[0] + x[1] * x[1] - 1.0)
///     .with(|x: &[f64]| x[0] - x[1]);
/// assert_eq!(system.dimension(), 2);
///
/// let f = system.evaluate(&[1.0, 0.0]);
/// assert_eq!(f.shape(), (2, 1));
/// assert_eq!(f.as_slice(), &[0.0, 1.0]);
/// ```
pub struct NonlinearSystem<T> {
    components: Vec<Box<dyn ResidualComponent<T>>>,
}

impl<T> Default for NonlinearSystem<T> {
    fn default() -> Self {
        Self {
            components: Vec::new(),
        }
    }
}

impl<T> core::fmt::Debug for NonlinearSystem<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NonlinearSystem")
            .field("dimension", &self.components.len())
            .finish()
    }
}

impl<T> NonlinearSystem<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component, builder style.
    pub fn with(mut self, component: impl ResidualComponent<T> + 'static) -> Self {
        self.push(component);
        self
    }

    /// Append a component.
    pub fn push(&mut self, component: impl ResidualComponent<T> + 'static) {
        self.components.push(Box::new(component));
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Scalar> NonlinearSystem<T> {
    /// Residual vector `F(x)` as an `n x 1` column.
    pub fn evaluate(&self, x: &[T]) -> DenseMatrix<T> {
        DenseMatrix::from_fn(self.components.len(), 1, |i, _| {
            self.components[i].evaluate(x)
        })
    }
}

impl<T> FromIterator<Box<dyn ResidualComponent<T>>> for NonlinearSystem<T> {
    fn from_iter<I: IntoIterator<Item = Box<dyn ResidualComponent<T>>>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Accumulator used by norms and dot products.
///
/// Fixed to `f64` whatever the element type, so aggregate rounding does not
/// depend on the storage precision of the matrix.
pub type Accum = f64;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point matrix elements.
///
/// Required by everything that needs `sqrt`, `abs`, machine epsilon or the
/// [`Accum`] round trip: norms, LUP, finite differences and the Newton driver.
pub trait FloatScalar: Scalar + Float {
    /// Widen into the norm accumulator.
    fn to_accum(self) -> Accum;

    /// Narrow an accumulator value back into `Self`.
    fn from_accum(a: Accum) -> Self;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline] fn to_accum(self) -> Accum { self as Accum }
                #[inline] fn from_accum(a: Accum) -> $t { a as $t }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

/// Read-only access to a matrix-like type.
///
/// The triangular solves are written against this trait, so they work on
/// any row-major store without going through checked accessors.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Contiguous slice of row `row`, starting at column `col_start`.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling in-place
/// elimination.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable contiguous slice of row `row`, starting at column `col_start`.
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];
}

use core::fmt::Debug;
use num_traits::{Num, One, Zero};

/// Trait for types the reference kernels accept as elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// The five f32 array kernels every backend provides.
///
/// Implementors are zero-sized tokens. Holding one proves the backend's
/// instruction set is usable on the running CPU, so every method is safe.
///
/// All slice arguments of a call must have the same length; a mismatch
/// panics. Empty slices are valid: nothing is written and `dot` returns
/// `0.0`.
///
/// ```
/// use floats_simd::{Kernels, Portable};
///
/// let a = [1.0_f32, 2.0, 3.0];
/// let b = [4.0_f32, 5.0, 6.0];
/// assert_eq!(Portable.dot(&a, &b), 32.0);
/// ```
pub trait Kernels: Copy + Debug + Send + Sync {
    /// Short backend name used in reports (`"portable"`, `"avx"`, `"neon"`).
    const NAME: &'static str;

    /// Number of f32 lanes processed per wide instruction.
    const LANES: usize;

    /// Accumulate: `c[i] += a[i] * b`.
    fn scale_add_into(&self, a: &[f32], b: f32, c: &mut [f32]);

    /// Overwrite: `c[i] = a[i] * b`.
    fn scale_into(&self, a: &[f32], b: f32, c: &mut [f32]);

    /// In place: `a[i] *= b`.
    fn scale_in_place(&self, a: &mut [f32], b: f32);

    /// Element-wise product: `c[i] = a[i] * b[i]`.
    fn multiply_into(&self, a: &[f32], b: &[f32], c: &mut [f32]);

    /// Dot product: `sum(a[i] * b[i])`.
    fn dot(&self, a: &[f32], b: &[f32]) -> f32;
}

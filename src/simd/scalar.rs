//! Generic scalar reference kernels.
//!
//! These define the ground-truth semantics every SIMD backend is tested
//! against. Each loop walks indices in order with a single accumulator, so
//! `dot` fixes the canonical left-to-right summation order.
//!
//! The SIMD backends reuse the same formulas for their remainder elements.

use crate::traits::Scalar;

/// Accumulate: c[i] += a[i] * b.
///
/// Multiply then add, two roundings. Backends using FMA round once.
#[inline]
pub fn scale_add_into<T: Scalar>(a: &[T], b: T, c: &mut [T]) {
    debug_assert_eq!(a.len(), c.len());
    for i in 0..a.len() {
        c[i] = c[i] + a[i] * b;
    }
}

/// Scalar multiplication: c[i] = a[i] * b.
#[inline]
pub fn scale_into<T: Scalar>(a: &[T], b: T, c: &mut [T]) {
    debug_assert_eq!(a.len(), c.len());
    for i in 0..a.len() {
        c[i] = a[i] * b;
    }
}

/// In-place scale: a[i] *= b.
#[inline]
pub fn scale_in_place<T: Scalar>(a: &mut [T], b: T) {
    for i in 0..a.len() {
        a[i] = a[i] * b;
    }
}

/// Element-wise multiplication: c[i] = a[i] * b[i].
#[inline]
pub fn multiply_into<T: Scalar>(a: &[T], b: &[T], c: &mut [T]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), c.len());
    for i in 0..a.len() {
        c[i] = a[i] * b[i];
    }
}

/// Dot product of two slices, summed sequentially in index order.
#[inline]
pub fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    let mut sum = T::zero();
    for i in 0..a.len() {
        sum = sum + a[i] * b[i];
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_small_vectors() {
        assert_eq!(dot(&[1.0_f32, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot::<f32>(&[], &[]), 0.0);
    }

    #[test]
    fn dot_sums_left_to_right() {
        // (1e8 + 1) - 1e8 loses the 1 in f32; the reverse order keeps it.
        let a = [1.0e8_f32, 1.0, -1.0e8];
        let b = [1.0_f32, 1.0, 1.0];
        assert_eq!(dot(&a, &b), 0.0);
        let a_rev = [-1.0e8_f32, 1.0e8, 1.0];
        assert_eq!(dot(&a_rev, &b), 1.0);
    }

    #[test]
    fn scale_add_accumulates() {
        let a = [1.0_f32, 2.0, 3.0];
        let mut c = [10.0_f32, 20.0, 30.0];
        scale_add_into(&a, 2.0, &mut c);
        assert_eq!(c, [12.0, 24.0, 36.0]);
    }

    #[test]
    fn scale_into_overwrites() {
        let a = [1.0_f32, -2.0, 0.5];
        let mut c = [99.0_f32; 3];
        scale_into(&a, 4.0, &mut c);
        assert_eq!(c, [4.0, -8.0, 2.0]);
    }

    #[test]
    fn scale_in_place_mutates() {
        let mut a = [1.0_f32, 2.0, 3.0];
        scale_in_place(&mut a, -1.0);
        assert_eq!(a, [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn multiply_into_elementwise() {
        let mut c = [0.0_f32; 3];
        multiply_into(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut c);
        assert_eq!(c, [4.0, 10.0, 18.0]);
    }

    #[test]
    fn integer_elements() {
        let a = [1_i32, 2, 3, 4, 5];
        let b = [6_i32, 7, 8, 9, 10];
        assert_eq!(dot(&a, &b), 1 * 6 + 2 * 7 + 3 * 8 + 4 * 9 + 5 * 10);

        let mut c = [1_i64, 1, 1];
        scale_add_into(&[1_i64, 2, 3], 3, &mut c);
        assert_eq!(c, [4, 7, 10]);
    }

    #[test]
    fn empty_slices_are_untouched() {
        let mut c: [f64; 0] = [];
        scale_add_into(&[], 2.0, &mut c);
        scale_into(&[], 2.0, &mut c);
        scale_in_place(&mut c, 2.0);
        multiply_into(&[], &[], &mut c);
        assert!(c.is_empty());
    }
}

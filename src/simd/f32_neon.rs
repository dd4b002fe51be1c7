//! NEON-accelerated f32 kernels for aarch64.
//!
//! NEON provides 128-bit registers → 4×f32 lanes. NEON is part of the
//! aarch64 baseline, so these kernels are always safe to call there.

use core::arch::aarch64::*;

/// f32 lanes per `float32x4_t`.
pub const LANES: usize = 4;

/// Accumulate: c[i] += a[i] * b, fused in the bulk region.
#[inline]
pub fn scale_add_into(a: &[f32], b: f32, c: &mut [f32]) {
    assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = vdupq_n_f32(b);
        for i in 0..chunks {
            let offset = i * LANES;
            let va = vld1q_f32(a.as_ptr().add(offset));
            let vc = vld1q_f32(c.as_ptr().add(offset));
            vst1q_f32(c.as_mut_ptr().add(offset), vfmaq_f32(vc, va, vb));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] += a[i] * b;
    }
}

/// Scalar multiplication: c[i] = a[i] * b.
#[inline]
pub fn scale_into(a: &[f32], b: f32, c: &mut [f32]) {
    assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = vdupq_n_f32(b);
        for i in 0..chunks {
            let offset = i * LANES;
            let va = vld1q_f32(a.as_ptr().add(offset));
            vst1q_f32(c.as_mut_ptr().add(offset), vmulq_f32(va, vb));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] = a[i] * b;
    }
}

/// In-place scale: a[i] *= b.
#[inline]
pub fn scale_in_place(a: &mut [f32], b: f32) {
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = vdupq_n_f32(b);
        let ptr = a.as_mut_ptr();
        for i in 0..chunks {
            let offset = i * LANES;
            let va = vld1q_f32(ptr.add(offset));
            vst1q_f32(ptr.add(offset), vmulq_f32(va, vb));
        }
    }

    let tail = chunks * LANES;
    for x in &mut a[tail..] {
        *x *= b;
    }
}

/// Element-wise multiplication: c[i] = a[i] * b[i].
#[inline]
pub fn multiply_into(a: &[f32], b: &[f32], c: &mut [f32]) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        for i in 0..chunks {
            let offset = i * LANES;
            let va = vld1q_f32(a.as_ptr().add(offset));
            let vb = vld1q_f32(b.as_ptr().add(offset));
            vst1q_f32(c.as_mut_ptr().add(offset), vmulq_f32(va, vb));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] = a[i] * b[i];
    }
}

/// Dot product of two f32 slices using NEON.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());
    let n = a.len();
    let chunks = n / LANES;
    let remainder = n % LANES;

    let mut sum = unsafe {
        let mut acc = vdupq_n_f32(0.0);

        for i in 0..chunks {
            let va = vld1q_f32(a.as_ptr().add(i * LANES));
            let vb = vld1q_f32(b.as_ptr().add(i * LANES));
            acc = vfmaq_f32(acc, va, vb);
        }

        vaddvq_f32(acc)
    };

    let tail = chunks * LANES;
    for i in 0..remainder {
        sum += a[tail + i] * b[tail + i];
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::scalar;

    #[test]
    fn dot_every_residue() {
        for n in 0..=2 * LANES + 1 {
            let a: Vec<f32> = (0..n).map(|i| (i + 1) as f32).collect();
            let b: Vec<f32> = (0..n).map(|i| (i + 1) as f32 * 0.5).collect();
            let expected = scalar::dot(&a, &b);
            let result = dot(&a, &b);
            assert!(
                (result - expected).abs() <= 1e-5 * expected.abs(),
                "neon dot n={n}: got {result}, expected {expected}"
            );
        }
    }

    #[test]
    fn scale_into_writes_tail() {
        let a = [2.0_f32; LANES + 1];
        let mut c = [0.0_f32; LANES + 1];
        scale_into(&a, 3.0, &mut c);
        assert_eq!(c, [6.0; LANES + 1]);
    }

    #[test]
    fn scale_add_matches_reference_on_integers() {
        for n in [0, 1, 3, 4, 5, 7, 8, 9] {
            let a: Vec<f32> = (0..n).map(|i| (i % 10 + 1) as f32).collect();
            let mut c: Vec<f32> = (0..n).map(|i| i as f32).collect();
            let mut expected = c.clone();
            scalar::scale_add_into(&a, 3.0, &mut expected);
            scale_add_into(&a, 3.0, &mut c);
            assert_eq!(c, expected, "neon scale_add_into n={n}");
        }
    }

    #[test]
    fn multiply_into_elementwise() {
        let a = [1.0_f32, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0_f32, 2.0, 2.0, 2.0, 0.5];
        let mut c = [0.0_f32; 5];
        multiply_into(&a, &b, &mut c);
        assert_eq!(c, [2.0, 4.0, 6.0, 8.0, 2.5]);
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_panic() {
        let mut c = [0.0_f32; 4];
        scale_into(&[1.0; 5], 1.0, &mut c);
    }
}

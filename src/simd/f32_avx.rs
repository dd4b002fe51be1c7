//! AVX-accelerated f32 kernels for x86_64.
//!
//! AVX provides 256-bit registers → 8×f32 lanes. Accumulating kernels use
//! FMA (`_mm256_fmadd_ps`), which rounds once where the scalar reference
//! rounds twice.
//!
//! Every function here is compiled with `avx,fma` enabled regardless of
//! the crate-wide target features, so callers must only reach them after
//! confirming CPU support (see [`crate::Avx::detect`]).

use core::arch::x86_64::*;

/// f32 lanes per `__m256`.
pub const LANES: usize = 8;

/// Accumulate: c[i] += a[i] * b.
///
/// # Safety
///
/// The CPU must support AVX and FMA. `a` and `c` must have equal lengths.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn scale_add_into(a: &[f32], b: f32, c: &mut [f32]) {
    debug_assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = _mm256_set1_ps(b);
        for i in 0..chunks {
            let offset = i * LANES;
            let va = _mm256_loadu_ps(a.as_ptr().add(offset));
            let vc = _mm256_loadu_ps(c.as_ptr().add(offset));
            _mm256_storeu_ps(c.as_mut_ptr().add(offset), _mm256_fmadd_ps(va, vb, vc));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] += a[i] * b;
    }
}

/// Scalar multiplication: c[i] = a[i] * b.
///
/// # Safety
///
/// The CPU must support AVX. `a` and `c` must have equal lengths.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn scale_into(a: &[f32], b: f32, c: &mut [f32]) {
    debug_assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = _mm256_set1_ps(b);
        for i in 0..chunks {
            let offset = i * LANES;
            let va = _mm256_loadu_ps(a.as_ptr().add(offset));
            _mm256_storeu_ps(c.as_mut_ptr().add(offset), _mm256_mul_ps(va, vb));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] = a[i] * b;
    }
}

/// In-place scale: a[i] *= b.
///
/// # Safety
///
/// The CPU must support AVX.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn scale_in_place(a: &mut [f32], b: f32) {
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        let vb = _mm256_set1_ps(b);
        let ptr = a.as_mut_ptr();
        for i in 0..chunks {
            let offset = i * LANES;
            let va = _mm256_loadu_ps(ptr.add(offset));
            _mm256_storeu_ps(ptr.add(offset), _mm256_mul_ps(va, vb));
        }
    }

    let tail = chunks * LANES;
    for x in &mut a[tail..] {
        *x *= b;
    }
}

/// Element-wise multiplication: c[i] = a[i] * b[i].
///
/// # Safety
///
/// The CPU must support AVX. All three slices must have equal lengths.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn multiply_into(a: &[f32], b: &[f32], c: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), c.len());
    let n = a.len();
    let chunks = n / LANES;

    unsafe {
        for i in 0..chunks {
            let offset = i * LANES;
            let va = _mm256_loadu_ps(a.as_ptr().add(offset));
            let vb = _mm256_loadu_ps(b.as_ptr().add(offset));
            _mm256_storeu_ps(c.as_mut_ptr().add(offset), _mm256_mul_ps(va, vb));
        }
    }

    let tail = chunks * LANES;
    for i in tail..n {
        c[i] = a[i] * b[i];
    }
}

/// Dot product of two f32 slices using AVX + FMA.
///
/// # Safety
///
/// The CPU must support AVX and FMA. `a` and `b` must have equal lengths.
#[inline]
#[target_feature(enable = "avx,fma")]
pub unsafe fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let chunks = n / LANES;
    let tail = chunks * LANES;

    let mut sum = unsafe {
        let mut acc = _mm256_setzero_ps();

        for i in 0..chunks {
            let va = _mm256_loadu_ps(a.as_ptr().add(i * LANES));
            let vb = _mm256_loadu_ps(b.as_ptr().add(i * LANES));
            acc = _mm256_fmadd_ps(va, vb, acc);
        }

        // Horizontal sum: 8 lanes → 1
        let hi128 = _mm256_extractf128_ps(acc, 1);
        let lo128 = _mm256_castps256_ps128(acc);
        let sum128 = _mm_add_ps(hi128, lo128); // 4 lanes
        let shuf = _mm_movehl_ps(sum128, sum128);
        let sums = _mm_add_ps(sum128, shuf); // 2 partial sums
        let shuf2 = _mm_shuffle_ps(sums, sums, 1);
        _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
    };

    for i in tail..n {
        sum += a[i] * b[i];
    }
    sum
}

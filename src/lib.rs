//! # floats-simd
//!
//! Vectorized single-precision array kernels with interchangeable backends,
//! and a differential harness proving the backends agree with a scalar
//! reference. No heap allocation in any kernel; `no_std` compatible.
//!
//! ## Quick start
//!
//! ```
//! let a = [1.0_f32, 2.0, 3.0];
//! let b = [4.0_f32, 5.0, 6.0];
//! assert_eq!(floats_simd::dot(&a, &b), 32.0);
//!
//! let mut c = [0.0_f32; 3];
//! floats_simd::multiply_into(&a, &b, &mut c);
//! assert_eq!(c, [4.0, 10.0, 18.0]);
//! ```
//!
//! ## Kernels
//!
//! | Function            | Semantics               | Mutates |
//! |---------------------|-------------------------|---------|
//! | [`scale_add_into`]  | `c[i] += a[i] * b`      | `c`     |
//! | [`scale_into`]      | `c[i] = a[i] * b`       | `c`     |
//! | [`scale_in_place`]  | `a[i] *= b`             | `a`     |
//! | [`multiply_into`]   | `c[i] = a[i] * b[i]`    | `c`     |
//! | [`dot`]             | `sum(a[i] * b[i])`      | none    |
//!
//! Slices passed to one call must have equal lengths; a mismatch panics.
//! Empty slices are valid.
//!
//! ## Modules
//!
//! - [`simd`]: backend tokens ([`Portable`], `Avx`, `Neon`) implementing
//!   [`Kernels`], the scalar reference kernels in [`simd::scalar`], and the
//!   compile-time [`simd::native()`] selection behind the free functions.
//!
//! - [`tolerance`]: [`Tolerance`], the one approximate-equality policy used
//!   to compare backends: a few ULPs for element-wise kernels, relative
//!   `1e-5` for `dot`.
//!
//! - [`harness`]: seeded differential tester: generates inputs, runs the
//!   reference and a backend, reports per-case mismatches. Requires the
//!   `harness` feature.
//!
//! - [`traits`]: [`Kernels`] (the backend contract) and [`Scalar`] (element
//!   bound of the generic reference kernels).
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Runtime AVX detection; hardware float math via system libm |
//! | `harness` | yes      | Differential test harness (`rand`, `thiserror`, `tracing`) |
//!
//! Without `std`, float math falls back to `libm` through `num-traits`.
//!
//! Build with `-C target-cpu=native` (or `+avx,+fma`) on x86_64 to route the
//! free functions through AVX.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(feature = "harness")]
pub mod harness;
pub mod simd;
pub mod tolerance;
pub mod traits;

pub use simd::{Native, Portable, native};
#[cfg(target_arch = "x86_64")]
pub use simd::Avx;
#[cfg(target_arch = "aarch64")]
pub use simd::Neon;
pub use tolerance::Tolerance;
pub use traits::{Kernels, Scalar};

/// `c[i] += a[i] * b` on the native backend.
#[inline]
pub fn scale_add_into(a: &[f32], b: f32, c: &mut [f32]) {
    native().scale_add_into(a, b, c);
}

/// `c[i] = a[i] * b` on the native backend.
#[inline]
pub fn scale_into(a: &[f32], b: f32, c: &mut [f32]) {
    native().scale_into(a, b, c);
}

/// `a[i] *= b` on the native backend.
#[inline]
pub fn scale_in_place(a: &mut [f32], b: f32) {
    native().scale_in_place(a, b);
}

/// `c[i] = a[i] * b[i]` on the native backend.
#[inline]
pub fn multiply_into(a: &[f32], b: &[f32], c: &mut [f32]) {
    native().multiply_into(a, b, c);
}

/// `sum(a[i] * b[i])` on the native backend. Returns `0.0` for empty input.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    native().dot(a, b)
}

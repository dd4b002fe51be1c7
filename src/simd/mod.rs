//! SIMD kernels with compile-time architecture selection.
//!
//! ## Backends
//!
//! Each backend is a zero-sized token implementing [`Kernels`]:
//!
//! | Token        | Arch      | ISA        | Lanes |
//! |--------------|-----------|------------|-------|
//! | [`Avx`]      | `x86_64`  | AVX + FMA  | 8     |
//! | [`Neon`]     | `aarch64` | NEON       | 4     |
//! | [`Portable`] | any       | scalar     | 1     |
//!
//! SIMD kernels process the bulk of a slice in lane-width chunks and
//! finish the last `n % LANES` elements with the scalar formula from
//! [`scalar`].
//!
//! ## Dispatch strategy
//!
//! The crate-level functions ([`crate::dot`] etc.) call [`native()`], whose
//! type is fixed at compile time: AVX when `avx` and `fma` are statically
//! enabled (`-C target-cpu=native` or `-C target-feature=+avx,+fma`), NEON
//! on aarch64, the portable kernels otherwise. There is no runtime branch
//! on the hot path.
//!
//! The explicit tokens let the test harness compare every backend the host
//! CPU can execute, whatever the build's target features are.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub(crate) mod f32_avx;

#[cfg(target_arch = "aarch64")]
pub(crate) mod f32_neon;

use crate::traits::Kernels;

/// Portable scalar backend. Always available; defines reference semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Portable;

impl Kernels for Portable {
    const NAME: &'static str = "portable";
    const LANES: usize = 1;

    #[inline]
    fn scale_add_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        assert_eq!(a.len(), c.len());
        scalar::scale_add_into(a, b, c);
    }

    #[inline]
    fn scale_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        assert_eq!(a.len(), c.len());
        scalar::scale_into(a, b, c);
    }

    #[inline]
    fn scale_in_place(&self, a: &mut [f32], b: f32) {
        scalar::scale_in_place(a, b);
    }

    #[inline]
    fn multiply_into(&self, a: &[f32], b: &[f32], c: &mut [f32]) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), c.len());
        scalar::multiply_into(a, b, c);
    }

    #[inline]
    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len());
        scalar::dot(a, b)
    }
}

/// AVX + FMA backend for x86_64 (8×f32 lanes).
///
/// Only obtainable through [`Avx::detect`], so holding one means the CPU
/// can execute the kernels.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Avx {
    _cpu: (),
}

#[cfg(target_arch = "x86_64")]
impl Avx {
    /// Returns the backend if the running CPU supports AVX and FMA.
    ///
    /// With the `std` feature this queries CPUID at runtime. Without it,
    /// only statically enabled target features count.
    pub fn detect() -> Option<Self> {
        #[cfg(feature = "std")]
        let supported = std::is_x86_feature_detected!("avx") && std::is_x86_feature_detected!("fma");
        #[cfg(not(feature = "std"))]
        let supported = cfg!(all(target_feature = "avx", target_feature = "fma"));

        if supported { Some(Self { _cpu: () }) } else { None }
    }

    /// Creates the token without checking the CPU.
    ///
    /// # Safety
    ///
    /// The running CPU must support AVX and FMA.
    #[inline]
    pub const unsafe fn new_unchecked() -> Self {
        Self { _cpu: () }
    }
}

#[cfg(target_arch = "x86_64")]
impl Kernels for Avx {
    const NAME: &'static str = "avx";
    const LANES: usize = f32_avx::LANES;

    #[inline]
    fn scale_add_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        assert_eq!(a.len(), c.len());
        // SAFETY: the token proves AVX + FMA support; lengths checked above.
        unsafe { f32_avx::scale_add_into(a, b, c) }
    }

    #[inline]
    fn scale_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        assert_eq!(a.len(), c.len());
        // SAFETY: as above.
        unsafe { f32_avx::scale_into(a, b, c) }
    }

    #[inline]
    fn scale_in_place(&self, a: &mut [f32], b: f32) {
        // SAFETY: the token proves AVX support.
        unsafe { f32_avx::scale_in_place(a, b) }
    }

    #[inline]
    fn multiply_into(&self, a: &[f32], b: &[f32], c: &mut [f32]) {
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), c.len());
        // SAFETY: as above.
        unsafe { f32_avx::multiply_into(a, b, c) }
    }

    #[inline]
    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len());
        // SAFETY: as above.
        unsafe { f32_avx::dot(a, b) }
    }
}

/// NEON backend for aarch64 (4×f32 lanes).
#[cfg(target_arch = "aarch64")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Neon;

#[cfg(target_arch = "aarch64")]
impl Kernels for Neon {
    const NAME: &'static str = "neon";
    const LANES: usize = f32_neon::LANES;

    #[inline]
    fn scale_add_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        f32_neon::scale_add_into(a, b, c);
    }

    #[inline]
    fn scale_into(&self, a: &[f32], b: f32, c: &mut [f32]) {
        f32_neon::scale_into(a, b, c);
    }

    #[inline]
    fn scale_in_place(&self, a: &mut [f32], b: f32) {
        f32_neon::scale_in_place(a, b);
    }

    #[inline]
    fn multiply_into(&self, a: &[f32], b: &[f32], c: &mut [f32]) {
        f32_neon::multiply_into(a, b, c);
    }

    #[inline]
    fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        f32_neon::dot(a, b)
    }
}

/// The backend selected for this build.
#[cfg(all(target_arch = "x86_64", target_feature = "avx", target_feature = "fma"))]
pub type Native = Avx;
/// The backend selected for this build.
#[cfg(target_arch = "aarch64")]
pub type Native = Neon;
/// The backend selected for this build.
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx", target_feature = "fma"),
    target_arch = "aarch64"
)))]
pub type Native = Portable;

/// Returns the compile-time selected backend.
#[cfg(all(target_arch = "x86_64", target_feature = "avx", target_feature = "fma"))]
#[inline]
pub const fn native() -> Native {
    // SAFETY: avx and fma are enabled for the whole build.
    unsafe { Avx::new_unchecked() }
}

/// Returns the compile-time selected backend.
#[cfg(target_arch = "aarch64")]
#[inline]
pub const fn native() -> Native {
    Neon
}

/// Returns the compile-time selected backend.
#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx", target_feature = "fma"),
    target_arch = "aarch64"
)))]
#[inline]
pub const fn native() -> Native {
    Portable
}

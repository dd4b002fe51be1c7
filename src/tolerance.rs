//! Approximate equality for comparing kernel outputs.
//!
//! Two values are considered equal when **any** of the following holds:
//!
//! - they are bitwise-equal up to the sign of zero, or both NaN;
//! - `|expected - actual| <= abs`;
//! - `|expected - actual| <= rel * scale`, where `scale` is the magnitude
//!   of the computation (see below);
//! - they are at most `ulps` representable floats apart.
//!
//! Infinities only match an identical infinity.
//!
//! `scale` defaults to `max(|expected|, |actual|)`. For accumulating
//! operations the result can be much smaller than its terms (cancellation),
//! so callers should pass the sum of absolute term magnitudes instead:
//! `|c| + |a * b|` for a multiply-accumulate, `sum |a[i] * b[i]|` for a dot
//! product. Rounding error is bounded relative to that sum, not to the
//! result.
//!
//! ```
//! use floats_simd::Tolerance;
//!
//! assert!(Tolerance::ELEMENTWISE.close(1.0, 1.0 + f32::EPSILON));
//! assert!(!Tolerance::ELEMENTWISE.close(1.0, 1.001));
//! assert!(Tolerance::REDUCTION.close_scaled(0.0, 1e-7, 100.0));
//! ```

use num_traits::Float;

/// Comparison policy: absolute floor, relative bound and ULP distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Relative bound, multiplied by the comparison scale.
    pub rel: f32,
    /// Absolute floor for results near zero.
    pub abs: f32,
    /// Maximum distance in units in the last place.
    pub ulps: u32,
}

impl Tolerance {
    /// Element-wise and scale operations.
    ///
    /// No reordering happens, so the only source of divergence is FMA
    /// rounding once instead of twice: a few ULPs.
    pub const ELEMENTWISE: Self = Self {
        rel: 4.0 * f32::EPSILON,
        abs: f32::MIN_POSITIVE,
        ulps: 4,
    };

    /// Reductions (`dot`), where lane-wise partial sums reassociate the
    /// reference's left-to-right order.
    pub const REDUCTION: Self = Self {
        rel: 1e-5,
        abs: 1e-6,
        ulps: 4,
    };

    /// Bit-exact comparison (`-0.0 == 0.0`, NaN equals NaN).
    pub const EXACT: Self = Self {
        rel: 0.0,
        abs: 0.0,
        ulps: 0,
    };

    /// Compare using the larger of the two magnitudes as scale.
    #[inline]
    pub fn close(&self, expected: f32, actual: f32) -> bool {
        let scale = Float::max(Float::abs(expected), Float::abs(actual));
        self.close_scaled(expected, actual, scale)
    }

    /// Compare with an explicit magnitude for the relative bound.
    pub fn close_scaled(&self, expected: f32, actual: f32, scale: f32) -> bool {
        if expected.is_nan() || actual.is_nan() {
            return expected.is_nan() && actual.is_nan();
        }
        if expected == actual {
            return true;
        }
        if expected.is_infinite() || actual.is_infinite() {
            return false;
        }
        let diff = Float::abs(expected - actual);
        diff <= self.abs || diff <= self.rel * Float::abs(scale) || ulp_distance(expected, actual) <= self.ulps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::ELEMENTWISE
    }
}

/// Number of representable f32 values between `a` and `b`.
///
/// `0.0` and `-0.0` are zero apart. Saturates at `u32::MAX` for NaN.
pub fn ulp_distance(a: f32, b: f32) -> u32 {
    if a.is_nan() || b.is_nan() {
        return u32::MAX;
    }
    // Map the sign-magnitude bit pattern onto a monotonic integer line.
    fn ordered(x: f32) -> i64 {
        let bits = x.to_bits() as i32;
        if bits < 0 { i64::from(i32::MIN) - i64::from(bits) } else { i64::from(bits) }
    }
    let d = (ordered(a) - ordered(b)).unsigned_abs();
    u32::try_from(d).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulp_distance_adjacent() {
        let x = 1.0_f32;
        let next = f32::from_bits(x.to_bits() + 1);
        assert_eq!(ulp_distance(x, next), 1);
        assert_eq!(ulp_distance(next, x), 1);
        assert_eq!(ulp_distance(x, x), 0);
    }

    #[test]
    fn ulp_distance_across_zero() {
        assert_eq!(ulp_distance(0.0, -0.0), 0);
        let tiny = f32::from_bits(1);
        assert_eq!(ulp_distance(tiny, -tiny), 2);
        assert_eq!(ulp_distance(f32::NAN, 1.0), u32::MAX);
    }

    #[test]
    fn elementwise_accepts_few_ulps() {
        let x = 3.5_f32;
        let off = f32::from_bits(x.to_bits() + 3);
        assert!(Tolerance::ELEMENTWISE.close(x, off));
        assert!(!Tolerance::EXACT.close(x, off));
    }

    #[test]
    fn elementwise_rejects_real_errors() {
        assert!(!Tolerance::ELEMENTWISE.close(6.0, 0.0));
        assert!(!Tolerance::ELEMENTWISE.close(100.0, 100.01));
    }

    #[test]
    fn reduction_is_relative() {
        assert!(Tolerance::REDUCTION.close(1.0e6, 1.0e6 + 5.0));
        assert!(!Tolerance::REDUCTION.close(1.0e6, 1.0e6 + 50.0));
        assert!(Tolerance::REDUCTION.close(32.0, 32.0));
    }

    #[test]
    fn scale_covers_cancellation() {
        // c + a*b nearly cancels: the result is tiny but the terms are not.
        assert!(!Tolerance::ELEMENTWISE.close(1.0e-6, 2.0e-6));
        assert!(Tolerance::ELEMENTWISE.close_scaled(1.0e-6, 1.1e-6, 1.0));
    }

    #[test]
    fn nan_and_infinity() {
        assert!(Tolerance::ELEMENTWISE.close(f32::NAN, f32::NAN));
        assert!(!Tolerance::ELEMENTWISE.close(f32::NAN, 1.0));
        assert!(Tolerance::ELEMENTWISE.close(f32::INFINITY, f32::INFINITY));
        assert!(!Tolerance::ELEMENTWISE.close(f32::INFINITY, f32::MAX));
        assert!(!Tolerance::ELEMENTWISE.close(f32::INFINITY, f32::NEG_INFINITY));
    }

    #[test]
    fn signed_zero_is_equal() {
        assert!(Tolerance::EXACT.close(0.0, -0.0));
    }
}

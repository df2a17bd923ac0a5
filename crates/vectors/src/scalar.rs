//! Per-lane `f32` rules shared by [`Vector4`](crate::Vector4) and the kernels.
//!
//! The min/max family follows IEEE 754-2019: `minimum`/`maximum` propagate
//! NaN, the `*_number` forms let a number win over NaN, and equal magnitudes
//! are resolved by sign so that `-0.0 < +0.0`.

use crate::bits;

/// Rounding rule for [`Vector4::round_with`](crate::Vector4::round_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MidpointRounding {
  /// Banker's rounding: halves go to the even neighbour.
  #[default]
  ToEven,
  /// Halves go away from zero.
  AwayFromZero,
  /// Truncation.
  ToZero,
  /// Floor.
  ToNegativeInfinity,
  /// Ceiling.
  ToPositiveInfinity,
}

// ─────────────────────────────────────────────────────────────────────────────
// Min / max
// ─────────────────────────────────────────────────────────────────────────────

/// IEEE `minimum`: NaN propagates, `-0.0 < +0.0`.
#[inline]
#[must_use]
pub fn minimum(x: f32, y: f32) -> f32 {
  if x != y {
    if x.is_nan() {
      return x;
    }
    return if x < y { x } else { y };
  }
  if bits::sign_bit(x) { x } else { y }
}

/// IEEE `maximum`: NaN propagates, `+0.0 > -0.0`.
#[inline]
#[must_use]
pub fn maximum(x: f32, y: f32) -> f32 {
  if x != y {
    if x.is_nan() {
      return x;
    }
    return if y < x { x } else { y };
  }
  if bits::sign_bit(y) { x } else { y }
}

/// IEEE `minimumNumber`: a number wins over NaN.
#[inline]
#[must_use]
pub fn minimum_number(x: f32, y: f32) -> f32 {
  if x != y {
    if y.is_nan() {
      return x;
    }
    return if x < y { x } else { y };
  }
  if bits::sign_bit(x) { x } else { y }
}

/// IEEE `maximumNumber`: a number wins over NaN.
#[inline]
#[must_use]
pub fn maximum_number(x: f32, y: f32) -> f32 {
  if x != y {
    if y.is_nan() {
      return x;
    }
    return if y < x { x } else { y };
  }
  if bits::sign_bit(y) { x } else { y }
}

/// Smaller magnitude; NaN propagates, ties prefer the negative operand.
#[inline]
#[must_use]
pub fn min_magnitude(x: f32, y: f32) -> f32 {
  let (ax, ay) = (x.abs(), y.abs());
  if ax < ay || ax.is_nan() {
    return x;
  }
  if ax == ay {
    return if bits::sign_bit(x) { x } else { y };
  }
  y
}

/// Larger magnitude; NaN propagates, ties prefer the positive operand.
#[inline]
#[must_use]
pub fn max_magnitude(x: f32, y: f32) -> f32 {
  let (ax, ay) = (x.abs(), y.abs());
  if ax > ay || ax.is_nan() {
    return x;
  }
  if ax == ay {
    return if bits::sign_bit(x) { y } else { x };
  }
  y
}

/// Smaller magnitude; a number wins over NaN.
#[inline]
#[must_use]
pub fn min_magnitude_number(x: f32, y: f32) -> f32 {
  let (ax, ay) = (x.abs(), y.abs());
  if ax < ay || ay.is_nan() {
    return x;
  }
  if ax == ay {
    return if bits::sign_bit(x) { x } else { y };
  }
  y
}

/// Larger magnitude; a number wins over NaN.
#[inline]
#[must_use]
pub fn max_magnitude_number(x: f32, y: f32) -> f32 {
  let (ax, ay) = (x.abs(), y.abs());
  if ax > ay || ay.is_nan() {
    return x;
  }
  if ax == ay {
    return if bits::sign_bit(x) { y } else { x };
  }
  y
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[must_use]
pub fn is_integer(x: f32) -> bool {
  x.is_finite() && x.trunc() == x
}

#[inline]
#[must_use]
pub fn is_even_integer(x: f32) -> bool {
  is_integer(x) && x % 2.0 == 0.0
}

#[inline]
#[must_use]
pub fn is_odd_integer(x: f32) -> bool {
  is_integer(x) && x % 2.0 != 0.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Arithmetic helpers
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[must_use]
pub fn round(x: f32, mode: MidpointRounding) -> f32 {
  match mode {
    MidpointRounding::ToEven => x.round_ties_even(),
    MidpointRounding::AwayFromZero => x.round(),
    MidpointRounding::ToZero => x.trunc(),
    MidpointRounding::ToNegativeInfinity => x.floor(),
    MidpointRounding::ToPositiveInfinity => x.ceil(),
  }
}

/// `a * (1 - t) + b * t`. Exact at both endpoints for finite inputs.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
  a * (1.0 - t) + b * t
}

#[inline]
#[must_use]
pub fn degrees_to_radians(x: f32) -> f32 {
  (x * core::f32::consts::PI) / 180.0
}

#[inline]
#[must_use]
pub fn radians_to_degrees(x: f32) -> f32 {
  (x * 180.0) / core::f32::consts::PI
}

#[cfg(test)]
mod tests {
  use super::*;

  fn same(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
  }

  #[test]
  fn minimum_and_maximum_order_signed_zero() {
    assert!(same(minimum(0.0, -0.0), -0.0));
    assert!(same(minimum(-0.0, 0.0), -0.0));
    assert!(same(maximum(0.0, -0.0), 0.0));
    assert!(same(maximum(-0.0, 0.0), 0.0));
  }

  #[test]
  fn minimum_and_maximum_propagate_nan() {
    assert!(minimum(f32::NAN, 1.0).is_nan());
    assert!(minimum(1.0, f32::NAN).is_nan());
    assert!(maximum(f32::NAN, 1.0).is_nan());
    assert!(maximum(1.0, f32::NAN).is_nan());
    assert_eq!(minimum(-1.0, 2.0), -1.0);
    assert_eq!(maximum(-1.0, 2.0), 2.0);
  }

  #[test]
  fn number_forms_ignore_nan() {
    assert_eq!(minimum_number(f32::NAN, 1.0), 1.0);
    assert_eq!(minimum_number(1.0, f32::NAN), 1.0);
    assert_eq!(maximum_number(f32::NAN, -1.0), -1.0);
    assert_eq!(maximum_number(-1.0, f32::NAN), -1.0);
    assert!(minimum_number(f32::NAN, f32::NAN).is_nan());
    assert!(same(minimum_number(0.0, -0.0), -0.0));
    assert!(same(maximum_number(-0.0, 0.0), 0.0));
  }

  #[test]
  fn magnitude_forms() {
    assert_eq!(min_magnitude(-3.0, 2.0), 2.0);
    assert_eq!(max_magnitude(-3.0, 2.0), -3.0);
    assert_eq!(min_magnitude(-2.0, 2.0), -2.0);
    assert_eq!(min_magnitude(2.0, -2.0), -2.0);
    assert_eq!(max_magnitude(-2.0, 2.0), 2.0);
    assert_eq!(max_magnitude(2.0, -2.0), 2.0);
    assert!(min_magnitude(f32::NAN, 1.0).is_nan());
    assert!(max_magnitude(1.0, f32::NAN).is_nan());
    assert_eq!(min_magnitude_number(f32::NAN, 1.0), 1.0);
    assert_eq!(max_magnitude_number(1.0, f32::NAN), 1.0);
  }

  #[test]
  fn integer_classification() {
    assert!(is_integer(-4.0));
    assert!(!is_integer(0.5));
    assert!(!is_integer(f32::INFINITY));
    assert!(!is_integer(f32::NAN));
    assert!(is_even_integer(-4.0));
    assert!(is_even_integer(0.0));
    assert!(is_odd_integer(-3.0));
    assert!(!is_odd_integer(2.0));
    assert!(is_even_integer(16_777_216.0));
  }

  #[test]
  fn rounding_modes() {
    assert_eq!(round(2.5, MidpointRounding::ToEven), 2.0);
    assert_eq!(round(3.5, MidpointRounding::ToEven), 4.0);
    assert_eq!(round(2.5, MidpointRounding::AwayFromZero), 3.0);
    assert_eq!(round(-2.5, MidpointRounding::AwayFromZero), -3.0);
    assert_eq!(round(-2.7, MidpointRounding::ToZero), -2.0);
    assert_eq!(round(-2.2, MidpointRounding::ToNegativeInfinity), -3.0);
    assert_eq!(round(2.2, MidpointRounding::ToPositiveInfinity), 3.0);
  }

  #[test]
  fn lerp_hits_pinned_values() {
    assert_eq!(lerp(0.447_281_36, 0.463_459_46, 0.264_024_35), 0.451_552_75);
    assert_eq!(lerp(-100.0, 0.333_333_34, 1.0), 0.333_333_34);
    assert_eq!(lerp(1.0, 5.0, 0.0), 1.0);
  }

  #[test]
  fn angle_conversion() {
    assert_eq!(degrees_to_radians(180.0), core::f32::consts::PI);
    assert_eq!(radians_to_degrees(core::f32::consts::PI), 180.0);
  }
}

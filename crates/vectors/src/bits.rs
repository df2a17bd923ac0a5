//! Bit-level views of `f32` lanes.
//!
//! Masks are ordinary `f32` values whose bits are either all set or all clear,
//! so they flow through the same registers as data.

/// A lane with all 32 bits set (a NaN payload).
pub const ALL_BITS_SET: f32 = f32::from_bits(u32::MAX);

const SIGN: u32 = 0x8000_0000;

/// All-bits-set when `cond` holds, `+0.0` otherwise.
#[inline]
#[must_use]
pub const fn mask(cond: bool) -> f32 {
  if cond { ALL_BITS_SET } else { 0.0 }
}

#[inline]
#[must_use]
pub const fn is_all_bits_set(x: f32) -> bool {
  x.to_bits() == u32::MAX
}

#[inline]
#[must_use]
pub const fn sign_bit(x: f32) -> bool {
  x.to_bits() & SIGN != 0
}

#[inline]
#[must_use]
pub const fn and(a: f32, b: f32) -> f32 {
  f32::from_bits(a.to_bits() & b.to_bits())
}

#[inline]
#[must_use]
pub const fn or(a: f32, b: f32) -> f32 {
  f32::from_bits(a.to_bits() | b.to_bits())
}

#[inline]
#[must_use]
pub const fn xor(a: f32, b: f32) -> f32 {
  f32::from_bits(a.to_bits() ^ b.to_bits())
}

#[inline]
#[must_use]
pub const fn not(a: f32) -> f32 {
  f32::from_bits(!a.to_bits())
}

/// `a & !b`.
#[inline]
#[must_use]
pub const fn and_not(a: f32, b: f32) -> f32 {
  f32::from_bits(a.to_bits() & !b.to_bits())
}

/// Per-bit select: bits of `left` where `mask` is set, `right` elsewhere.
#[inline]
#[must_use]
pub const fn select(mask: f32, left: f32, right: f32) -> f32 {
  let m = mask.to_bits();
  f32::from_bits((left.to_bits() & m) | (right.to_bits() & !m))
}

/// Bits used for hashing: `-0.0` folds into `+0.0` and every NaN into one
/// canonical pattern, matching value equality.
#[inline]
#[must_use]
pub const fn canonical_bits(x: f32) -> u32 {
  if x.is_nan() {
    f32::NAN.to_bits()
  } else if x == 0.0 {
    0
  } else {
    x.to_bits()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn masks() {
    assert!(is_all_bits_set(mask(true)));
    assert_eq!(mask(false).to_bits(), 0);
    assert!(ALL_BITS_SET.is_nan());
  }

  #[test]
  fn bitwise_ops() {
    assert_eq!(and(1.0, ALL_BITS_SET), 1.0);
    assert_eq!(or(0.0, -0.0).to_bits(), SIGN);
    assert_eq!(xor(1.0, -0.0), -1.0);
    assert_eq!(and_not(-1.0, -0.0), 1.0);
    assert_eq!(not(0.0).to_bits(), u32::MAX);
  }

  #[test]
  fn select_is_bitwise() {
    assert_eq!(select(ALL_BITS_SET, 1.0, 2.0), 1.0);
    assert_eq!(select(0.0, 1.0, 2.0), 2.0);
    // Sign bit from left, magnitude from right.
    assert_eq!(select(-0.0, -1.0, 2.0), -2.0);
  }

  #[test]
  fn canonical_bits_follow_value_equality() {
    assert_eq!(canonical_bits(-0.0), canonical_bits(0.0));
    assert_eq!(canonical_bits(f32::NAN), canonical_bits(-f32::NAN));
    assert_eq!(canonical_bits(ALL_BITS_SET), canonical_bits(f32::NAN));
    assert_ne!(canonical_bits(1.0), canonical_bits(-1.0));
    assert!(sign_bit(-0.0));
    assert!(!sign_bit(0.0));
  }
}

//! Vector acceleration tiers.
//!
//! | Tier | Register width | x86 | aarch64 |
//! |------|----------------|-----|---------|
//! | 0 | Scalar | - | - |
//! | 1 | V128 | SSE2 | NEON |
//! | 2 | V256 | AVX2 | - |
//! | 3 | V512 | AVX-512 | - |

use core::fmt;

use platform::{Gate, VectorWidths};

/// Vector acceleration tier.
///
/// Ordered from lowest (always available) to widest, so `tier >= VectorTier::V128`
/// reads as "at least 128-bit SIMD".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum VectorTier {
  /// Plain `f32` arithmetic. Always available.
  #[default]
  Scalar = 0,
  /// 128-bit registers: one `Vector4` per register.
  V128 = 1,
  /// 256-bit registers: two `Vector4`s per register.
  V256 = 2,
  /// 512-bit registers.
  V512 = 3,
}

impl VectorTier {
  /// All tiers in ascending order.
  pub const ALL: [Self; 4] = [Self::Scalar, Self::V128, Self::V256, Self::V512];

  #[inline]
  #[must_use]
  pub const fn as_u8(self) -> u8 {
    self as u8
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Scalar => "scalar",
      Self::V128 => "v128",
      Self::V256 => "v256",
      Self::V512 => "v512",
    }
  }

  /// Register width in bytes; 4 for a scalar lane.
  #[inline]
  #[must_use]
  pub const fn byte_width(self) -> usize {
    match self {
      Self::Scalar => 4,
      Self::V128 => 16,
      Self::V256 => 32,
      Self::V512 => 64,
    }
  }

  /// Widest accelerated tier.
  #[inline]
  #[must_use]
  pub const fn from_widths(widths: &VectorWidths) -> Self {
    if widths.vector512_accelerated {
      Self::V512
    } else if widths.vector256_accelerated {
      Self::V256
    } else if widths.vector128_accelerated {
      Self::V128
    } else {
      Self::Scalar
    }
  }

  #[inline]
  #[must_use]
  pub const fn from_gate(gate: &Gate) -> Self {
    Self::from_widths(gate.widths())
  }

  /// Tier of the process-wide gate.
  #[inline]
  #[must_use]
  pub fn detected() -> Self {
    Self::from_gate(&platform::gate())
  }

  #[inline]
  #[must_use]
  pub const fn is_simd(self) -> bool {
    !matches!(self, Self::Scalar)
  }
}

impl fmt::Display for VectorTier {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_ordering() {
    assert!(VectorTier::Scalar < VectorTier::V128);
    assert!(VectorTier::V128 < VectorTier::V256);
    assert!(VectorTier::V256 < VectorTier::V512);
    for (i, tier) in VectorTier::ALL.iter().enumerate() {
      assert_eq!(tier.as_u8() as usize, i);
    }
  }

  #[test]
  fn tier_names() {
    assert_eq!(VectorTier::Scalar.name(), "scalar");
    assert_eq!(VectorTier::V256.name(), "v256");
    assert_eq!(VectorTier::V512.byte_width(), 64);
  }

  #[test]
  fn widest_accelerated_wins() {
    let mut w = VectorWidths::PORTABLE;
    assert_eq!(VectorTier::from_widths(&w), VectorTier::Scalar);
    w.vector128_accelerated = true;
    assert_eq!(VectorTier::from_widths(&w), VectorTier::V128);
    w.vector256_accelerated = true;
    assert_eq!(VectorTier::from_widths(&w), VectorTier::V256);
    w.vector512_accelerated = true;
    assert_eq!(VectorTier::from_widths(&w), VectorTier::V512);
  }

  #[test]
  fn portable_gate_is_scalar() {
    assert_eq!(VectorTier::from_gate(&Gate::portable()), VectorTier::Scalar);
    assert!(!VectorTier::Scalar.is_simd());
  }
}

//! Vector width selection.

use crate::{
  caps::Arch,
  hardware::{Hardware, Vendor},
  isa::{Isa, IsaSet},
  knobs::Knobs,
};

/// Vector sizes derived alongside the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VectorWidths {
  /// Widest vector the runtime prefers to use, in bytes.
  pub preferred_vector_byte_length: u32,
  /// Natural size of a variable-width vector, in bytes.
  pub vector_t_byte_length: u32,
  pub vector64_accelerated: bool,
  pub vector128_accelerated: bool,
  pub vector256_accelerated: bool,
  pub vector512_accelerated: bool,
}

impl Default for VectorWidths {
  fn default() -> Self {
    Self::PORTABLE
  }
}

impl VectorWidths {
  /// No acceleration, 16-byte natural vectors.
  pub const PORTABLE: Self = Self {
    preferred_vector_byte_length: 16,
    vector_t_byte_length: 16,
    vector64_accelerated: false,
    vector128_accelerated: false,
    vector256_accelerated: false,
    vector512_accelerated: false,
  };

  /// Derive widths from the resolved capability set.
  #[must_use]
  pub fn resolve(hardware: &Hardware, enabled: IsaSet, knobs: &Knobs) -> Self {
    if !hardware.arch.is_x86() {
      let neon = hardware.arch == Arch::Aarch64 && enabled.contains(Isa::AdvSimd);
      return Self {
        vector64_accelerated: neon,
        vector128_accelerated: neon,
        ..Self::PORTABLE
      };
    }

    let avx512 = enabled.contains(Isa::Avx512F);
    let avx2 = enabled.contains(Isa::Avx2);

    let preferred = match knobs.preferred_vector_bit_width() {
      0 if !avx512 || is_throttling(hardware) => 32,
      0 => 64,
      bits => bits / 8,
    };

    let max = knobs.max_vector_t_bit_width();
    let vector_t = if max >= 512 && avx512 {
      preferred.min(64)
    } else if (max == 0 || max >= 256) && avx2 {
      preferred.min(32)
    } else {
      16
    };

    Self {
      preferred_vector_byte_length: preferred,
      vector_t_byte_length: vector_t,
      vector64_accelerated: false,
      vector128_accelerated: enabled.contains(Isa::Sse2),
      vector256_accelerated: avx2 && preferred >= 32,
      vector512_accelerated: avx512 && preferred >= 64,
    }
  }

  /// Same as [`vector128_accelerated`](Self::vector128_accelerated).
  #[inline]
  #[must_use]
  pub const fn vector_accelerated(&self) -> bool {
    self.vector128_accelerated
  }

  /// Lanes of `T` in a natural-width vector.
  #[inline]
  #[must_use]
  pub const fn lane_count<T>(&self) -> usize {
    match core::mem::size_of::<T>() {
      0 => 0,
      size => self.vector_t_byte_length as usize / size,
    }
  }
}

/// Intel parts that downclock under sustained 512-bit load.
///
/// Skylake-SP, Cascade Lake, Cooper Lake (model 0x55) and Cannon Lake (0x66).
#[must_use]
pub const fn is_throttling(hardware: &Hardware) -> bool {
  let sig = hardware.signature;
  matches!(hardware.vendor, Vendor::Intel)
    && sig.family == 6
    && ((sig.extended_model == 5 && sig.model == 5) || (sig.extended_model == 6 && sig.model == 6))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{caps::Caps, hardware::Signature, knobs::Knob};

  fn x86(vendor: Vendor, eax: u32) -> Hardware {
    Hardware {
      arch: Arch::X86_64,
      caps: Caps::NONE,
      vendor,
      signature: Signature::from_eax(eax),
    }
  }

  fn set(isas: &[Isa]) -> IsaSet {
    isas.iter().fold(IsaSet::NONE, |s, i| s.with(*i))
  }

  const AVX2: [Isa; 3] = [Isa::Sse, Isa::Sse2, Isa::Avx2];
  const AVX512: [Isa; 4] = [Isa::Sse, Isa::Sse2, Isa::Avx2, Isa::Avx512F];

  #[test]
  fn throttling_deny_list() {
    assert!(is_throttling(&x86(Vendor::Intel, 0x0005_0654)));
    assert!(is_throttling(&x86(Vendor::Intel, 0x0006_0663)));
    assert!(!is_throttling(&x86(Vendor::Intel, 0x0006_06A6)));
    assert!(!is_throttling(&x86(Vendor::Amd, 0x0005_0654)));
    assert!(!is_throttling(&x86(Vendor::Intel, 0x0005_0F54)));
  }

  #[test]
  fn preferred_defaults() {
    let knobs = Knobs::all_enabled();
    let skx = x86(Vendor::Intel, 0x0005_0654);
    let icx = x86(Vendor::Intel, 0x0006_06A6);

    assert_eq!(VectorWidths::resolve(&icx, set(&AVX512), &knobs).preferred_vector_byte_length, 64);
    assert_eq!(VectorWidths::resolve(&skx, set(&AVX512), &knobs).preferred_vector_byte_length, 32);
    assert_eq!(VectorWidths::resolve(&icx, set(&AVX2), &knobs).preferred_vector_byte_length, 32);
  }

  #[test]
  fn preferred_override_wins() {
    let skx = x86(Vendor::Intel, 0x0005_0654);
    let knobs = Knobs::all_enabled().with_preferred_vector_bit_width(512);
    let w = VectorWidths::resolve(&skx, set(&AVX512), &knobs);
    assert_eq!(w.preferred_vector_byte_length, 64);
    assert!(w.vector512_accelerated);

    let knobs = Knobs::all_enabled().with_preferred_vector_bit_width(200);
    let w = VectorWidths::resolve(&skx, set(&AVX512), &knobs);
    assert_eq!(w.preferred_vector_byte_length, 16);
    assert!(!w.vector256_accelerated);
    assert!(!w.vector512_accelerated);
  }

  #[test]
  fn vector_t_rules() {
    let icx = x86(Vendor::Intel, 0x0006_06A6);
    let all = Knobs::all_enabled();

    assert_eq!(VectorWidths::resolve(&icx, set(&AVX512), &all).vector_t_byte_length, 32);
    assert_eq!(VectorWidths::resolve(&icx, set(&AVX2), &all).vector_t_byte_length, 32);
    assert_eq!(VectorWidths::resolve(&icx, set(&[Isa::Sse2]), &all).vector_t_byte_length, 16);

    let max512 = all.with_max_vector_t_bit_width(512);
    assert_eq!(VectorWidths::resolve(&icx, set(&AVX512), &max512).vector_t_byte_length, 64);

    let max128 = all.with_max_vector_t_bit_width(128);
    assert_eq!(VectorWidths::resolve(&icx, set(&AVX512), &max128).vector_t_byte_length, 16);

    let skx = x86(Vendor::Intel, 0x0005_0654);
    assert_eq!(VectorWidths::resolve(&skx, set(&AVX512), &max512).vector_t_byte_length, 32);
  }

  #[test]
  fn aarch64_widths() {
    let hw = Hardware {
      arch: Arch::Aarch64,
      ..Hardware::NONE
    };
    let w = VectorWidths::resolve(&hw, set(&[Isa::ArmBase, Isa::AdvSimd]), &Knobs::all_enabled());
    assert!(w.vector64_accelerated && w.vector128_accelerated && w.vector_accelerated());
    assert!(!w.vector256_accelerated);
    assert_eq!(w.preferred_vector_byte_length, 16);

    let w = VectorWidths::resolve(&hw, IsaSet::NONE, &Knobs::all_enabled().with_disabled(Knob::AdvSimd));
    assert_eq!(w, VectorWidths::PORTABLE);
  }

  #[test]
  fn lane_counts() {
    let w = VectorWidths {
      vector_t_byte_length: 32,
      ..VectorWidths::PORTABLE
    };
    assert_eq!(w.lane_count::<f32>(), 8);
    assert_eq!(w.lane_count::<f64>(), 4);
    assert_eq!(w.lane_count::<u8>(), 32);
    assert_eq!(w.lane_count::<()>(), 0);
  }
}

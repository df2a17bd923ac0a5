//! Raw hardware feature bits.
//!
//! [`Caps`] answers "what did the CPU report?", before any knob, OS policy or
//! hierarchy rule is applied. The gate in [`crate::gate`] turns these raw bits
//! into the capabilities code is actually allowed to use.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// Raw hardware features: a 128-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 2]);

impl Caps {
  /// Empty feature set.
  pub const NONE: Self = Self([0; 2]);

  /// Create a feature set from raw words.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 2]) -> Self {
    Self(words)
  }

  /// Access the raw underlying words.
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 2] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0] && (self.0[1] & required.0[1]) == required.0[1]
  }

  /// Union of two feature sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([self.0[0] | other.0[0], self.0[1] | other.0[1]])
  }

  /// Intersection of two feature sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([self.0[0] & other.0[0], self.0[1] & other.0[1]])
  }

  /// Features in `self` that are not in `other`.
  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self([self.0[0] & !other.0[0], self.0[1] & !other.0[1]])
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0
  }

  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones()
  }

  /// Create a feature set with a single bit set. Bit must be 0-127.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let mut words = [0u64; 2];
    if bit < 64 {
      words[0] = 1u64 << bit;
    } else {
      words[1] = 1u64 << (bit % 64);
    }
    Self(words)
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    let word = if bit < 64 { self.0[0] } else { self.0[1] };
    (word & (1u64 << (bit % 64))) != 0
  }

  /// Set `feature` when `cond` holds.
  #[inline]
  #[must_use]
  pub(crate) const fn with_if(self, cond: bool, feature: Self) -> Self {
    if cond { self.union(feature) } else { self }
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture
// ─────────────────────────────────────────────────────────────────────────────

/// CPU architecture the gate was evaluated for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  X86,
  Aarch64,
  /// Anything without a capability table; only the scalar path is legal.
  #[default]
  Other,
}

impl Arch {
  /// Architecture of the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(target_arch = "x86_64") {
      Self::X86_64
    } else if cfg!(target_arch = "x86") {
      Self::X86
    } else if cfg!(target_arch = "aarch64") {
      Self::Aarch64
    } else {
      Self::Other
    }
  }

  #[inline]
  #[must_use]
  pub const fn is_x86(self) -> bool {
    matches!(self, Self::X86_64 | Self::X86)
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::X86 => "x86",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 raw CPUID feature bits.
pub mod x86 {
  use super::Caps;

  /// CPUID is usable at all (leaf 0 reports max leaf >= 1).
  pub const X86BASE: Caps = Caps::bit(0);

  // ─── SSE Family ───
  pub const SSE: Caps = Caps::bit(1);
  pub const SSE2: Caps = Caps::bit(2);
  pub const SSE3: Caps = Caps::bit(3);
  pub const SSSE3: Caps = Caps::bit(4);
  pub const SSE41: Caps = Caps::bit(5);
  pub const SSE42: Caps = Caps::bit(6);
  pub const POPCNT: Caps = Caps::bit(7);

  // ─── Crypto ───
  pub const AES: Caps = Caps::bit(8);
  pub const PCLMULQDQ: Caps = Caps::bit(9);

  // ─── AVX Family (require OS YMM state) ───
  pub const AVX: Caps = Caps::bit(10);
  pub const FMA: Caps = Caps::bit(11);
  pub const AVX2: Caps = Caps::bit(12);
  pub const AVXVNNI: Caps = Caps::bit(24);

  // ─── Bit Manipulation ───
  pub const BMI1: Caps = Caps::bit(13);
  pub const BMI2: Caps = Caps::bit(14);
  pub const LZCNT: Caps = Caps::bit(26);

  // ─── AVX-512 Family (require OS ZMM/opmask state) ───
  pub const AVX512F: Caps = Caps::bit(15);
  pub const AVX512VL: Caps = Caps::bit(16);
  pub const AVX512BW: Caps = Caps::bit(17);
  pub const AVX512CD: Caps = Caps::bit(18);
  pub const AVX512DQ: Caps = Caps::bit(19);
  pub const AVX512VBMI: Caps = Caps::bit(20);
  pub const AVX10_1: Caps = Caps::bit(25);

  // ─── Vector Extensions ───
  pub const GFNI: Caps = Caps::bit(21);
  pub const VPCLMULQDQ: Caps = Caps::bit(22);

  // ─── Misc ───
  pub const SERIALIZE: Caps = Caps::bit(23);

  // ─── Combined Masks ───

  /// SSE + SSE2, the x86 128-bit baseline.
  pub const BASELINE: Caps = Caps([SSE.0[0] | SSE2.0[0], 0]);

  /// The AVX-512 foundation group reported together by every AVX-512 part.
  pub const AVX512_GROUP: Caps = Caps([
    AVX512F.0[0] | AVX512VL.0[0] | AVX512BW.0[0] | AVX512CD.0[0] | AVX512DQ.0[0],
    0,
  ]);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 raw feature bits.
pub mod aarch64 {
  use super::Caps;

  /// Always set on aarch64.
  pub const ARMBASE: Caps = Caps::bit(64);
  /// NEON / Advanced SIMD. Baseline on every aarch64 target Rust supports.
  pub const ADVSIMD: Caps = Caps::bit(65);
  pub const AES: Caps = Caps::bit(66);
  pub const CRC32: Caps = Caps::bit(67);
  pub const DP: Caps = Caps::bit(68); // dotprod
  pub const RDM: Caps = Caps::bit(69);
  pub const SHA1: Caps = Caps::bit(70);
  pub const SHA256: Caps = Caps::bit(71);
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature Name Lookup (for diagnostics)
// ─────────────────────────────────────────────────────────────────────────────

/// Feature name entry: (bit_index, name).
type FeatureEntry = (u8, &'static str);

const X86_FEATURES: &[FeatureEntry] = &[
  (0, "x86base"),
  (1, "sse"),
  (2, "sse2"),
  (3, "sse3"),
  (4, "ssse3"),
  (5, "sse4.1"),
  (6, "sse4.2"),
  (7, "popcnt"),
  (8, "aes"),
  (9, "pclmulqdq"),
  (10, "avx"),
  (11, "fma"),
  (12, "avx2"),
  (13, "bmi1"),
  (14, "bmi2"),
  (15, "avx512f"),
  (16, "avx512vl"),
  (17, "avx512bw"),
  (18, "avx512cd"),
  (19, "avx512dq"),
  (20, "avx512vbmi"),
  (21, "gfni"),
  (22, "vpclmulqdq"),
  (23, "serialize"),
  (24, "avxvnni"),
  (25, "avx10.1"),
  (26, "lzcnt"),
];

const AARCH64_FEATURES: &[FeatureEntry] = &[
  (64, "armbase"),
  (65, "asimd"),
  (66, "aes"),
  (67, "crc"),
  (68, "dotprod"),
  (69, "rdm"),
  (70, "sha1"),
  (71, "sha2"),
];

impl Caps {
  /// Returns an iterator over the names of all set feature bits.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    X86_FEATURES
      .iter()
      .chain(AARCH64_FEATURES.iter())
      .filter_map(move |(bit, name)| if self.has_bit(*bit) { Some(*name) } else { None })
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str("Caps(")?;
    let mut iter = self.feature_names().peekable();
    if iter.peek().is_none() {
      return f.write_str("none)");
    }
    let mut first = true;
    for name in iter {
      if !first {
        f.write_str(", ")?;
      }
      first = false;
      f.write_str(name)?;
    }
    f.write_str(")")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses filesystem for failure persistence, which Miri doesn't support.
// ─────────────────────────────────────────────────────────────────────────────

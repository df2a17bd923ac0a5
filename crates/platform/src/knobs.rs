//! Configuration knobs that can switch capabilities off.
//!
//! Each [`Knob`] maps to one `LANES_ENABLE_<NAME>` environment variable. A knob
//! is enabled unless its variable parses to zero. Two width limits ride along:
//! `LANES_PREFERRED_VECTOR_BIT_WIDTH` and `LANES_MAX_VECTOR_T_BIT_WIDTH`.
//!
//! The environment is read once per process. Everything else builds [`Knobs`]
//! programmatically or through [`Knobs::from_lookup`].

/// A named switch guarding one or more capabilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Knob {
  HwIntrinsic = 0,
  Sse,
  Sse2,
  Aes,
  Pclmulqdq,
  Sse3_4,
  Sse3,
  Ssse3,
  Sse41,
  Sse42,
  Popcnt,
  Avx,
  Fma,
  Avx2,
  Bmi1,
  Bmi2,
  Avx512F,
  Avx512FVl,
  Avx512Bw,
  Avx512BwVl,
  Avx512Cd,
  Avx512CdVl,
  Avx512Dq,
  Avx512DqVl,
  Avx512Vbmi,
  Avx512VbmiVl,
  Serialize,
  Gfni,
  Vpclmulqdq,
  AvxVnni,
  Avx10v1,
  Lzcnt,
  AdvSimd,
  ArmAes,
  ArmCrc32,
  ArmDp,
  ArmRdm,
  ArmSha1,
  ArmSha256,
}

impl Knob {
  pub const ALL: [Self; 39] = [
    Self::HwIntrinsic,
    Self::Sse,
    Self::Sse2,
    Self::Aes,
    Self::Pclmulqdq,
    Self::Sse3_4,
    Self::Sse3,
    Self::Ssse3,
    Self::Sse41,
    Self::Sse42,
    Self::Popcnt,
    Self::Avx,
    Self::Fma,
    Self::Avx2,
    Self::Bmi1,
    Self::Bmi2,
    Self::Avx512F,
    Self::Avx512FVl,
    Self::Avx512Bw,
    Self::Avx512BwVl,
    Self::Avx512Cd,
    Self::Avx512CdVl,
    Self::Avx512Dq,
    Self::Avx512DqVl,
    Self::Avx512Vbmi,
    Self::Avx512VbmiVl,
    Self::Serialize,
    Self::Gfni,
    Self::Vpclmulqdq,
    Self::AvxVnni,
    Self::Avx10v1,
    Self::Lzcnt,
    Self::AdvSimd,
    Self::ArmAes,
    Self::ArmCrc32,
    Self::ArmDp,
    Self::ArmRdm,
    Self::ArmSha1,
    Self::ArmSha256,
  ];

  /// Knob name, the suffix of its environment variable.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::HwIntrinsic => "HWINTRINSIC",
      Self::Sse => "SSE",
      Self::Sse2 => "SSE2",
      Self::Aes => "AES",
      Self::Pclmulqdq => "PCLMULQDQ",
      Self::Sse3_4 => "SSE3_4",
      Self::Sse3 => "SSE3",
      Self::Ssse3 => "SSSE3",
      Self::Sse41 => "SSE41",
      Self::Sse42 => "SSE42",
      Self::Popcnt => "POPCNT",
      Self::Avx => "AVX",
      Self::Fma => "FMA",
      Self::Avx2 => "AVX2",
      Self::Bmi1 => "BMI1",
      Self::Bmi2 => "BMI2",
      Self::Avx512F => "AVX512F",
      Self::Avx512FVl => "AVX512F_VL",
      Self::Avx512Bw => "AVX512BW",
      Self::Avx512BwVl => "AVX512BW_VL",
      Self::Avx512Cd => "AVX512CD",
      Self::Avx512CdVl => "AVX512CD_VL",
      Self::Avx512Dq => "AVX512DQ",
      Self::Avx512DqVl => "AVX512DQ_VL",
      Self::Avx512Vbmi => "AVX512VBMI",
      Self::Avx512VbmiVl => "AVX512VBMI_VL",
      Self::Serialize => "SERIALIZE",
      Self::Gfni => "GFNI",
      Self::Vpclmulqdq => "VPCLMULQDQ",
      Self::AvxVnni => "AVXVNNI",
      Self::Avx10v1 => "AVX10V1",
      Self::Lzcnt => "LZCNT",
      Self::AdvSimd => "ADVSIMD",
      Self::ArmAes => "ARM_AES",
      Self::ArmCrc32 => "ARM_CRC32",
      Self::ArmDp => "ARM_DP",
      Self::ArmRdm => "ARM_RDM",
      Self::ArmSha1 => "ARM_SHA1",
      Self::ArmSha256 => "ARM_SHA256",
    }
  }

  #[inline]
  const fn mask(self) -> u64 {
    1 << self as u8
  }
}

/// Prefix of every knob variable.
pub const ENV_PREFIX: &str = "LANES_ENABLE_";
/// Preferred vector width override, in bits.
pub const ENV_PREFERRED_VECTOR_BIT_WIDTH: &str = "LANES_PREFERRED_VECTOR_BIT_WIDTH";
/// Cap on the natural vector width, in bits.
pub const ENV_MAX_VECTOR_T_BIT_WIDTH: &str = "LANES_MAX_VECTOR_T_BIT_WIDTH";

/// Resolved knob values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Knobs {
  disabled: u64,
  preferred_vector_bit_width: u32,
  max_vector_t_bit_width: u32,
}

impl Knobs {
  /// Every knob enabled, no width limits.
  #[must_use]
  pub const fn all_enabled() -> Self {
    Self {
      disabled: 0,
      preferred_vector_bit_width: 0,
      max_vector_t_bit_width: 0,
    }
  }

  #[inline]
  #[must_use]
  pub const fn with_disabled(mut self, knob: Knob) -> Self {
    self.disabled |= knob.mask();
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_enabled(mut self, knob: Knob) -> Self {
    self.disabled &= !knob.mask();
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_preferred_vector_bit_width(mut self, bits: u32) -> Self {
    self.preferred_vector_bit_width = bits;
    self
  }

  #[inline]
  #[must_use]
  pub const fn with_max_vector_t_bit_width(mut self, bits: u32) -> Self {
    self.max_vector_t_bit_width = bits;
    self
  }

  #[inline]
  #[must_use]
  pub const fn is_enabled(&self, knob: Knob) -> bool {
    self.disabled & knob.mask() == 0
  }

  /// True when every knob in `knobs` is enabled.
  #[must_use]
  pub fn all(&self, knobs: &[Knob]) -> bool {
    knobs.iter().all(|k| self.is_enabled(*k))
  }

  /// Preferred width override rounded down to a multiple of 128; 0 when unset.
  #[inline]
  #[must_use]
  pub const fn preferred_vector_bit_width(&self) -> u32 {
    round_to_128(self.preferred_vector_bit_width)
  }

  /// Natural width cap rounded down to a multiple of 128; 0 when unset.
  #[inline]
  #[must_use]
  pub const fn max_vector_t_bit_width(&self) -> u32 {
    round_to_128(self.max_vector_t_bit_width)
  }

  /// Build from a variable lookup, such as `std::env::var`.
  ///
  /// Missing, empty or unparsable values fall back to the defaults.
  pub fn from_lookup<F, S>(mut lookup: F) -> Self
  where
    F: FnMut(&str) -> Option<S>,
    S: AsRef<str>,
  {
    let mut knobs = Self::all_enabled();
    let mut name = NameBuf::new();

    for knob in Knob::ALL {
      let Some(var) = name.join(ENV_PREFIX, knob.name()) else { continue };
      let value = lookup(var).and_then(|v| parse_int(v.as_ref()));
      if value == Some(0) {
        knobs = knobs.with_disabled(knob);
      }
    }

    let width = |v: Option<S>| v.and_then(|v| parse_int(v.as_ref())).map_or(0, clamp_width);
    knobs.preferred_vector_bit_width = width(lookup(ENV_PREFERRED_VECTOR_BIT_WIDTH));
    knobs.max_vector_t_bit_width = width(lookup(ENV_MAX_VECTOR_T_BIT_WIDTH));
    knobs
  }

  /// Knobs from the process environment, read once.
  #[cfg(feature = "std")]
  #[must_use]
  pub fn from_env() -> Self {
    use std::sync::OnceLock;
    static KNOBS: OnceLock<Knobs> = OnceLock::new();
    *KNOBS.get_or_init(|| Self::from_lookup(|name| std::env::var(name).ok()))
  }

  /// Without `std` there is no environment; every knob is enabled.
  #[cfg(not(feature = "std"))]
  #[must_use]
  pub fn from_env() -> Self {
    Self::all_enabled()
  }
}

#[inline]
const fn round_to_128(bits: u32) -> u32 {
  (bits / 128) * 128
}

fn clamp_width(v: i64) -> u32 {
  u32::try_from(v).unwrap_or(0)
}

fn parse_int(value: &str) -> Option<i64> {
  let value = value.trim();
  if value.is_empty() {
    return None;
  }
  value.parse::<i64>().ok()
}

/// Stack buffer for `LANES_ENABLE_<KNOB>` names.
struct NameBuf {
  bytes: [u8; 32],
}

impl NameBuf {
  const fn new() -> Self {
    Self { bytes: [0; 32] }
  }

  /// `prefix` followed by `suffix`, or `None` if it does not fit.
  fn join(&mut self, prefix: &str, suffix: &str) -> Option<&str> {
    let buf = self.bytes.get_mut(..prefix.len() + suffix.len())?;
    let (head, tail) = buf.split_at_mut(prefix.len());
    head.copy_from_slice(prefix.as_bytes());
    tail.copy_from_slice(suffix.as_bytes());
    core::str::from_utf8(buf).ok()
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{collections::BTreeMap, string::String};

  use super::*;

  fn lookup(vars: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
    let map: BTreeMap<String, String> = vars.iter().map(|(k, v)| ((*k).into(), (*v).into())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_are_all_enabled() {
    let knobs = Knobs::from_lookup(lookup(&[]));
    assert_eq!(knobs, Knobs::all_enabled());
    for knob in Knob::ALL {
      assert!(knobs.is_enabled(knob), "{}", knob.name());
    }
  }

  #[test]
  fn zero_disables_nonzero_enables() {
    let knobs = Knobs::from_lookup(lookup(&[
      ("LANES_ENABLE_AVX2", "0"),
      ("LANES_ENABLE_SSE3_4", " 0 "),
      ("LANES_ENABLE_FMA", "7"),
      ("LANES_ENABLE_ARM_SHA256", "-1"),
    ]));
    assert!(!knobs.is_enabled(Knob::Avx2));
    assert!(!knobs.is_enabled(Knob::Sse3_4));
    assert!(knobs.is_enabled(Knob::Fma));
    assert!(knobs.is_enabled(Knob::ArmSha256));
  }

  #[test]
  fn unparsable_and_empty_fall_back() {
    let knobs = Knobs::from_lookup(lookup(&[
      ("LANES_ENABLE_AVX", ""),
      ("LANES_ENABLE_AVX2", "off"),
      ("LANES_PREFERRED_VECTOR_BIT_WIDTH", "wide"),
      ("LANES_MAX_VECTOR_T_BIT_WIDTH", "-256"),
    ]));
    assert_eq!(knobs, Knobs::all_enabled());
  }

  #[test]
  fn unknown_names_are_ignored() {
    let knobs = Knobs::from_lookup(lookup(&[("LANES_ENABLE_AVX9000", "0"), ("LANES_ENABLE_avx2", "0")]));
    assert_eq!(knobs, Knobs::all_enabled());
  }

  #[test]
  fn widths_round_down_to_128() {
    let knobs = Knobs::from_lookup(lookup(&[
      ("LANES_PREFERRED_VECTOR_BIT_WIDTH", "300"),
      ("LANES_MAX_VECTOR_T_BIT_WIDTH", "127"),
    ]));
    assert_eq!(knobs.preferred_vector_bit_width(), 256);
    assert_eq!(knobs.max_vector_t_bit_width(), 0);

    let built = Knobs::all_enabled().with_preferred_vector_bit_width(640);
    assert_eq!(built.preferred_vector_bit_width(), 640);
  }

  #[test]
  fn builders_toggle() {
    let knobs = Knobs::all_enabled().with_disabled(Knob::Avx).with_disabled(Knob::Fma);
    assert!(!knobs.all(&[Knob::Avx]));
    assert!(!knobs.all(&[Knob::Sse, Knob::Fma]));
    assert!(knobs.all(&[Knob::Sse, Knob::Sse2]));
    assert!(knobs.with_enabled(Knob::Avx).is_enabled(Knob::Avx));
  }

  #[test]
  fn knob_names_are_unique_and_fit() {
    for (i, a) in Knob::ALL.iter().enumerate() {
      assert_eq!(*a as usize, i);
      assert!(ENV_PREFIX.len() + a.name().len() <= 32);
      for b in &Knob::ALL[i + 1..] {
        assert_ne!(a.name(), b.name());
      }
    }
  }

  #[test]
  fn join_builds_variable_names() {
    let mut buf = NameBuf::new();
    assert_eq!(buf.join(ENV_PREFIX, Knob::Avx512VbmiVl.name()), Some("LANES_ENABLE_AVX512VBMI_VL"));
    assert_eq!(buf.join(ENV_PREFIX, "SSE"), Some("LANES_ENABLE_SSE"));
    assert_eq!(buf.join(ENV_PREFIX, "ABCDEFGHIJKLMNOPQRSTU"), None);
  }

  #[test]
  fn every_knob_is_looked_up_by_its_variable() {
    let mut seen = alloc::vec::Vec::new();
    let knobs = Knobs::from_lookup(|name: &str| {
      seen.push(String::from(name));
      (name == "LANES_ENABLE_ARM_SHA256").then_some("0")
    });
    assert!(!knobs.is_enabled(Knob::ArmSha256));
    assert!(knobs.is_enabled(Knob::ArmSha1));
    for knob in Knob::ALL {
      let var = alloc::format!("{ENV_PREFIX}{}", knob.name());
      assert!(seen.contains(&var), "{var} never read");
    }
    assert_eq!(seen.len(), Knob::ALL.len() + 2);
  }
}

//! Name-to-getter table for every gated capability.
//!
//! Each entry pairs a symbolic name (`"SSE2"`, `"AVX512F_VL"`, `"ADVSIMD"`) with
//! a getter that reads the process-wide gate. Lookups ignore ASCII case.

use crate::isa::Isa;

/// Reads one capability from [`crate::gate()`].
pub type Getter = fn() -> bool;

/// One registry row.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
  pub name: &'static str,
  pub isa: Isa,
  pub getter: Getter,
}

macro_rules! registry {
  ($($isa:ident => $getter:ident),+ $(,)?) => {
    $(
      fn $getter() -> bool {
        crate::gate().is_enabled(Isa::$isa)
      }
    )+

    static ENTRIES: [Entry; Isa::COUNT] = [
      $(Entry { name: Isa::$isa.name(), isa: Isa::$isa, getter: $getter },)+
    ];
  };
}

registry! {
  X86Base => x86_base,
  Sse => sse,
  Sse2 => sse2,
  Aes => aes,
  Pclmulqdq => pclmulqdq,
  Sse3 => sse3,
  Ssse3 => ssse3,
  Sse41 => sse41,
  Sse42 => sse42,
  Popcnt => popcnt,
  Avx => avx,
  Fma => fma,
  Avx2 => avx2,
  Bmi1 => bmi1,
  Bmi2 => bmi2,
  Avx512F => avx512f,
  Avx512FVl => avx512f_vl,
  Avx512Bw => avx512bw,
  Avx512BwVl => avx512bw_vl,
  Avx512Cd => avx512cd,
  Avx512CdVl => avx512cd_vl,
  Avx512Dq => avx512dq,
  Avx512DqVl => avx512dq_vl,
  Avx512Vbmi => avx512vbmi,
  Avx512VbmiVl => avx512vbmi_vl,
  Serialize => serialize,
  Gfni => gfni,
  GfniV256 => gfni_v256,
  GfniV512 => gfni_v512,
  VpclmulqdqV256 => vpclmulqdq_v256,
  VpclmulqdqV512 => vpclmulqdq_v512,
  AvxVnni => avxvnni,
  Avx10v1 => avx10v1,
  Avx10v1V512 => avx10v1_v512,
  Lzcnt => lzcnt,
  ArmBase => arm_base,
  AdvSimd => adv_simd,
  ArmAes => arm_aes,
  ArmCrc32 => arm_crc32,
  ArmDp => arm_dp,
  ArmRdm => arm_rdm,
  ArmSha1 => arm_sha1,
  ArmSha256 => arm_sha256,
}

/// All rows, in evaluation order.
#[inline]
#[must_use]
pub fn entries() -> &'static [Entry] {
  &ENTRIES
}

/// Getter for `name`, if it names a capability.
#[must_use]
pub fn lookup(name: &str) -> Option<Getter> {
  ENTRIES
    .iter()
    .find(|e| e.name.eq_ignore_ascii_case(name))
    .map(|e| e.getter)
}

/// Whether `name` is enabled in the process-wide gate; `None` for unknown names.
#[must_use]
pub fn is_supported(name: &str) -> Option<bool> {
  lookup(name).map(|getter| getter())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rows_match_capabilities() {
    assert_eq!(entries().len(), Isa::COUNT);
    for (entry, isa) in entries().iter().zip(Isa::ALL) {
      assert_eq!(entry.isa, isa);
      assert_eq!(entry.name, isa.name());
    }
  }

  #[test]
  fn lookup_ignores_case() {
    assert!(lookup("SSE2").is_some());
    assert!(lookup("sse2").is_some());
    assert!(lookup("Avx512F_vl").is_some());
    assert!(lookup("NEON").is_none());
    assert_eq!(is_supported(""), None);
  }

  #[test]
  fn getters_agree_with_gate() {
    let gate = crate::gate();
    for entry in entries() {
      assert_eq!((entry.getter)(), gate.is_enabled(entry.isa), "{}", entry.name);
      assert_eq!(is_supported(entry.name), Some(gate.is_enabled(entry.isa)));
    }
  }
}

//! Decoding raw CPU queries into a [`Hardware`] description.
//!
//! [`Hardware`] is everything the gate needs to know about the machine:
//! architecture, raw feature bits, vendor and processor signature. It is built
//! from a [`CpuidSource`] on x86 and from the OS feature probe on aarch64.

use crate::{
  caps::{Arch, Caps, aarch64, x86},
  cpuid::{CpuidSource, bit},
};

/// CPU vendor, from CPUID leaf 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Vendor {
  Intel,
  Amd,
  /// Hypervisor-provided "VirtualCPU " vendor string.
  Virtual,
  #[default]
  Other,
}

impl Vendor {
  /// Classify the vendor string spread over EBX, EDX, ECX.
  #[must_use]
  pub const fn from_leaf0(ebx: u32, ecx: u32, edx: u32) -> Self {
    match (ebx, ecx, edx) {
      (0x756E_6547, 0x6C65_746E, 0x4965_6E69) => Self::Intel,   // "GenuineIntel"
      (0x6874_7541, 0x444D_4163, 0x6974_6E65) => Self::Amd,     // "AuthenticAMD"
      (0x7472_6956, 0x2055_5043, 0x206C_6175) => Self::Virtual, // "VirtualCPU "
      _ => Self::Other,
    }
  }

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Intel => "GenuineIntel",
      Self::Amd => "AuthenticAMD",
      Self::Virtual => "VirtualCPU",
      Self::Other => "unknown",
    }
  }
}

/// Processor signature, from CPUID leaf 1 EAX.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
  pub stepping: u8,
  /// Base model (bits 7:4).
  pub model: u8,
  /// Base family (bits 11:8).
  pub family: u8,
  /// Extended model (bits 19:16).
  pub extended_model: u8,
  /// Extended family (bits 27:20).
  pub extended_family: u8,
}

impl Signature {
  #[must_use]
  pub const fn from_eax(eax: u32) -> Self {
    Self {
      stepping: (eax & 0xF) as u8,
      model: ((eax >> 4) & 0xF) as u8,
      family: ((eax >> 8) & 0xF) as u8,
      extended_model: ((eax >> 16) & 0xF) as u8,
      extended_family: ((eax >> 20) & 0xFF) as u8,
    }
  }

  /// Display family: base family plus extended family.
  #[must_use]
  pub const fn display_family(self) -> u32 {
    self.family as u32 + self.extended_family as u32
  }

  /// Display model: extended model is folded in for families 6 and 15.
  #[must_use]
  pub const fn display_model(self) -> u32 {
    if self.family == 6 || self.family == 15 {
      self.model as u32 + ((self.extended_model as u32) << 4)
    } else {
      self.model as u32
    }
  }
}

/// What the machine reports, before knobs or hierarchy rules are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Hardware {
  pub arch: Arch,
  pub caps: Caps,
  pub vendor: Vendor,
  pub signature: Signature,
}

// XCR0 bits 1-2: XMM + YMM state.
const XCR0_AVX_MASK: u64 = 0x6;
// XCR0 bits 5-7: opmask + ZMM_Hi256 + Hi16_ZMM state.
const XCR0_AVX512_MASK: u64 = 0xE0;

impl Hardware {
  /// No features on an unknown architecture.
  pub const NONE: Self = Self {
    arch: Arch::Other,
    caps: Caps::NONE,
    vendor: Vendor::Other,
    signature: Signature {
      stepping: 0,
      model: 0,
      family: 0,
      extended_model: 0,
      extended_family: 0,
    },
  };

  /// Decode x86 CPUID results.
  ///
  /// Leaf 7 is only queried when the max basic leaf reaches 7, and leaf
  /// 0x80000001 only when the max extended leaf reaches it. AVX-class bits
  /// require OS YMM state in XCR0; AVX-512-class bits additionally require
  /// opmask/ZMM state.
  #[must_use]
  pub fn from_cpuid(arch: Arch, source: &impl CpuidSource) -> Self {
    let leaf0 = source.cpuid(0, 0);
    let max_leaf = leaf0.eax;
    let vendor = Vendor::from_leaf0(leaf0.ebx, leaf0.ecx, leaf0.edx);

    if max_leaf < 1 {
      return Self {
        arch,
        vendor,
        ..Self::NONE
      };
    }

    let leaf1 = source.cpuid(1, 0);
    let signature = Signature::from_eax(leaf1.eax);

    let xcr0 = if bit(leaf1.ecx, 27) { source.xcr0() } else { 0 };
    let os_avx = xcr0 & XCR0_AVX_MASK == XCR0_AVX_MASK;
    let os_avx512 = os_avx && xcr0 & XCR0_AVX512_MASK == XCR0_AVX512_MASK;

    let mut caps = x86::X86BASE
      .with_if(bit(leaf1.edx, 25), x86::SSE)
      .with_if(bit(leaf1.edx, 26), x86::SSE2)
      .with_if(bit(leaf1.ecx, 0), x86::SSE3)
      .with_if(bit(leaf1.ecx, 1), x86::PCLMULQDQ)
      .with_if(bit(leaf1.ecx, 9), x86::SSSE3)
      .with_if(bit(leaf1.ecx, 19), x86::SSE41)
      .with_if(bit(leaf1.ecx, 20), x86::SSE42)
      .with_if(bit(leaf1.ecx, 23), x86::POPCNT)
      .with_if(bit(leaf1.ecx, 25), x86::AES)
      .with_if(os_avx && bit(leaf1.ecx, 28), x86::AVX)
      .with_if(os_avx && bit(leaf1.ecx, 12), x86::FMA);

    if max_leaf >= 7 {
      let leaf7 = source.cpuid(7, 0);
      caps = caps
        .with_if(bit(leaf7.ebx, 3), x86::BMI1)
        .with_if(bit(leaf7.ebx, 8), x86::BMI2)
        .with_if(os_avx && bit(leaf7.ebx, 5), x86::AVX2)
        .with_if(os_avx512 && bit(leaf7.ebx, 16), x86::AVX512F)
        .with_if(os_avx512 && bit(leaf7.ebx, 17), x86::AVX512DQ)
        .with_if(os_avx512 && bit(leaf7.ebx, 28), x86::AVX512CD)
        .with_if(os_avx512 && bit(leaf7.ebx, 30), x86::AVX512BW)
        .with_if(os_avx512 && bit(leaf7.ebx, 31), x86::AVX512VL)
        .with_if(os_avx512 && bit(leaf7.ecx, 1), x86::AVX512VBMI)
        .with_if(bit(leaf7.ecx, 8), x86::GFNI)
        .with_if(os_avx && bit(leaf7.ecx, 10), x86::VPCLMULQDQ)
        .with_if(bit(leaf7.edx, 14), x86::SERIALIZE);

      let leaf7_1 = source.cpuid(7, 1);
      caps = caps
        .with_if(os_avx && bit(leaf7_1.eax, 4), x86::AVXVNNI)
        .with_if(os_avx512 && bit(leaf7_1.edx, 19), x86::AVX10_1);
    }

    let max_ext_leaf = source.cpuid(0x8000_0000, 0).eax;
    if max_ext_leaf >= 0x8000_0001 {
      let ext1 = source.cpuid(0x8000_0001, 0);
      caps = caps.with_if(bit(ext1.ecx, 5), x86::LZCNT);
    }

    Self {
      arch,
      caps,
      vendor,
      signature,
    }
  }

  /// Build aarch64 hardware from a feature probe (`"asimd"`, `"aes"`, ...).
  #[must_use]
  pub fn from_aarch64_probe(probe: impl Fn(&str) -> bool) -> Self {
    let caps = aarch64::ARMBASE
      .with_if(probe("asimd"), aarch64::ADVSIMD)
      .with_if(probe("aes"), aarch64::AES)
      .with_if(probe("crc"), aarch64::CRC32)
      .with_if(probe("dotprod"), aarch64::DP)
      .with_if(probe("rdm"), aarch64::RDM)
      .with_if(probe("sha2"), aarch64::SHA1 | aarch64::SHA256);
    Self {
      arch: Arch::Aarch64,
      caps,
      ..Self::NONE
    }
  }

  /// Probe the machine this process runs on.
  #[must_use]
  pub fn detect() -> Self {
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
      Self::from_cpuid(Arch::current(), &crate::cpuid::NativeCpuid)
    }

    #[cfg(target_arch = "aarch64")]
    {
      Self::from_aarch64_probe(aarch64_probe)
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")))]
    {
      Self::NONE
    }
  }
}

#[cfg(all(target_arch = "aarch64", feature = "std"))]
fn aarch64_probe(name: &str) -> bool {
  match name {
    "asimd" => std::arch::is_aarch64_feature_detected!("neon"),
    "aes" => std::arch::is_aarch64_feature_detected!("aes"),
    "crc" => std::arch::is_aarch64_feature_detected!("crc"),
    "dotprod" => std::arch::is_aarch64_feature_detected!("dotprod"),
    "rdm" => std::arch::is_aarch64_feature_detected!("rdm"),
    "sha2" => std::arch::is_aarch64_feature_detected!("sha2"),
    _ => false,
  }
}

#[cfg(all(target_arch = "aarch64", not(feature = "std")))]
fn aarch64_probe(name: &str) -> bool {
  match name {
    "asimd" => cfg!(target_feature = "neon"),
    "aes" => cfg!(target_feature = "aes"),
    "crc" => cfg!(target_feature = "crc"),
    "dotprod" => cfg!(target_feature = "dotprod"),
    "rdm" => cfg!(target_feature = "rdm"),
    "sha2" => cfg!(target_feature = "sha2"),
    _ => false,
  }
}

//! Gated capabilities and their dependency graph.
//!
//! Every [`Isa`] is one node of a DAG. A node names the raw hardware bits it
//! needs, the knobs that can switch it off, its parents, and optionally the
//! all-or-nothing [`Group`] it belongs to. [`NODES`] lists the nodes in
//! topological order so the gate can resolve the whole graph in one pass.

use crate::{
  caps::{Caps, aarch64, x86},
  knobs::Knob,
};

// ─────────────────────────────────────────────────────────────────────────────
// Capability identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// A gated capability.
///
/// The discriminant is the node's position in [`NODES`] and its bit in
/// [`IsaSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Isa {
  X86Base = 0,
  Sse,
  Sse2,
  Aes,
  Pclmulqdq,
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
  GfniV256,
  GfniV512,
  VpclmulqdqV256,
  VpclmulqdqV512,
  AvxVnni,
  Avx10v1,
  Avx10v1V512,
  Lzcnt,
  ArmBase,
  AdvSimd,
  ArmAes,
  ArmCrc32,
  ArmDp,
  ArmRdm,
  ArmSha1,
  ArmSha256,
}

impl Isa {
  /// Number of capabilities.
  pub const COUNT: usize = 43;

  /// All capabilities in evaluation order.
  pub const ALL: [Self; Self::COUNT] = [
    Self::X86Base,
    Self::Sse,
    Self::Sse2,
    Self::Aes,
    Self::Pclmulqdq,
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
    Self::GfniV256,
    Self::GfniV512,
    Self::VpclmulqdqV256,
    Self::VpclmulqdqV512,
    Self::AvxVnni,
    Self::Avx10v1,
    Self::Avx10v1V512,
    Self::Lzcnt,
    Self::ArmBase,
    Self::AdvSimd,
    Self::ArmAes,
    Self::ArmCrc32,
    Self::ArmDp,
    Self::ArmRdm,
    Self::ArmSha1,
    Self::ArmSha256,
  ];

  #[inline]
  #[must_use]
  pub const fn index(self) -> usize {
    self as usize
  }

  #[inline]
  #[must_use]
  pub fn node(self) -> &'static Node {
    &NODES[self as usize]
  }

  /// Symbolic name, as used by the registry.
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86Base => "X86BASE",
      Self::Sse => "SSE",
      Self::Sse2 => "SSE2",
      Self::Aes => "AES",
      Self::Pclmulqdq => "PCLMULQDQ",
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
      Self::GfniV256 => "GFNI_V256",
      Self::GfniV512 => "GFNI_V512",
      Self::VpclmulqdqV256 => "VPCLMULQDQ_V256",
      Self::VpclmulqdqV512 => "VPCLMULQDQ_V512",
      Self::AvxVnni => "AVXVNNI",
      Self::Avx10v1 => "AVX10V1",
      Self::Avx10v1V512 => "AVX10V1_V512",
      Self::Lzcnt => "LZCNT",
      Self::ArmBase => "ARMBASE",
      Self::AdvSimd => "ADVSIMD",
      Self::ArmAes => "ARM_AES",
      Self::ArmCrc32 => "ARM_CRC32",
      Self::ArmDp => "ARM_DP",
      Self::ArmRdm => "ARM_RDM",
      Self::ArmSha1 => "ARM_SHA1",
      Self::ArmSha256 => "ARM_SHA256",
    }
  }

  /// Look up a capability by symbolic name (ASCII case-insensitive).
  #[must_use]
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|isa| isa.name().eq_ignore_ascii_case(name))
  }
}

impl core::fmt::Display for Isa {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability sets
// ─────────────────────────────────────────────────────────────────────────────

/// A set of [`Isa`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct IsaSet(u64);

impl IsaSet {
  pub const NONE: Self = Self(0);

  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  #[inline]
  #[must_use]
  pub const fn raw(self) -> u64 {
    self.0
  }

  #[inline]
  #[must_use]
  pub const fn of(isa: Isa) -> Self {
    Self(1 << isa as u8)
  }

  #[inline]
  #[must_use]
  pub const fn contains(self, isa: Isa) -> bool {
    self.0 & (1 << isa as u8) != 0
  }

  #[inline]
  #[must_use]
  pub const fn with(self, isa: Isa) -> Self {
    Self(self.0 | (1 << isa as u8))
  }

  #[inline]
  #[must_use]
  pub const fn without(self, isa: Isa) -> Self {
    Self(self.0 & !(1 << isa as u8))
  }

  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  #[inline]
  #[must_use]
  pub const fn difference(self, other: Self) -> Self {
    Self(self.0 & !other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  #[inline]
  #[must_use]
  pub const fn len(self) -> u32 {
    self.0.count_ones()
  }

  /// Members in evaluation order.
  pub fn iter(self) -> impl Iterator<Item = Isa> {
    Isa::ALL.into_iter().filter(move |isa| self.contains(*isa))
  }
}

impl core::fmt::Debug for IsaSet {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.iter().map(Isa::name)).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// All-or-nothing groups
// ─────────────────────────────────────────────────────────────────────────────

/// Sibling sets that are enabled together or not at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Group {
  /// SSE + SSE2.
  Baseline = 0,
  /// AVX512F/BW/CD/DQ and their VL forms.
  Avx512,
  /// AVX512VBMI + AVX512VBMI_VL.
  Avx512Vbmi,
  /// AVX10v1 + AVX10v1_V512.
  Avx10v1,
}

impl Group {
  pub const ALL: [Self; 4] = [Self::Baseline, Self::Avx512, Self::Avx512Vbmi, Self::Avx10v1];

  /// Members of the group.
  #[must_use]
  pub fn members(self) -> IsaSet {
    NODES
      .iter()
      .filter(|node| node.group == Some(self))
      .fold(IsaSet::NONE, |set, node| set.with(node.isa))
  }

  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Baseline => "baseline",
      Self::Avx512 => "avx512",
      Self::Avx512Vbmi => "avx512vbmi",
      Self::Avx10v1 => "avx10v1",
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// The graph
// ─────────────────────────────────────────────────────────────────────────────

/// One capability node.
#[derive(Clone, Copy, Debug)]
pub struct Node {
  pub isa: Isa,
  /// Raw hardware bits that must all be present.
  pub requires: Caps,
  /// Every knob listed must be enabled.
  pub knobs: &'static [Knob],
  /// Every parent must be enabled. Parents precede the node in [`NODES`].
  pub parents: &'static [Isa],
  pub group: Option<Group>,
  /// Forced off on macOS.
  pub macos_disabled: bool,
}

const fn node(isa: Isa, requires: Caps, knobs: &'static [Knob], parents: &'static [Isa]) -> Node {
  Node {
    isa,
    requires,
    knobs,
    parents,
    group: None,
    macos_disabled: false,
  }
}

const fn grouped(
  isa: Isa,
  requires: Caps,
  knobs: &'static [Knob],
  parents: &'static [Isa],
  group: Group,
) -> Node {
  Node {
    isa,
    requires,
    knobs,
    parents,
    group: Some(group),
    macos_disabled: false,
  }
}

const fn avx512(isa: Isa, requires: Caps, knob: &'static [Knob]) -> Node {
  Node {
    macos_disabled: true,
    ..grouped(isa, requires, knob, &[Isa::Avx2, Isa::Fma], Group::Avx512)
  }
}

const fn vl(feature: Caps) -> Caps {
  feature.union(x86::AVX512VL)
}

/// The capability graph in topological order.
pub static NODES: [Node; Isa::COUNT] = [
  node(Isa::X86Base, x86::X86BASE, &[Knob::HwIntrinsic], &[]),
  grouped(Isa::Sse, x86::SSE, &[Knob::Sse], &[Isa::X86Base], Group::Baseline),
  grouped(Isa::Sse2, x86::SSE2, &[Knob::Sse2], &[Isa::X86Base], Group::Baseline),
  node(Isa::Aes, x86::AES, &[Knob::Aes], &[Isa::Sse2]),
  node(Isa::Pclmulqdq, x86::PCLMULQDQ, &[Knob::Pclmulqdq], &[Isa::Sse2]),
  node(Isa::Sse3, x86::SSE3, &[Knob::Sse3_4, Knob::Sse3], &[Isa::Sse2]),
  node(Isa::Ssse3, x86::SSSE3, &[Knob::Ssse3], &[Isa::Sse3]),
  node(Isa::Sse41, x86::SSE41, &[Knob::Sse41], &[Isa::Ssse3]),
  node(Isa::Sse42, x86::SSE42, &[Knob::Sse42], &[Isa::Sse41]),
  node(Isa::Popcnt, x86::POPCNT, &[Knob::Popcnt], &[Isa::Sse42]),
  node(Isa::Avx, x86::AVX, &[Knob::Avx], &[Isa::Sse42]),
  node(Isa::Fma, x86::FMA, &[Knob::Fma], &[Isa::Avx]),
  node(Isa::Avx2, x86::AVX2, &[Knob::Avx2], &[Isa::Avx]),
  node(Isa::Bmi1, x86::BMI1, &[Knob::Bmi1], &[Isa::Avx]),
  node(Isa::Bmi2, x86::BMI2, &[Knob::Bmi2], &[Isa::Avx]),
  avx512(Isa::Avx512F, x86::AVX512F, &[Knob::Avx512F]),
  avx512(Isa::Avx512FVl, vl(x86::AVX512F), &[Knob::Avx512FVl]),
  avx512(Isa::Avx512Bw, x86::AVX512BW, &[Knob::Avx512Bw]),
  avx512(Isa::Avx512BwVl, vl(x86::AVX512BW), &[Knob::Avx512BwVl]),
  avx512(Isa::Avx512Cd, x86::AVX512CD, &[Knob::Avx512Cd]),
  avx512(Isa::Avx512CdVl, vl(x86::AVX512CD), &[Knob::Avx512CdVl]),
  avx512(Isa::Avx512Dq, x86::AVX512DQ, &[Knob::Avx512Dq]),
  avx512(Isa::Avx512DqVl, vl(x86::AVX512DQ), &[Knob::Avx512DqVl]),
  grouped(
    Isa::Avx512Vbmi,
    x86::AVX512VBMI,
    &[Knob::Avx512Vbmi],
    &[Isa::Avx512F],
    Group::Avx512Vbmi,
  ),
  grouped(
    Isa::Avx512VbmiVl,
    vl(x86::AVX512VBMI),
    &[Knob::Avx512VbmiVl],
    &[Isa::Avx512F],
    Group::Avx512Vbmi,
  ),
  node(Isa::Serialize, x86::SERIALIZE, &[Knob::Serialize], &[Isa::X86Base]),
  node(Isa::Gfni, x86::GFNI, &[Knob::Gfni], &[Isa::Sse41]),
  node(Isa::GfniV256, x86::GFNI, &[Knob::Gfni], &[Isa::Gfni, Isa::Avx]),
  node(Isa::GfniV512, x86::GFNI, &[Knob::Gfni], &[Isa::Gfni, Isa::Avx512F]),
  node(
    Isa::VpclmulqdqV256,
    x86::VPCLMULQDQ,
    &[Knob::Vpclmulqdq],
    &[Isa::Avx],
  ),
  node(
    Isa::VpclmulqdqV512,
    x86::VPCLMULQDQ,
    &[Knob::Vpclmulqdq],
    &[Isa::VpclmulqdqV256, Isa::Avx512F],
  ),
  node(Isa::AvxVnni, x86::AVXVNNI, &[Knob::AvxVnni], &[Isa::Avx2]),
  grouped(
    Isa::Avx10v1,
    x86::AVX10_1,
    &[Knob::Avx10v1],
    &[Isa::Avx512Vbmi],
    Group::Avx10v1,
  ),
  grouped(
    Isa::Avx10v1V512,
    x86::AVX10_1,
    &[Knob::Avx10v1],
    &[Isa::Avx512Vbmi],
    Group::Avx10v1,
  ),
  node(Isa::Lzcnt, x86::LZCNT, &[Knob::Lzcnt], &[Isa::X86Base]),
  node(Isa::ArmBase, aarch64::ARMBASE, &[Knob::HwIntrinsic], &[]),
  node(Isa::AdvSimd, aarch64::ADVSIMD, &[Knob::AdvSimd], &[Isa::ArmBase]),
  node(Isa::ArmAes, aarch64::AES, &[Knob::ArmAes], &[Isa::AdvSimd]),
  node(Isa::ArmCrc32, aarch64::CRC32, &[Knob::ArmCrc32], &[Isa::AdvSimd]),
  node(Isa::ArmDp, aarch64::DP, &[Knob::ArmDp], &[Isa::AdvSimd]),
  node(Isa::ArmRdm, aarch64::RDM, &[Knob::ArmRdm], &[Isa::AdvSimd]),
  node(Isa::ArmSha1, aarch64::SHA1, &[Knob::ArmSha1], &[Isa::AdvSimd]),
  node(Isa::ArmSha256, aarch64::SHA256, &[Knob::ArmSha256], &[Isa::AdvSimd]),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;

  #[test]
  fn nodes_are_indexed_by_discriminant() {
    for (i, node) in NODES.iter().enumerate() {
      assert_eq!(node.isa.index(), i, "{} out of place", node.isa);
      assert_eq!(Isa::ALL[i], node.isa);
    }
    assert_eq!(Isa::COUNT, Isa::ALL.len());
    assert!(Isa::COUNT <= 64);
  }

  #[test]
  fn parents_precede_children() {
    for node in &NODES {
      for parent in node.parents {
        assert!(
          parent.index() < node.isa.index(),
          "{} must come after its parent {}",
          node.isa,
          parent.name()
        );
      }
    }
  }

  #[test]
  fn names_are_unique_and_resolvable() {
    for isa in Isa::ALL {
      assert_eq!(Isa::from_name(isa.name()), Some(isa));
      assert_eq!(Isa::from_name(&isa.name().to_ascii_lowercase()), Some(isa));
    }
    assert_eq!(Isa::from_name("avx512f_vl"), Some(Isa::Avx512FVl));
    assert_eq!(Isa::from_name("AVX9000"), None);
  }

  #[test]
  fn group_members() {
    assert_eq!(Group::Baseline.members(), IsaSet::of(Isa::Sse).with(Isa::Sse2));
    assert_eq!(Group::Avx512.members().len(), 8);
    assert!(Group::Avx512.members().contains(Isa::Avx512DqVl));
    assert_eq!(Group::Avx10v1.members().len(), 2);
  }

  #[test]
  fn group_members_share_parents() {
    for group in Group::ALL {
      let mut parents: Option<&[Isa]> = None;
      for isa in group.members().iter() {
        let p = isa.node().parents;
        match parents {
          None => parents = Some(p),
          Some(prev) => assert_eq!(prev, p, "{} parents differ within {}", isa, group.name()),
        }
      }
    }
  }

  #[test]
  fn isa_set_ops() {
    let set = IsaSet::NONE.with(Isa::Avx).with(Isa::Avx2);
    assert!(set.contains(Isa::Avx));
    assert_eq!(set.len(), 2);
    assert!(!set.without(Isa::Avx).contains(Isa::Avx));
    assert_eq!(set.iter().collect::<Vec<_>>(), [Isa::Avx, Isa::Avx2]);
  }
}

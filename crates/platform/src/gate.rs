//! Capability gate: hardware, knobs and hierarchy folded into one answer.
//!
//! A capability is enabled when the hardware reports it, every knob guarding it
//! is on, and every parent is enabled. Groups then resolve all-or-nothing. The
//! result is a plain `Copy` value; caching lives in [`crate::gate()`].

use crate::{
  caps::Arch,
  hardware::Hardware,
  isa::{Group, Isa, IsaSet, NODES},
  knobs::Knobs,
  width::VectorWidths,
};

// ─────────────────────────────────────────────────────────────────────────────
// OS policy
// ─────────────────────────────────────────────────────────────────────────────

/// Operating-system rules applied on top of hardware support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OsPolicy {
  /// Hierarchy-disable the AVX-512 group.
  pub disable_avx512: bool,
}

impl OsPolicy {
  pub const NONE: Self = Self { disable_avx512: false };
  pub const MACOS: Self = Self { disable_avx512: true };

  /// Policy for the OS this crate was compiled for.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    if cfg!(target_os = "macos") { Self::MACOS } else { Self::NONE }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ─────────────────────────────────────────────────────────────────────────────

/// Groups whose members disagreed before all-or-nothing resolution.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GateDiagnostics(u8);

impl GateDiagnostics {
  pub const NONE: Self = Self(0);

  #[inline]
  #[must_use]
  pub const fn is_consistent(self) -> bool {
    self.0 == 0
  }

  #[inline]
  #[must_use]
  pub const fn contains(self, group: Group) -> bool {
    self.0 & (1 << group as u8) != 0
  }

  #[inline]
  const fn with(self, group: Group) -> Self {
    Self(self.0 | (1 << group as u8))
  }

  pub fn iter(self) -> impl Iterator<Item = Group> {
    Group::ALL.into_iter().filter(move |g| self.contains(*g))
  }
}

impl core::fmt::Debug for GateDiagnostics {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.iter().map(Group::name)).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Gate
// ─────────────────────────────────────────────────────────────────────────────

/// Resolved capability state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gate {
  hardware: Hardware,
  enabled: IsaSet,
  widths: VectorWidths,
  diagnostics: GateDiagnostics,
}

impl Default for Gate {
  fn default() -> Self {
    Self::portable()
  }
}

impl Gate {
  /// Nothing enabled.
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      hardware: Hardware::NONE,
      enabled: IsaSet::NONE,
      widths: VectorWidths::PORTABLE,
      diagnostics: GateDiagnostics::NONE,
    }
  }

  /// Resolve the gate for `hardware` under `knobs` and `policy`.
  ///
  /// Pure: no caching, no environment access.
  #[must_use]
  pub fn evaluate(hardware: &Hardware, knobs: &Knobs, policy: OsPolicy) -> Self {
    let mut enabled = IsaSet::NONE;
    let mut diagnostics = GateDiagnostics::NONE;

    for (i, node) in NODES.iter().enumerate() {
      let on = hardware.caps.has(node.requires)
        && knobs.all(node.knobs)
        && node.parents.iter().all(|p| enabled.contains(*p))
        && !(node.macos_disabled && policy.disable_avx512);
      if on {
        enabled = enabled.with(node.isa);
      }

      // Members are contiguous; settle the group on its last member.
      let Some(group) = node.group else { continue };
      if NODES.get(i + 1).is_some_and(|next| next.group == Some(group)) {
        continue;
      }
      let members = group.members();
      let present = enabled.intersection(members);
      if !present.is_empty() && present != members {
        log::warn!(
          "capability group {} is inconsistent ({:?} of {:?}); disabling it",
          group.name(),
          present,
          members
        );
        diagnostics = diagnostics.with(group);
        enabled = enabled.difference(members);
      }
    }

    Self {
      hardware: *hardware,
      enabled,
      widths: VectorWidths::resolve(hardware, enabled, knobs),
      diagnostics,
    }
  }

  /// This gate with everything `host` lacks switched off.
  ///
  /// Enabled sets that each honor the hierarchy and the groups still do after
  /// intersection. Lengths are kept; acceleration flags need both sides.
  #[must_use]
  pub const fn restricted_to(self, host: &Gate) -> Self {
    let (w, h) = (self.widths, host.widths);
    Self {
      enabled: self.enabled.intersection(host.enabled),
      widths: VectorWidths {
        vector64_accelerated: w.vector64_accelerated && h.vector64_accelerated,
        vector128_accelerated: w.vector128_accelerated && h.vector128_accelerated,
        vector256_accelerated: w.vector256_accelerated && h.vector256_accelerated,
        vector512_accelerated: w.vector512_accelerated && h.vector512_accelerated,
        ..w
      },
      ..self
    }
  }

  #[inline]
  #[must_use]
  pub const fn is_enabled(&self, isa: Isa) -> bool {
    self.enabled.contains(isa)
  }

  #[inline]
  #[must_use]
  pub const fn enabled(&self) -> IsaSet {
    self.enabled
  }

  #[inline]
  #[must_use]
  pub const fn hardware(&self) -> &Hardware {
    &self.hardware
  }

  #[inline]
  #[must_use]
  pub const fn arch(&self) -> Arch {
    self.hardware.arch
  }

  #[inline]
  #[must_use]
  pub const fn widths(&self) -> &VectorWidths {
    &self.widths
  }

  #[inline]
  #[must_use]
  pub const fn diagnostics(&self) -> GateDiagnostics {
    self.diagnostics
  }

  #[inline]
  #[must_use]
  pub const fn preferred_vector_byte_length(&self) -> u32 {
    self.widths.preferred_vector_byte_length
  }

  #[inline]
  #[must_use]
  pub const fn vector_t_byte_length(&self) -> u32 {
    self.widths.vector_t_byte_length
  }

  #[inline]
  #[must_use]
  pub const fn vector_accelerated(&self) -> bool {
    self.widths.vector_accelerated()
  }
}

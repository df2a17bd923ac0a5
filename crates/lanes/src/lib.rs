//! Four-lane `f32` vectors with exact IEEE semantics, gated by a
//! hierarchical CPU capability table.
//!
//! # Quick Start
//!
//! ```
//! use lanes::{Isa, Vector4};
//!
//! let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
//! assert_eq!(v.length_squared(), 30.0);
//!
//! let gate = lanes::gate();
//! if gate.is_enabled(Isa::Avx2) {
//!   assert!(gate.is_enabled(Isa::Sse42));
//! }
//! println!("{}", lanes::summary());
//! ```
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `LANES_ENABLE_<KNOB>=0` | disables a capability and everything below it |
//! | `LANES_PREFERRED_VECTOR_BIT_WIDTH` | caps the preferred vector width |
//! | `LANES_MAX_VECTOR_T_BIT_WIDTH` | caps the variable-width vector size |
//!
//! Variables are read once, on the first gate query.

use core::fmt;

// =============================================================================
// Vectors
// =============================================================================

pub use vectors::{
  Matrix4x4, MidpointRounding, Quaternion, Vector2, Vector3, Vector4, VectorError, backend_name as lane_backend_name, batch,
};

// =============================================================================
// Capability gate
// =============================================================================

pub use platform::{
  Arch, Gate, GateDiagnostics, Group, Isa, IsaSet, Knob, Knobs, OsPolicy, OverrideError, VectorWidths, gate,
  has_override, registry, try_set_override,
};

// =============================================================================
// Dispatch
// =============================================================================

pub use backend::VectorTier;

/// What this process selected: architecture, tier and kernel tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
  pub arch: Arch,
  pub tier: VectorTier,
  pub enabled: u32,
  pub lane_backend: &'static str,
  pub batch_backend: &'static str,
}

impl fmt::Display for Summary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}: tier {}, {} capabilities, lanes {}, batch {}",
      self.arch, self.tier, self.enabled, self.lane_backend, self.batch_backend
    )
  }
}

/// Resolves the gate (if not yet done) and reports the selection.
#[must_use]
pub fn summary() -> Summary {
  let gate = gate();
  Summary {
    arch: gate.arch(),
    tier: VectorTier::from_gate(&gate),
    enabled: gate.enabled().len(),
    lane_backend: lane_backend_name(),
    batch_backend: batch::backend_name(),
  }
}

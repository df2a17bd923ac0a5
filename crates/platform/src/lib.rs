//! CPU capability gate for the lanes workspace.
//!
//! Every SIMD decision in the workspace goes through one [`Gate`]: which
//! instruction sets may be used and how wide vectors should be.
//!
//! # Core Types
//!
//! - [`Hardware`]: what the machine reports (raw feature bits, vendor, signature)
//! - [`Knobs`]: `LANES_ENABLE_*` switches and width limits
//! - [`Gate`]: the resolved answer, including [`VectorWidths`]
//!
//! # Main Entry Point
//!
//! ```
//! use platform::Isa;
//!
//! let gate = platform::gate();
//! if gate.is_enabled(Isa::Avx2) {
//!   assert!(gate.is_enabled(Isa::Avx));
//! }
//! ```
//!
//! # Rules
//!
//! 1. A capability is enabled only when the hardware has it, its knobs are on,
//!    and all of its parents are enabled.
//! 2. All-or-nothing groups resolve together; disagreements are reported in
//!    [`GateDiagnostics`].
//! 3. The gate is resolved once per process and copied out on every read.
//! 4. Under Miri the gate is portable (nothing enabled).

#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

#[cfg(feature = "std")]
extern crate std;

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod caps;
pub mod cpuid;
mod detect;
pub mod gate;
pub mod hardware;
pub mod isa;
pub mod knobs;
pub mod registry;
pub mod width;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

pub use caps::{Arch, Caps};
pub use detect::{OverrideError, detect_uncached, gate, has_override, try_set_override};
pub use gate::{Gate, GateDiagnostics, OsPolicy};
pub use hardware::{Hardware, Signature, Vendor};
pub use isa::{Group, Isa, IsaSet};
pub use knobs::{Knob, Knobs};
pub use width::VectorWidths;

//! Process-wide gate cache and pre-init overrides.
//!
//! The gate is resolved once, on first use. With `std` it lives in a
//! `OnceLock`; without it, an atomic UNINIT/INITING/READY state machine guards
//! a single slot. An override installed before first use replaces the knobs
//! and policy but is clipped to what the host reports. Under Miri detection is
//! skipped and the portable gate is used.

use crate::gate::Gate;

/// Errors from [`try_set_override`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum OverrideError {
  /// The gate was already resolved; overrides must come first.
  #[error("capability gate already initialized")]
  AlreadyInitialized,
}

/// Resolve the gate from the live machine and environment, bypassing the cache.
#[cold]
#[must_use]
pub fn detect_uncached() -> Gate {
  #[cfg(miri)]
  {
    Gate::portable()
  }

  #[cfg(not(miri))]
  {
    use crate::{gate::OsPolicy, hardware::Hardware, knobs::Knobs};

    Gate::evaluate(&Hardware::detect(), &Knobs::from_env(), OsPolicy::current())
  }
}

#[cold]
fn resolve() -> Gate {
  let host = detect_uncached();
  let gate = override_value().map_or(host, |o| o.restricted_to(&host));
  log::debug!(
    "capability gate resolved: arch={} enabled={:?} preferred={}B vector_t={}B override={}",
    gate.arch(),
    gate.enabled(),
    gate.preferred_vector_byte_length(),
    gate.vector_t_byte_length(),
    has_override(),
  );
  gate
}

/// The process-wide gate.
#[inline]
#[must_use]
pub fn gate() -> Gate {
  cache::get_or_init(resolve)
}

/// Install `gate` in place of detection.
///
/// Only valid before the first [`gate()`] call. The override can only narrow
/// what the host supports: capabilities the machine lacks stay disabled, so
/// gated kernels never run on hardware without their instructions.
#[cold]
pub fn try_set_override(gate: Gate) -> Result<(), OverrideError> {
  cache::try_set_override(gate)
}

/// Whether an override has been installed.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  cache::has_override()
}

fn override_value() -> Option<Gate> {
  cache::override_value()
}

// ─────────────────────────────────────────────────────────────────────────────
// std: OnceLock + RwLock
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
mod cache {
  use std::sync::{OnceLock, RwLock};

  use super::{Gate, OverrideError};

  static CACHED: OnceLock<Gate> = OnceLock::new();
  static OVERRIDE: RwLock<Option<Gate>> = RwLock::new(None);

  #[inline]
  pub fn get_or_init(f: fn() -> Gate) -> Gate {
    *CACHED.get_or_init(f)
  }

  pub fn try_set_override(gate: Gate) -> Result<(), OverrideError> {
    if CACHED.get().is_some() {
      return Err(OverrideError::AlreadyInitialized);
    }
    let mut guard = OVERRIDE.write().unwrap_or_else(std::sync::PoisonError::into_inner);
    *guard = Some(gate);
    Ok(())
  }

  pub fn has_override() -> bool {
    OVERRIDE.read().map(|g| g.is_some()).unwrap_or(false)
  }

  pub fn override_value() -> Option<Gate> {
    OVERRIDE.read().ok().and_then(|g| *g)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// no_std: atomic state machine
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "std"))]
#[allow(unsafe_code)]
mod cache {
  use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
  };

  use super::{Gate, OverrideError};

  const STATE_UNINIT: u8 = 0;
  const STATE_INITING: u8 = 1;
  const STATE_READY: u8 = 2;

  struct Slot<T>(UnsafeCell<T>);

  // SAFETY: every access is ordered by the atomic state transitions below.
  unsafe impl<T> Sync for Slot<T> {}

  static STATE: AtomicU8 = AtomicU8::new(STATE_UNINIT);
  static CACHED: Slot<Gate> = Slot(UnsafeCell::new(Gate::portable()));

  static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
  static OVERRIDE_VALUE: Slot<Gate> = Slot(UnsafeCell::new(Gate::portable()));

  pub fn get_or_init(f: fn() -> Gate) -> Gate {
    if STATE.load(Ordering::Acquire) == STATE_READY {
      return load();
    }

    match STATE.compare_exchange(STATE_UNINIT, STATE_INITING, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let gate = f();
        // SAFETY: sole writer while STATE_INITING; readers wait for STATE_READY.
        unsafe { *CACHED.0.get() = gate };
        STATE.store(STATE_READY, Ordering::Release);
        gate
      }
      Err(STATE_INITING) => {
        while STATE.load(Ordering::Acquire) == STATE_INITING {
          core::hint::spin_loop();
        }
        load()
      }
      Err(_) => load(),
    }
  }

  fn load() -> Gate {
    // SAFETY: only called after observing STATE_READY with Acquire.
    unsafe { *CACHED.0.get() }
  }

  pub fn try_set_override(gate: Gate) -> Result<(), OverrideError> {
    if STATE.load(Ordering::Acquire) != STATE_UNINIT {
      return Err(OverrideError::AlreadyInitialized);
    }
    // SAFETY: pre-init only; readers gate on OVERRIDE_SET.
    unsafe { *OVERRIDE_VALUE.0.get() = gate };
    OVERRIDE_SET.store(true, Ordering::Release);
    Ok(())
  }

  pub fn has_override() -> bool {
    OVERRIDE_SET.load(Ordering::Acquire)
  }

  pub fn override_value() -> Option<Gate> {
    if !OVERRIDE_SET.load(Ordering::Acquire) {
      return None;
    }
    // SAFETY: OVERRIDE_SET observed with Acquire after the payload write.
    Some(unsafe { *OVERRIDE_VALUE.0.get() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn gate_is_stable() {
    let a = gate();
    let b = gate();
    assert_eq!(a, b);
  }

  #[test]
  fn override_after_init_is_rejected() {
    let _ = gate();
    assert_eq!(try_set_override(Gate::portable()), Err(OverrideError::AlreadyInitialized));
  }

  #[test]
  fn cached_gate_is_consistent() {
    let g = gate();
    for node in crate::isa::NODES.iter() {
      if g.is_enabled(node.isa) {
        for parent in node.parents {
          assert!(g.is_enabled(*parent), "{} enabled without {}", node.isa, parent);
        }
      }
    }
  }

  #[test]
  #[cfg(miri)]
  fn miri_is_portable() {
    assert!(detect_uncached().enabled().is_empty());
  }
}

//! Kernel selection.
//!
//! - [`Candidate`]: a kernel with the tier it needs
//! - [`Selected`]: the chosen kernel
//! - [`select`]: first candidate the available tier satisfies
//!
//! Candidates are listed best first and compiled per architecture, so a V128
//! candidate on x86 is an SSE2 kernel and on aarch64 a NEON one.
//!
//! ```
//! use backend::{
//!   VectorTier, candidates,
//!   dispatch::{Candidate, select},
//! };
//!
//! fn wide(x: f32) -> f32 { x * 2.0 }
//! fn scalar(x: f32) -> f32 { x + x }
//!
//! let table: &[Candidate<fn(f32) -> f32>] = candidates![
//!   "wide" => VectorTier::V256 => wide,
//!   "portable" => VectorTier::Scalar => scalar,
//! ];
//! let chosen = select(VectorTier::V128, table).unwrap();
//! assert_eq!(chosen.name, "portable");
//! ```

use crate::tier::VectorTier;

/// A candidate kernel.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Diagnostic name, e.g. `"x86_64/avx"`.
  pub name: &'static str,
  /// Minimum tier the kernel needs.
  pub requires: VectorTier,
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: VectorTier, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The chosen kernel.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  pub name: &'static str,
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// First candidate whose required tier is at most `available`.
///
/// `None` when nothing fits; lists normally end with a
/// [`VectorTier::Scalar`] fallback.
#[inline]
#[must_use]
pub fn select<F: Copy>(available: VectorTier, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates
    .iter()
    .find(|c| c.requires <= available)
    .map(|c| Selected::new(c.name, c.func))
}

/// Builds `&[Candidate]` from `name => tier => func` rows.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $tier:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $tier, $func)),+]
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  type KernelFn = fn(u32) -> u32;

  fn portable(x: u32) -> u32 {
    x
  }

  fn fast(x: u32) -> u32 {
    x ^ 0xCAFE_BABE
  }

  #[test]
  fn candidate_creation() {
    let c: Candidate<KernelFn> = Candidate::new("test", VectorTier::Scalar, portable);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, VectorTier::Scalar);
  }

  #[test]
  fn select_portable_fallback() {
    let list: &[Candidate<KernelFn>] = &[
      Candidate::new("fast", VectorTier::V256, fast),
      Candidate::new("portable", VectorTier::Scalar, portable),
    ];
    let selected = select(VectorTier::Scalar, list).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(7), 7);
  }

  #[test]
  fn select_best_match() {
    let list: &[Candidate<KernelFn>] = candidates![
      "v512" => VectorTier::V512 => fast,
      "v256" => VectorTier::V256 => fast,
      "portable" => VectorTier::Scalar => portable,
    ];
    assert_eq!(select(VectorTier::V512, list).unwrap().name, "v512");
    assert_eq!(select(VectorTier::V256, list).unwrap().name, "v256");
    assert_eq!(select(VectorTier::V128, list).unwrap().name, "portable");
  }

  #[test]
  fn select_without_fallback_is_none() {
    let list: &[Candidate<KernelFn>] = &[Candidate::new("v128", VectorTier::V128, fast)];
    assert!(select(VectorTier::Scalar, list).is_none());
    assert!(select::<KernelFn>(VectorTier::V512, &[]).is_none());
  }
}

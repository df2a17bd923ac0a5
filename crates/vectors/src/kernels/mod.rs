//! Gated kernel tables for [`Vector4`] lane arithmetic and slice batches.
//!
//! Two tables are selected once per process from the capability gate:
//!
//! | Table | Candidates (best first) |
//! |-------|-------------------------|
//! | [`Lane4Kernels`] | `x86_64/sse2`, `aarch64/neon`, `portable` |
//! | [`BatchKernels`] | `x86_64/avx`, `x86_64/sse2`, `portable` |
//!
//! Every candidate computes each lane with the same IEEE operations in the
//! same order as `portable`, so the selection is unobservable in results.

use backend::{
  OnceCache, VectorTier,
  dispatch::{Candidate, Selected, select},
};
use platform::Isa;

use crate::{Matrix4x4, Vector4};

#[cfg(target_arch = "aarch64")]
pub mod aarch64;
pub mod portable;
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

pub type Unary = fn(Vector4) -> Vector4;
pub type Binary = fn(Vector4, Vector4) -> Vector4;

/// Single-vector lane operations. Comparisons return all-bits-set masks.
#[derive(Clone, Copy, Debug)]
pub struct Lane4Kernels {
  pub add: Binary,
  pub sub: Binary,
  pub mul: Binary,
  pub div: Binary,
  pub sqrt: Unary,
  pub and: Binary,
  pub or: Binary,
  pub xor: Binary,
  /// `left & !right`.
  pub and_not: Binary,
  pub eq: Binary,
  pub lt: Binary,
  pub le: Binary,
}

pub type SliceBinary = fn(&[Vector4], &[Vector4], &mut [Vector4]);
pub type SliceScale = fn(&[Vector4], f32, &mut [Vector4]);
pub type SliceLerp = fn(&[Vector4], &[Vector4], f32, &mut [Vector4]);
pub type SliceDot = fn(&[Vector4], &[Vector4], &mut [f32]);
pub type SliceTransform = fn(&[Vector4], &Matrix4x4, &mut [Vector4]);

/// Slice operations. Kernels process `min(len)` elements; length checks live
/// in [`crate::batch`].
#[derive(Clone, Copy, Debug)]
pub struct BatchKernels {
  pub add: SliceBinary,
  pub sub: SliceBinary,
  pub mul: SliceBinary,
  pub scale: SliceScale,
  pub lerp: SliceLerp,
  pub dot: SliceDot,
  pub transform: SliceTransform,
}

// ─────────────────────────────────────────────────────────────────────────────
// Candidates
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const LANE4: &[Candidate<Lane4Kernels>] = backend::candidates![
  "x86_64/sse2" => VectorTier::V128 => x86_64::LANE4,
  "portable" => VectorTier::Scalar => portable::LANE4,
];

#[cfg(target_arch = "aarch64")]
const LANE4: &[Candidate<Lane4Kernels>] = backend::candidates![
  "aarch64/neon" => VectorTier::V128 => aarch64::LANE4,
  "portable" => VectorTier::Scalar => portable::LANE4,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const LANE4: &[Candidate<Lane4Kernels>] = backend::candidates![
  "portable" => VectorTier::Scalar => portable::LANE4,
];

#[cfg(target_arch = "x86_64")]
const BATCH: &[Candidate<BatchKernels>] = backend::candidates![
  "x86_64/avx" => VectorTier::V256 => x86_64::BATCH_AVX,
  "x86_64/sse2" => VectorTier::V128 => x86_64::BATCH_SSE2,
  "portable" => VectorTier::Scalar => portable::BATCH,
];

#[cfg(not(target_arch = "x86_64"))]
const BATCH: &[Candidate<BatchKernels>] = backend::candidates![
  "portable" => VectorTier::Scalar => portable::BATCH,
];

/// Lane candidates compiled for this target, best first.
#[inline]
#[must_use]
pub fn lane4_candidates() -> &'static [Candidate<Lane4Kernels>] {
  LANE4
}

/// Batch candidates compiled for this target, best first.
#[inline]
#[must_use]
pub fn batch_candidates() -> &'static [Candidate<BatchKernels>] {
  BATCH
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Best lane table for `tier`, uncached.
#[must_use]
pub fn select_lane4(tier: VectorTier) -> Selected<Lane4Kernels> {
  select(tier, LANE4).unwrap_or(Selected::new("portable", portable::LANE4))
}

/// Best batch table for `tier`, uncached.
#[must_use]
pub fn select_batch(tier: VectorTier) -> Selected<BatchKernels> {
  select(tier, BATCH).unwrap_or(Selected::new("portable", portable::BATCH))
}

static LANE4_SELECTED: OnceCache<Selected<Lane4Kernels>> = OnceCache::new();
static BATCH_SELECTED: OnceCache<Selected<BatchKernels>> = OnceCache::new();

/// Lane table for this process.
#[inline]
pub fn selected() -> Selected<Lane4Kernels> {
  LANE4_SELECTED.get_or_init(|| {
    let tier = VectorTier::detected();
    let chosen = select_lane4(tier);
    log::debug!("vectors: lane kernels {} (tier {tier})", chosen.name);
    chosen
  })
}

/// Batch table for this process.
#[inline]
pub fn selected_batch() -> Selected<BatchKernels> {
  BATCH_SELECTED.get_or_init(|| {
    let tier = VectorTier::detected();
    let chosen = select_batch(tier);
    log::debug!("vectors: batch kernels {} (tier {tier})", chosen.name);
    chosen
  })
}

#[inline]
pub(crate) fn lanes() -> Lane4Kernels {
  selected().func
}

/// Whether `a * b + c` fuses natively (x86 FMA, aarch64 Advanced SIMD).
#[inline]
#[must_use]
pub fn has_fused_multiply_add() -> bool {
  let gate = platform::gate();
  gate.is_enabled(Isa::Fma) || gate.is_enabled(Isa::AdvSimd)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_list_ends_with_portable() {
    assert_eq!(LANE4.last().map(|c| c.name), Some("portable"));
    assert_eq!(BATCH.last().map(|c| c.name), Some("portable"));
    assert_eq!(select_lane4(VectorTier::Scalar).name, "portable");
    assert_eq!(select_batch(VectorTier::Scalar).name, "portable");
  }

  #[test]
  fn selection_is_stable() {
    assert_eq!(selected().name, selected().name);
    assert_eq!(selected_batch().name, selected_batch().name);
    assert_eq!(selected().name, select_lane4(VectorTier::detected()).name);
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn x86_tiers_map_to_kernels() {
    assert_eq!(select_lane4(VectorTier::V512).name, "x86_64/sse2");
    assert_eq!(select_batch(VectorTier::V256).name, "x86_64/avx");
    assert_eq!(select_batch(VectorTier::V128).name, "x86_64/sse2");
  }
}

//! SSE2 lane kernels and SSE2/AVX batch kernels.
//!
//! - SSE2: one `Vector4` per `__m128`
//! - AVX: two `Vector4`s per `__m256`, odd tails through SSE2
//!
//! This file is allowed to use `unsafe` for ISA-specific intrinsics.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::{BatchKernels, Lane4Kernels};
use crate::{Matrix4x4, Vector4};

pub const LANE4: Lane4Kernels = Lane4Kernels {
  add,
  sub,
  mul,
  div,
  sqrt,
  and,
  or,
  xor,
  and_not,
  eq,
  lt,
  le,
};

pub const BATCH_SSE2: BatchKernels = BatchKernels {
  add: add_slices_sse2,
  sub: sub_slices_sse2,
  mul: mul_slices_sse2,
  scale: scale_slice_sse2,
  lerp: lerp_slices_sse2,
  dot: dot_slices_sse2,
  transform: transform_slice_sse2,
};

pub const BATCH_AVX: BatchKernels = BatchKernels {
  add: add_slices_avx,
  sub: sub_slices_avx,
  mul: mul_slices_avx,
  scale: scale_slice_avx,
  lerp: lerp_slices_avx,
  dot: dot_slices_avx,
  transform: transform_slice_avx,
};

// ─────────────────────────────────────────────────────────────────────────────
// Loads and stores
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load(v: &Vector4) -> __m128 {
  // SAFETY: `Vector4` is `#[repr(C)]` with four contiguous `f32` lanes.
  _mm_loadu_ps(core::ptr::from_ref(v).cast::<f32>())
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store(r: __m128) -> Vector4 {
  let mut out = Vector4::ZERO;
  // SAFETY: `out` provides 16 writable bytes.
  _mm_storeu_ps(core::ptr::from_mut(&mut out).cast::<f32>(), r);
  out
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn load2(pair: &[Vector4]) -> __m256 {
  debug_assert_eq!(pair.len(), 2);
  // SAFETY: callers pass `chunks_exact(2)` items, i.e. 8 contiguous `f32`s.
  _mm256_loadu_ps(pair.as_ptr().cast::<f32>())
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn store2(pair: &mut [Vector4], r: __m256) {
  debug_assert_eq!(pair.len(), 2);
  // SAFETY: callers pass `chunks_exact_mut(2)` items.
  _mm256_storeu_ps(pair.as_mut_ptr().cast::<f32>(), r);
}

// ─────────────────────────────────────────────────────────────────────────────
// Lane kernels
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! lane_binary {
  ($($name:ident => |$a:ident, $b:ident| $body:expr),+ $(,)?) => {$(
    #[inline]
    fn $name(a: Vector4, b: Vector4) -> Vector4 {
      #[target_feature(enable = "sse2")]
      unsafe fn kernel(a: Vector4, b: Vector4) -> Vector4 {
        let ($a, $b) = (load(&a), load(&b));
        store($body)
      }
      // SAFETY: SSE2 is part of the x86_64 baseline; the table is selected
      // only when the gate reports 128-bit acceleration.
      unsafe { kernel(a, b) }
    }
  )+};
}

lane_binary! {
  add => |a, b| _mm_add_ps(a, b),
  sub => |a, b| _mm_sub_ps(a, b),
  mul => |a, b| _mm_mul_ps(a, b),
  div => |a, b| _mm_div_ps(a, b),
  and => |a, b| _mm_and_ps(a, b),
  or => |a, b| _mm_or_ps(a, b),
  xor => |a, b| _mm_xor_ps(a, b),
  and_not => |a, b| _mm_andnot_ps(b, a),
  eq => |a, b| _mm_cmpeq_ps(a, b),
  lt => |a, b| _mm_cmplt_ps(a, b),
  le => |a, b| _mm_cmple_ps(a, b),
}

#[inline]
fn sqrt(a: Vector4) -> Vector4 {
  #[target_feature(enable = "sse2")]
  unsafe fn kernel(a: Vector4) -> Vector4 {
    store(_mm_sqrt_ps(load(&a)))
  }
  // SAFETY: as for the binary lane kernels.
  unsafe { kernel(a) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared per-vector steps
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn rows128(m: &Matrix4x4) -> [__m128; 4] {
  let [r1, r2, r3, r4] = m.rows();
  [load(&r1), load(&r2), load(&r3), load(&r4)]
}

/// `((x * r1 + y * r2) + z * r3) + w * r4`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn transform128(v: __m128, rows: &[__m128; 4]) -> __m128 {
  let [r1, r2, r3, r4] = *rows;
  let acc = _mm_mul_ps(_mm_shuffle_ps(v, v, 0x00), r1);
  let acc = _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(v, v, 0x55), r2));
  let acc = _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(v, v, 0xAA), r3));
  _mm_add_ps(acc, _mm_mul_ps(_mm_shuffle_ps(v, v, 0xFF), r4))
}

/// Left-to-right sum of four product lanes.
#[inline]
fn hsum(p: [f32; 4]) -> f32 {
  let [p0, p1, p2, p3] = p;
  p0 + p1 + p2 + p3
}

// ─────────────────────────────────────────────────────────────────────────────
// SSE2 batch kernels
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! batch_binary_sse2 {
  ($($name:ident => $intrinsic:ident),+ $(,)?) => {$(
    fn $name(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
      #[target_feature(enable = "sse2")]
      unsafe fn kernel(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
        for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
          *o = store($intrinsic(load(x), load(y)));
        }
      }
      // SAFETY: SSE2 is part of the x86_64 baseline.
      unsafe { kernel(a, b, out) }
    }
  )+};
}

batch_binary_sse2! {
  add_slices_sse2 => _mm_add_ps,
  sub_slices_sse2 => _mm_sub_ps,
  mul_slices_sse2 => _mm_mul_ps,
}

#[target_feature(enable = "sse2")]
unsafe fn scale_sse2(src: &[Vector4], factor: f32, out: &mut [Vector4]) {
  let f = _mm_set1_ps(factor);
  for (o, x) in out.iter_mut().zip(src) {
    *o = store(_mm_mul_ps(load(x), f));
  }
}

#[target_feature(enable = "sse2")]
unsafe fn lerp_sse2(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) {
  let (s, t) = (_mm_set1_ps(1.0 - t), _mm_set1_ps(t));
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = store(_mm_add_ps(_mm_mul_ps(load(x), s), _mm_mul_ps(load(y), t)));
  }
}

#[target_feature(enable = "sse2")]
unsafe fn dot_sse2(a: &[Vector4], b: &[Vector4], out: &mut [f32]) {
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = hsum(store(_mm_mul_ps(load(x), load(y))).to_array());
  }
}

#[target_feature(enable = "sse2")]
unsafe fn transform_sse2(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) {
  let rows = rows128(m);
  for (o, v) in out.iter_mut().zip(src) {
    *o = store(transform128(load(v), &rows));
  }
}

fn scale_slice_sse2(src: &[Vector4], factor: f32, out: &mut [Vector4]) {
  // SAFETY: SSE2 is part of the x86_64 baseline.
  unsafe { scale_sse2(src, factor, out) }
}

fn lerp_slices_sse2(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) {
  // SAFETY: SSE2 is part of the x86_64 baseline.
  unsafe { lerp_sse2(a, b, t, out) }
}

fn dot_slices_sse2(a: &[Vector4], b: &[Vector4], out: &mut [f32]) {
  // SAFETY: SSE2 is part of the x86_64 baseline.
  unsafe { dot_sse2(a, b, out) }
}

fn transform_slice_sse2(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) {
  // SAFETY: SSE2 is part of the x86_64 baseline.
  unsafe { transform_sse2(src, m, out) }
}

// ─────────────────────────────────────────────────────────────────────────────
// AVX batch kernels
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! batch_binary_avx {
  ($($name:ident => $intrinsic:ident, $tail:ident);+ $(;)?) => {$(
    fn $name(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
      #[target_feature(enable = "avx")]
      unsafe fn kernel(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
        let n = out.len().min(a.len()).min(b.len());
        let (a, b, out) = (&a[..n], &b[..n], &mut out[..n]);
        let mut oc = out.chunks_exact_mut(2);
        let (mut ac, mut bc) = (a.chunks_exact(2), b.chunks_exact(2));
        for ((o, x), y) in (&mut oc).zip(&mut ac).zip(&mut bc) {
          store2(o, $intrinsic(load2(x), load2(y)));
        }
        $tail(ac.remainder(), bc.remainder(), oc.into_remainder());
      }
      // SAFETY: selected only at the V256 tier, which requires the gate to
      // enable AVX2 (and therefore AVX).
      unsafe { kernel(a, b, out) }
    }
  )+};
}

batch_binary_avx! {
  add_slices_avx => _mm256_add_ps, add_slices_sse2;
  sub_slices_avx => _mm256_sub_ps, sub_slices_sse2;
  mul_slices_avx => _mm256_mul_ps, mul_slices_sse2;
}

#[target_feature(enable = "avx")]
unsafe fn scale_avx(src: &[Vector4], factor: f32, out: &mut [Vector4]) {
  let n = out.len().min(src.len());
  let (src, out) = (&src[..n], &mut out[..n]);
  let f = _mm256_set1_ps(factor);
  let mut oc = out.chunks_exact_mut(2);
  let mut sc = src.chunks_exact(2);
  for (o, x) in (&mut oc).zip(&mut sc) {
    store2(o, _mm256_mul_ps(load2(x), f));
  }
  scale_sse2(sc.remainder(), factor, oc.into_remainder());
}

#[target_feature(enable = "avx")]
unsafe fn lerp_avx(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) {
  let n = out.len().min(a.len()).min(b.len());
  let (a, b, out) = (&a[..n], &b[..n], &mut out[..n]);
  let (s, tt) = (_mm256_set1_ps(1.0 - t), _mm256_set1_ps(t));
  let mut oc = out.chunks_exact_mut(2);
  let (mut ac, mut bc) = (a.chunks_exact(2), b.chunks_exact(2));
  for ((o, x), y) in (&mut oc).zip(&mut ac).zip(&mut bc) {
    store2(o, _mm256_add_ps(_mm256_mul_ps(load2(x), s), _mm256_mul_ps(load2(y), tt)));
  }
  lerp_sse2(ac.remainder(), bc.remainder(), t, oc.into_remainder());
}

#[target_feature(enable = "avx")]
unsafe fn dot_avx(a: &[Vector4], b: &[Vector4], out: &mut [f32]) {
  let n = out.len().min(a.len()).min(b.len());
  let (a, b, out) = (&a[..n], &b[..n], &mut out[..n]);
  let mut oc = out.chunks_exact_mut(2);
  let (mut ac, mut bc) = (a.chunks_exact(2), b.chunks_exact(2));
  for ((o, x), y) in (&mut oc).zip(&mut ac).zip(&mut bc) {
    let mut p = [0.0f32; 8];
    _mm256_storeu_ps(p.as_mut_ptr(), _mm256_mul_ps(load2(x), load2(y)));
    let [p0, p1, p2, p3, p4, p5, p6, p7] = p;
    if let [o0, o1] = o {
      *o0 = hsum([p0, p1, p2, p3]);
      *o1 = hsum([p4, p5, p6, p7]);
    }
  }
  dot_sse2(ac.remainder(), bc.remainder(), oc.into_remainder());
}

#[target_feature(enable = "avx")]
unsafe fn transform_avx(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) {
  let n = out.len().min(src.len());
  let (src, out) = (&src[..n], &mut out[..n]);
  let [r1, r2, r3, r4] = rows128(m);
  let (r1, r2) = (_mm256_broadcast_ps(&r1), _mm256_broadcast_ps(&r2));
  let (r3, r4) = (_mm256_broadcast_ps(&r3), _mm256_broadcast_ps(&r4));
  let mut oc = out.chunks_exact_mut(2);
  let mut sc = src.chunks_exact(2);
  for (o, x) in (&mut oc).zip(&mut sc) {
    let v = load2(x);
    let acc = _mm256_mul_ps(_mm256_permute_ps(v, 0x00), r1);
    let acc = _mm256_add_ps(acc, _mm256_mul_ps(_mm256_permute_ps(v, 0x55), r2));
    let acc = _mm256_add_ps(acc, _mm256_mul_ps(_mm256_permute_ps(v, 0xAA), r3));
    store2(o, _mm256_add_ps(acc, _mm256_mul_ps(_mm256_permute_ps(v, 0xFF), r4)));
  }
  transform_sse2(sc.remainder(), m, oc.into_remainder());
}

fn scale_slice_avx(src: &[Vector4], factor: f32, out: &mut [Vector4]) {
  // SAFETY: selected only at the V256 tier (AVX2, hence AVX).
  unsafe { scale_avx(src, factor, out) }
}

fn lerp_slices_avx(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) {
  // SAFETY: selected only at the V256 tier (AVX2, hence AVX).
  unsafe { lerp_avx(a, b, t, out) }
}

fn dot_slices_avx(a: &[Vector4], b: &[Vector4], out: &mut [f32]) {
  // SAFETY: selected only at the V256 tier (AVX2, hence AVX).
  unsafe { dot_avx(a, b, out) }
}

fn transform_slice_avx(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) {
  // SAFETY: selected only at the V256 tier (AVX2, hence AVX).
  unsafe { transform_avx(src, m, out) }
}

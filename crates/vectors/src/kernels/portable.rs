//! Scalar reference kernels.
//!
//! Each lane is one IEEE operation, so these define the results every
//! accelerated candidate must reproduce.

use super::{BatchKernels, Lane4Kernels};
use crate::{Matrix4x4, Vector4, bits};

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

pub const BATCH: BatchKernels = BatchKernels {
  add: add_slices,
  sub: sub_slices,
  mul: mul_slices,
  scale: scale_slice,
  lerp: lerp_slices,
  dot: dot_slices,
  transform: transform_slice,
};

#[inline]
fn lanewise(a: Vector4, b: Vector4, f: impl Fn(f32, f32) -> f32) -> Vector4 {
  Vector4::new(f(a.x, b.x), f(a.y, b.y), f(a.z, b.z), f(a.w, b.w))
}

// ─────────────────────────────────────────────────────────────────────────────
// Lane kernels
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub fn add(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| x + y)
}

#[inline]
pub fn sub(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| x - y)
}

#[inline]
pub fn mul(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| x * y)
}

#[inline]
pub fn div(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| x / y)
}

#[inline]
pub fn sqrt(a: Vector4) -> Vector4 {
  Vector4::new(a.x.sqrt(), a.y.sqrt(), a.z.sqrt(), a.w.sqrt())
}

#[inline]
pub fn and(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, bits::and)
}

#[inline]
pub fn or(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, bits::or)
}

#[inline]
pub fn xor(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, bits::xor)
}

#[inline]
pub fn and_not(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, bits::and_not)
}

#[inline]
pub fn eq(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| bits::mask(x == y))
}

#[inline]
pub fn lt(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| bits::mask(x < y))
}

#[inline]
pub fn le(a: Vector4, b: Vector4) -> Vector4 {
  lanewise(a, b, |x, y| bits::mask(x <= y))
}

/// `((x0 * y0 + x1 * y1) + x2 * y2) + x3 * y3`.
#[inline]
pub fn dot(a: Vector4, b: Vector4) -> f32 {
  a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
}

/// Row-vector transform, lane `j` = `((x * m1j + y * m2j) + z * m3j) + w * m4j`.
#[inline]
pub fn transform(v: Vector4, m: &Matrix4x4) -> Vector4 {
  let [r1, r2, r3, r4] = m.rows();
  let acc = mul(r1, Vector4::splat(v.x));
  let acc = add(acc, mul(r2, Vector4::splat(v.y)));
  let acc = add(acc, mul(r3, Vector4::splat(v.z)));
  add(acc, mul(r4, Vector4::splat(v.w)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Batch kernels
// ─────────────────────────────────────────────────────────────────────────────

pub fn add_slices(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = add(*x, *y);
  }
}

pub fn sub_slices(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = sub(*x, *y);
  }
}

pub fn mul_slices(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) {
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = mul(*x, *y);
  }
}

pub fn scale_slice(src: &[Vector4], factor: f32, out: &mut [Vector4]) {
  let f = Vector4::splat(factor);
  for (o, x) in out.iter_mut().zip(src) {
    *o = mul(*x, f);
  }
}

pub fn lerp_slices(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) {
  let (s, t) = (Vector4::splat(1.0 - t), Vector4::splat(t));
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = add(mul(*x, s), mul(*y, t));
  }
}

pub fn dot_slices(a: &[Vector4], b: &[Vector4], out: &mut [f32]) {
  for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
    *o = dot(*x, *y);
  }
}

pub fn transform_slice(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) {
  for (o, v) in out.iter_mut().zip(src) {
    *o = transform(*v, m);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ieee_division() {
    let q = div(Vector4::new(-2.0, 3.0, f32::MAX, f32::NAN), Vector4::ZERO);
    assert_eq!(q.x, f32::NEG_INFINITY);
    assert_eq!(q.y, f32::INFINITY);
    assert_eq!(q.z, f32::INFINITY);
    assert!(q.w.is_nan());
    assert!(div(Vector4::ZERO, Vector4::ZERO).x.is_nan());
  }

  #[test]
  fn masks_are_all_or_nothing() {
    let m = lt(Vector4::new(1.0, 2.0, 3.0, f32::NAN), Vector4::splat(2.0));
    assert_eq!(m.to_array().map(f32::to_bits), [u32::MAX, 0, 0, 0]);
    let m = le(Vector4::new(1.0, 2.0, 3.0, f32::NAN), Vector4::splat(2.0));
    assert_eq!(m.to_array().map(f32::to_bits), [u32::MAX, u32::MAX, 0, 0]);
  }

  #[test]
  fn batch_kernels_stop_at_the_shortest_slice() {
    let a = [Vector4::ONE; 3];
    let b = [Vector4::splat(2.0); 2];
    let mut out = [Vector4::ZERO; 3];
    add_slices(&a, &b, &mut out);
    assert_eq!(out, [Vector4::splat(3.0), Vector4::splat(3.0), Vector4::ZERO]);
  }

  #[test]
  fn transform_matches_vector4() {
    let m = Matrix4x4::create_rotation_z(0.3) * Matrix4x4::create_rotation_x(1.2);
    let v = Vector4::new(1.0, -2.0, 3.5, 1.0);
    assert_eq!(transform(v, &m), Vector4::transform(v, &m));
    assert_eq!(dot(v, v), v.dot(v));
  }
}

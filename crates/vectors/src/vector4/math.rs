//! Reductions, the min/max family, interpolation and per-lane math.

use super::Vector4;
use crate::{MidpointRounding, kernels, scalar};

impl Vector4 {
  #[inline]
  pub(crate) fn map(self, f: impl Fn(f32) -> f32) -> Self {
    Self::new(f(self.x), f(self.y), f(self.z), f(self.w))
  }

  #[inline]
  pub(crate) fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
    Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z), f(self.w, other.w))
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Reductions
  // ───────────────────────────────────────────────────────────────────────────

  /// `((x + y) + z) + w`.
  #[inline]
  #[must_use]
  pub fn sum(self) -> f32 {
    self.x + self.y + self.z + self.w
  }

  /// Lane products summed left to right.
  #[inline]
  #[must_use]
  pub fn dot(self, other: Self) -> f32 {
    (self * other).sum()
  }

  #[inline]
  #[must_use]
  pub fn length_squared(self) -> f32 {
    self.dot(self)
  }

  #[inline]
  #[must_use]
  pub fn length(self) -> f32 {
    self.length_squared().sqrt()
  }

  #[inline]
  #[must_use]
  pub fn distance_squared(a: Self, b: Self) -> f32 {
    (a - b).length_squared()
  }

  #[inline]
  #[must_use]
  pub fn distance(a: Self, b: Self) -> f32 {
    (a - b).length()
  }

  /// `self / length`. The zero vector gives NaN in every lane.
  #[inline]
  #[must_use]
  pub fn normalize(self) -> Self {
    self / self.length()
  }

  /// Cross product of the first three lanes; `w = a.w * b.w`.
  #[inline]
  #[must_use]
  pub fn cross(self, other: Self) -> Self {
    let xyz = self.xyz().cross(other.xyz());
    Self::from_vector3(xyz, self.w * other.w)
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Min / max
  // ───────────────────────────────────────────────────────────────────────────

  /// Lane-wise IEEE `minimum`: NaN propagates, `-0.0 < +0.0`.
  #[inline]
  #[must_use]
  pub fn min(self, other: Self) -> Self {
    self.zip_map(other, scalar::minimum)
  }

  /// Lane-wise IEEE `maximum`: NaN propagates, `+0.0 > -0.0`.
  #[inline]
  #[must_use]
  pub fn max(self, other: Self) -> Self {
    self.zip_map(other, scalar::maximum)
  }

  #[inline]
  #[must_use]
  pub fn min_number(self, other: Self) -> Self {
    self.zip_map(other, scalar::minimum_number)
  }

  #[inline]
  #[must_use]
  pub fn max_number(self, other: Self) -> Self {
    self.zip_map(other, scalar::maximum_number)
  }

  #[inline]
  #[must_use]
  pub fn min_magnitude(self, other: Self) -> Self {
    self.zip_map(other, scalar::min_magnitude)
  }

  #[inline]
  #[must_use]
  pub fn max_magnitude(self, other: Self) -> Self {
    self.zip_map(other, scalar::max_magnitude)
  }

  #[inline]
  #[must_use]
  pub fn min_magnitude_number(self, other: Self) -> Self {
    self.zip_map(other, scalar::min_magnitude_number)
  }

  #[inline]
  #[must_use]
  pub fn max_magnitude_number(self, other: Self) -> Self {
    self.zip_map(other, scalar::max_magnitude_number)
  }

  /// `min(max(self, min), max)`: inverted bounds resolve to `max`.
  #[inline]
  #[must_use]
  pub fn clamp(self, min: Self, max: Self) -> Self {
    self.max(min).min(max)
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Interpolation
  // ───────────────────────────────────────────────────────────────────────────

  /// `a * (1 - t) + b * t` with a scalar weight.
  #[inline]
  #[must_use]
  pub fn lerp(a: Self, b: Self, t: f32) -> Self {
    a * (1.0 - t) + b * t
  }

  /// [`lerp`](Self::lerp) with a weight per lane.
  #[inline]
  #[must_use]
  pub fn lerp_by(a: Self, b: Self, t: Self) -> Self {
    a * (Self::ONE - t) + b * t
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Multiply-add
  // ───────────────────────────────────────────────────────────────────────────

  /// `a * b + c` with a single rounding.
  #[inline]
  #[must_use]
  pub fn fused_multiply_add(a: Self, b: Self, c: Self) -> Self {
    Self::new(
      a.x.mul_add(b.x, c.x),
      a.y.mul_add(b.y, c.y),
      a.z.mul_add(b.z, c.z),
      a.w.mul_add(b.w, c.w),
    )
  }

  /// `a * b + c`, fused only when the hardware fuses natively.
  #[inline]
  #[must_use]
  pub fn multiply_add_estimate(a: Self, b: Self, c: Self) -> Self {
    if kernels::has_fused_multiply_add() {
      Self::fused_multiply_add(a, b, c)
    } else {
      a * b + c
    }
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Per-lane functions
  // ───────────────────────────────────────────────────────────────────────────

  #[inline]
  #[must_use]
  pub fn abs(self) -> Self {
    self.map(f32::abs)
  }

  #[inline]
  #[must_use]
  pub fn sqrt(self) -> Self {
    (kernels::lanes().sqrt)(self)
  }

  /// Magnitude of `self` with the sign of `sign`.
  #[inline]
  #[must_use]
  pub fn copy_sign(self, sign: Self) -> Self {
    self.zip_map(sign, f32::copysign)
  }

  #[inline]
  #[must_use]
  pub fn degrees_to_radians(self) -> Self {
    self.map(scalar::degrees_to_radians)
  }

  #[inline]
  #[must_use]
  pub fn radians_to_degrees(self) -> Self {
    self.map(scalar::radians_to_degrees)
  }

  /// `sqrt(self^2 + other^2)` per lane without intermediate overflow.
  #[inline]
  #[must_use]
  pub fn hypot(self, other: Self) -> Self {
    self.zip_map(other, f32::hypot)
  }

  #[inline]
  #[must_use]
  pub fn sin(self) -> Self {
    self.map(f32::sin)
  }

  #[inline]
  #[must_use]
  pub fn cos(self) -> Self {
    self.map(f32::cos)
  }

  #[inline]
  #[must_use]
  pub fn sin_cos(self) -> (Self, Self) {
    (self.sin(), self.cos())
  }

  #[inline]
  #[must_use]
  pub fn exp(self) -> Self {
    self.map(f32::exp)
  }

  /// Natural logarithm.
  #[inline]
  #[must_use]
  pub fn log(self) -> Self {
    self.map(f32::ln)
  }

  #[inline]
  #[must_use]
  pub fn log2(self) -> Self {
    self.map(f32::log2)
  }

  /// Nearest integer, halves to even.
  #[inline]
  #[must_use]
  pub fn round(self) -> Self {
    self.round_with(MidpointRounding::ToEven)
  }

  #[inline]
  #[must_use]
  pub fn round_with(self, mode: MidpointRounding) -> Self {
    self.map(|x| scalar::round(x, mode))
  }

  #[inline]
  #[must_use]
  pub fn truncate(self) -> Self {
    self.map(f32::trunc)
  }

  #[inline]
  #[must_use]
  pub fn floor(self) -> Self {
    self.map(f32::floor)
  }

  #[inline]
  #[must_use]
  pub fn ceil(self) -> Self {
    self.map(f32::ceil)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dot_and_lengths() {
    let a = Vector4::new(1.0, 2.0, 3.0, 4.0);
    let b = Vector4::new(5.0, 6.0, 7.0, 8.0);
    assert_eq!(a.dot(b), 70.0);
    assert_eq!(a.length_squared(), 30.0);
    assert_eq!(a.length(), 30.0f32.sqrt());
    assert_eq!(Vector4::distance(a, b), 8.0);
    assert_eq!(Vector4::distance_squared(a, b), 64.0);
  }

  #[test]
  fn sum_is_left_to_right() {
    // (1e8 + -1e8) + 1 + 0.5: reassociating would lose the small lanes.
    assert_eq!(Vector4::new(1e8, -1e8, 1.0, 0.5).sum(), 1.5);
  }

  #[test]
  fn cross_keeps_w_product() {
    let a = Vector4::new(1.0, 0.0, 0.0, 2.0);
    let b = Vector4::new(0.0, 1.0, 0.0, 3.0);
    assert_eq!(a.cross(b), Vector4::new(0.0, 0.0, 1.0, 6.0));
  }

  #[test]
  fn clamp_inverted_bounds_resolve_to_max() {
    let min = Vector4::new(0.0, 0.1, 0.13, 0.14);
    let max = Vector4::new(1.0, 1.1, 1.13, 1.14);
    assert_eq!(Vector4::new(0.5, 0.3, 0.33, 0.44).clamp(min, max), Vector4::new(0.5, 0.3, 0.33, 0.44));
    assert_eq!(Vector4::new(2.0, 3.0, 4.0, 5.0).clamp(min, max), max);
    assert_eq!(Vector4::new(-2.0, -3.0, -4.0, -5.0).clamp(min, max), min);
    for v in [Vector4::splat(0.5), Vector4::splat(-10.0), Vector4::splat(10.0)] {
      assert_eq!(v.clamp(max, min), min);
    }
  }

  #[test]
  fn lerp_endpoints_and_extrapolation() {
    let a = Vector4::new(1.0, 2.0, 3.0, 4.0);
    let b = Vector4::new(5.0, 6.0, 7.0, 8.0);
    assert_eq!(Vector4::lerp(a, b, 0.5), Vector4::new(3.0, 4.0, 5.0, 6.0));
    assert_eq!(Vector4::lerp(a, b, 0.0), a);
    assert_eq!(Vector4::lerp(a, b, 1.0), b);
    assert_eq!(Vector4::lerp(Vector4::ZERO, b, 2.0), b * 2.0);
    assert_eq!(Vector4::lerp(Vector4::ZERO, b, -2.0), -(b * 2.0));
    assert_eq!(Vector4::lerp_by(a, b, Vector4::new(0.0, 1.0, 0.5, 0.0)), Vector4::new(1.0, 6.0, 5.0, 4.0));
  }

  #[test]
  fn fused_multiply_add_rounds_once() {
    let e = f32::EPSILON;
    let a = Vector4::splat(1.0 + e);
    let c = Vector4::splat(-(1.0 + 2.0 * e));
    // (1 + e)^2 - (1 + 2e) = e^2, lost entirely without fusing.
    assert_eq!(Vector4::fused_multiply_add(a, a, c), Vector4::splat(e * e));
    assert_eq!(a * a + c, Vector4::ZERO);
    let est = Vector4::multiply_add_estimate(a, a, c);
    assert!(est == Vector4::splat(e * e) || est == Vector4::ZERO);
  }

  #[test]
  fn rounding() {
    let v = Vector4::new(0.5, 1.5, 2.5, -2.5);
    assert_eq!(v.round(), Vector4::new(0.0, 2.0, 2.0, -2.0));
    assert_eq!(v.round_with(MidpointRounding::AwayFromZero), Vector4::new(1.0, 2.0, 3.0, -3.0));
    assert_eq!(v.truncate(), Vector4::new(0.0, 1.0, 2.0, -2.0));
    assert_eq!(v.floor(), Vector4::new(0.0, 1.0, 2.0, -3.0));
    assert_eq!(v.ceil(), Vector4::new(1.0, 2.0, 3.0, -2.0));
  }

  #[test]
  fn elementary_functions() {
    let v = Vector4::new(0.0, 1.0, 4.0, -1.0);
    assert_eq!(v.abs(), Vector4::new(0.0, 1.0, 4.0, 1.0));
    assert_eq!(v.sqrt().z, 2.0);
    assert!(v.sqrt().w.is_nan());
    assert_eq!(Vector4::splat(8.0).log2(), Vector4::splat(3.0));
    assert_eq!(Vector4::ZERO.exp(), Vector4::ONE);
    assert_eq!(Vector4::ONE.log(), Vector4::ZERO);
    let (s, c) = Vector4::ZERO.sin_cos();
    assert_eq!((s, c), (Vector4::ZERO, Vector4::ONE));
    assert_eq!(Vector4::splat(3.0).hypot(Vector4::splat(4.0)), Vector4::splat(5.0));
    assert_eq!(Vector4::ONE.copy_sign(Vector4::new(-0.0, 0.0, -1.0, f32::NAN)), Vector4::new(-1.0, 1.0, -1.0, 1.0));
    assert_eq!(Vector4::splat(180.0).degrees_to_radians(), Vector4::splat(core::f32::consts::PI));
  }
}

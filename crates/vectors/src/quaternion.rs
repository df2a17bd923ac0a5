//! Rotation quaternions.
//!
//! Rotations are applied as the sandwich `q * p * conj(q)`, which agrees with
//! the row-vector [`Matrix4x4`] produced by the same rotation.

use core::ops::Mul;

use crate::{Matrix4x4, Vector3, Vector4};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Quaternion {
  pub x: f32,
  pub y: f32,
  pub z: f32,
  pub w: f32,
}

impl Quaternion {
  pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);
  pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

  #[inline]
  #[must_use]
  pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
    Self { x, y, z, w }
  }

  /// Rotation of `angle` radians about the unit vector `axis`.
  #[must_use]
  pub fn create_from_axis_angle(axis: Vector3, angle: f32) -> Self {
    let (s, c) = (angle * 0.5).sin_cos();
    Self::new(axis.x * s, axis.y * s, axis.z * s, c)
  }

  /// Rotation part of `m` (upper 3x3, assumed orthonormal).
  #[must_use]
  pub fn create_from_rotation_matrix(m: &Matrix4x4) -> Self {
    let trace = m.m11 + m.m22 + m.m33;

    if trace > 0.0 {
      let s = (trace + 1.0).sqrt();
      let inv = 0.5 / s;
      Self::new((m.m23 - m.m32) * inv, (m.m31 - m.m13) * inv, (m.m12 - m.m21) * inv, s * 0.5)
    } else if m.m11 >= m.m22 && m.m11 >= m.m33 {
      let s = (1.0 + m.m11 - m.m22 - m.m33).sqrt();
      let inv = 0.5 / s;
      Self::new(0.5 * s, (m.m12 + m.m21) * inv, (m.m13 + m.m31) * inv, (m.m23 - m.m32) * inv)
    } else if m.m22 > m.m33 {
      let s = (1.0 + m.m22 - m.m11 - m.m33).sqrt();
      let inv = 0.5 / s;
      Self::new((m.m21 + m.m12) * inv, 0.5 * s, (m.m32 + m.m23) * inv, (m.m31 - m.m13) * inv)
    } else {
      let s = (1.0 + m.m33 - m.m11 - m.m22).sqrt();
      let inv = 0.5 / s;
      Self::new((m.m31 + m.m13) * inv, (m.m32 + m.m23) * inv, 0.5 * s, (m.m12 - m.m21) * inv)
    }
  }

  #[inline]
  #[must_use]
  pub const fn conjugate(self) -> Self {
    Self::new(-self.x, -self.y, -self.z, self.w)
  }

  #[inline]
  #[must_use]
  pub fn length_squared(self) -> f32 {
    self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
  }

  #[inline]
  #[must_use]
  pub fn length(self) -> f32 {
    self.length_squared().sqrt()
  }

  #[must_use]
  pub fn normalize(self) -> Self {
    let inv = 1.0 / self.length();
    Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
  }

  /// Rotation `self` followed by `then`, i.e. `then * self`.
  #[inline]
  #[must_use]
  pub fn concatenate(self, then: Self) -> Self {
    then * self
  }

  #[inline]
  #[must_use]
  pub const fn from_vector4(v: Vector4) -> Self {
    Self::new(v.x, v.y, v.z, v.w)
  }

  #[inline]
  #[must_use]
  pub const fn to_vector4(self) -> Vector4 {
    Vector4::new(self.x, self.y, self.z, self.w)
  }
}

impl Mul for Quaternion {
  type Output = Self;

  /// Hamilton product.
  fn mul(self, rhs: Self) -> Self {
    let (a, b) = (self, rhs);
    let cx = a.y * b.z - a.z * b.y;
    let cy = a.z * b.x - a.x * b.z;
    let cz = a.x * b.y - a.y * b.x;
    let dot = a.x * b.x + a.y * b.y + a.z * b.z;

    Self::new(
      a.x * b.w + b.x * a.w + cx,
      a.y * b.w + b.y * a.w + cy,
      a.z * b.w + b.z * a.w + cz,
      a.w * b.w - dot,
    )
  }
}

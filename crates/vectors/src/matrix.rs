//! Row-major 4x4 matrix in the row-vector convention.
//!
//! A point `p` is transformed as `p * M`, so translation lives in the fourth
//! row (`m41..m43`) and `A * B` applies `A` first, then `B`.

use core::ops::Mul;

use crate::{Vector3, Vector4};

/// 4x4 `f32` matrix. [`Default`] is the zero matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Matrix4x4 {
  pub m11: f32,
  pub m12: f32,
  pub m13: f32,
  pub m14: f32,
  pub m21: f32,
  pub m22: f32,
  pub m23: f32,
  pub m24: f32,
  pub m31: f32,
  pub m32: f32,
  pub m33: f32,
  pub m34: f32,
  pub m41: f32,
  pub m42: f32,
  pub m43: f32,
  pub m44: f32,
}

impl Matrix4x4 {
  pub const IDENTITY: Self = Self::from_rows([
    Vector4::UNIT_X,
    Vector4::UNIT_Y,
    Vector4::UNIT_Z,
    Vector4::UNIT_W,
  ]);

  #[inline]
  #[must_use]
  pub const fn from_rows(rows: [Vector4; 4]) -> Self {
    let [r1, r2, r3, r4] = rows;
    Self {
      m11: r1.x,
      m12: r1.y,
      m13: r1.z,
      m14: r1.w,
      m21: r2.x,
      m22: r2.y,
      m23: r2.z,
      m24: r2.w,
      m31: r3.x,
      m32: r3.y,
      m33: r3.z,
      m34: r3.w,
      m41: r4.x,
      m42: r4.y,
      m43: r4.z,
      m44: r4.w,
    }
  }

  #[inline]
  #[must_use]
  pub const fn rows(&self) -> [Vector4; 4] {
    [
      Vector4::new(self.m11, self.m12, self.m13, self.m14),
      Vector4::new(self.m21, self.m22, self.m23, self.m24),
      Vector4::new(self.m31, self.m32, self.m33, self.m34),
      Vector4::new(self.m41, self.m42, self.m43, self.m44),
    ]
  }

  /// Rotation about the X axis; `+radians` turns Y towards Z.
  #[must_use]
  pub fn create_rotation_x(radians: f32) -> Self {
    let (s, c) = radians.sin_cos();
    let mut m = Self::IDENTITY;
    m.m22 = c;
    m.m23 = s;
    m.m32 = -s;
    m.m33 = c;
    m
  }

  /// Rotation about the Y axis; `+radians` turns Z towards X.
  #[must_use]
  pub fn create_rotation_y(radians: f32) -> Self {
    let (s, c) = radians.sin_cos();
    let mut m = Self::IDENTITY;
    m.m11 = c;
    m.m13 = -s;
    m.m31 = s;
    m.m33 = c;
    m
  }

  /// Rotation about the Z axis; `+radians` turns X towards Y.
  #[must_use]
  pub fn create_rotation_z(radians: f32) -> Self {
    let (s, c) = radians.sin_cos();
    let mut m = Self::IDENTITY;
    m.m11 = c;
    m.m12 = s;
    m.m21 = -s;
    m.m22 = c;
    m
  }

  #[inline]
  #[must_use]
  pub const fn create_translation(position: Vector3) -> Self {
    let mut m = Self::IDENTITY;
    m.m41 = position.x;
    m.m42 = position.y;
    m.m43 = position.z;
    m
  }

  #[inline]
  #[must_use]
  pub const fn translation(&self) -> Vector3 {
    Vector3::new(self.m41, self.m42, self.m43)
  }

  #[inline]
  #[must_use]
  pub const fn with_translation(mut self, position: Vector3) -> Self {
    self.m41 = position.x;
    self.m42 = position.y;
    self.m43 = position.z;
    self
  }

  #[must_use]
  pub fn transpose(&self) -> Self {
    Self {
      m11: self.m11,
      m12: self.m21,
      m13: self.m31,
      m14: self.m41,
      m21: self.m12,
      m22: self.m22,
      m23: self.m32,
      m24: self.m42,
      m31: self.m13,
      m32: self.m23,
      m33: self.m33,
      m34: self.m43,
      m41: self.m14,
      m42: self.m24,
      m43: self.m34,
      m44: self.m44,
    }
  }

  #[inline]
  #[must_use]
  pub fn is_identity(&self) -> bool {
    *self == Self::IDENTITY
  }
}

impl Mul for Matrix4x4 {
  type Output = Self;

  /// Each output row is the left row transformed by `rhs`.
  fn mul(self, rhs: Self) -> Self {
    let [r1, r2, r3, r4] = self.rows();
    Self::from_rows([
      Vector4::transform(r1, &rhs),
      Vector4::transform(r2, &rhs),
      Vector4::transform(r3, &rhs),
      Vector4::transform(r4, &rhs),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_is_zero() {
    let m = Matrix4x4::default();
    assert!(m.rows().iter().all(|r| *r == Vector4::ZERO));
    assert!(!m.is_identity());
  }

  #[test]
  fn identity_is_neutral() {
    let t = Matrix4x4::create_translation(Vector3::new(10.0, 20.0, 30.0));
    assert_eq!(t * Matrix4x4::IDENTITY, t);
    assert_eq!(Matrix4x4::IDENTITY * t, t);
    assert_eq!(t.translation(), Vector3::new(10.0, 20.0, 30.0));
    assert!(Matrix4x4::IDENTITY.is_identity());
  }

  #[test]
  fn translations_compose() {
    let a = Matrix4x4::create_translation(Vector3::new(1.0, 2.0, 3.0));
    let b = Matrix4x4::create_translation(Vector3::new(10.0, 20.0, 30.0));
    assert_eq!((a * b).translation(), Vector3::new(11.0, 22.0, 33.0));
  }

  #[test]
  fn quarter_turns() {
    let half_pi = core::f32::consts::FRAC_PI_2;
    let y = Vector4::transform(Vector4::UNIT_X, &Matrix4x4::create_rotation_z(half_pi));
    assert!((y - Vector4::UNIT_Y).length() < 1e-6);
    let z = Vector4::transform(Vector4::UNIT_Y, &Matrix4x4::create_rotation_x(half_pi));
    assert!((z - Vector4::UNIT_Z).length() < 1e-6);
    let x = Vector4::transform(Vector4::UNIT_Z, &Matrix4x4::create_rotation_y(half_pi));
    assert!((x - Vector4::UNIT_X).length() < 1e-6);
  }

  #[test]
  fn transpose_swaps_rows_and_columns() {
    let m = Matrix4x4::create_translation(Vector3::new(1.0, 2.0, 3.0)).transpose();
    assert_eq!(m.m14, 1.0);
    assert_eq!(m.m24, 2.0);
    assert_eq!(m.m34, 3.0);
    assert_eq!(m.transpose(), Matrix4x4::create_translation(Vector3::new(1.0, 2.0, 3.0)));
  }
}

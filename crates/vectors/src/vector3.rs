//! Three-lane vector.

use core::ops::{Add, Mul, Neg, Sub};

use crate::Vector2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vector3 {
  pub x: f32,
  pub y: f32,
  pub z: f32,
}

impl Vector3 {
  pub const ZERO: Self = Self::splat(0.0);
  pub const ONE: Self = Self::splat(1.0);
  pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
  pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
  pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

  #[inline]
  #[must_use]
  pub const fn new(x: f32, y: f32, z: f32) -> Self {
    Self { x, y, z }
  }

  #[inline]
  #[must_use]
  pub const fn splat(value: f32) -> Self {
    Self::new(value, value, value)
  }

  #[inline]
  #[must_use]
  pub const fn from_vector2(v: Vector2, z: f32) -> Self {
    Self::new(v.x, v.y, z)
  }

  #[inline]
  #[must_use]
  pub fn dot(self, other: Self) -> f32 {
    self.x * other.x + self.y * other.y + self.z * other.z
  }

  #[inline]
  #[must_use]
  pub fn cross(self, other: Self) -> Self {
    Self::new(
      self.y * other.z - self.z * other.y,
      self.z * other.x - self.x * other.z,
      self.x * other.y - self.y * other.x,
    )
  }

  #[inline]
  #[must_use]
  pub fn length(self) -> f32 {
    self.dot(self).sqrt()
  }

  /// `self / length`; the zero vector yields NaN lanes.
  #[inline]
  #[must_use]
  pub fn normalize(self) -> Self {
    let len = self.length();
    Self::new(self.x / len, self.y / len, self.z / len)
  }
}

impl Add for Vector3 {
  type Output = Self;

  #[inline]
  fn add(self, rhs: Self) -> Self {
    Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
  }
}

impl Sub for Vector3 {
  type Output = Self;

  #[inline]
  fn sub(self, rhs: Self) -> Self {
    Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
  }
}

impl Mul<f32> for Vector3 {
  type Output = Self;

  #[inline]
  fn mul(self, rhs: f32) -> Self {
    Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
  }
}

impl Neg for Vector3 {
  type Output = Self;

  #[inline]
  fn neg(self) -> Self {
    Self::new(-self.x, -self.y, -self.z)
  }
}

impl From<[f32; 3]> for Vector3 {
  #[inline]
  fn from([x, y, z]: [f32; 3]) -> Self {
    Self::new(x, y, z)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cross_follows_right_hand_rule() {
    assert_eq!(Vector3::UNIT_X.cross(Vector3::UNIT_Y), Vector3::UNIT_Z);
    assert_eq!(Vector3::UNIT_Y.cross(Vector3::UNIT_X), -Vector3::UNIT_Z);
  }

  #[test]
  fn basics() {
    let v = Vector3::from_vector2(Vector2::new(1.0, 2.0), 2.0);
    assert_eq!(v.length(), 3.0);
    assert_eq!(v.dot(Vector3::ONE), 5.0);
    assert_eq!(Vector3::new(0.0, 0.0, 4.0).normalize(), Vector3::UNIT_Z);
    assert!(Vector3::ZERO.normalize().x.is_nan());
    assert_eq!(core::mem::size_of::<Vector3>(), 12);
  }
}

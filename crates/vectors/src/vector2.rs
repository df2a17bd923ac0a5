//! Two-lane vector, used as a source for widening and transforms.

use core::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vector2 {
  pub x: f32,
  pub y: f32,
}

impl Vector2 {
  pub const ZERO: Self = Self::splat(0.0);
  pub const ONE: Self = Self::splat(1.0);

  #[inline]
  #[must_use]
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  #[inline]
  #[must_use]
  pub const fn splat(value: f32) -> Self {
    Self { x: value, y: value }
  }

  #[inline]
  #[must_use]
  pub fn dot(self, other: Self) -> f32 {
    self.x * other.x + self.y * other.y
  }

  #[inline]
  #[must_use]
  pub fn length(self) -> f32 {
    self.dot(self).sqrt()
  }
}

impl Add for Vector2 {
  type Output = Self;

  #[inline]
  fn add(self, rhs: Self) -> Self {
    Self::new(self.x + rhs.x, self.y + rhs.y)
  }
}

impl Sub for Vector2 {
  type Output = Self;

  #[inline]
  fn sub(self, rhs: Self) -> Self {
    Self::new(self.x - rhs.x, self.y - rhs.y)
  }
}

impl Mul<f32> for Vector2 {
  type Output = Self;

  #[inline]
  fn mul(self, rhs: f32) -> Self {
    Self::new(self.x * rhs, self.y * rhs)
  }
}

impl From<[f32; 2]> for Vector2 {
  #[inline]
  fn from([x, y]: [f32; 2]) -> Self {
    Self::new(x, y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn basics() {
    let v = Vector2::new(3.0, 4.0);
    assert_eq!(v.dot(Vector2::ONE), 7.0);
    assert_eq!(v.length(), 5.0);
    assert_eq!(v - v, Vector2::ZERO);
    assert_eq!(v * 2.0, Vector2::from([6.0, 8.0]));
    assert_eq!(core::mem::size_of::<Vector2>(), 8);
  }
}

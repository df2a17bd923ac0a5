//! Matrix and quaternion transforms.

use super::Vector4;
use crate::{Matrix4x4, Quaternion, Vector2, Vector3};

impl Vector4 {
  /// `v * m` in the row-vector convention: lane `j` is
  /// `((x * m1j + y * m2j) + z * m3j) + w * m4j`.
  #[inline]
  #[must_use]
  pub fn transform(v: Self, m: &Matrix4x4) -> Self {
    let [r1, r2, r3, r4] = m.rows();
    r1 * v.x + r2 * v.y + r3 * v.z + r4 * v.w
  }

  /// `(x, y, 0, 1) * m`.
  #[inline]
  #[must_use]
  pub fn transform_vector2(v: Vector2, m: &Matrix4x4) -> Self {
    Self::transform(Self::from_vector2(v, 0.0, 1.0), m)
  }

  /// `(x, y, z, 1) * m`.
  #[inline]
  #[must_use]
  pub fn transform_vector3(v: Vector3, m: &Matrix4x4) -> Self {
    Self::transform(Self::from_vector3(v, 1.0), m)
  }

  /// `q * v * conj(q)` with `v` read as a quaternion. For a unit `q` the first
  /// three lanes rotate and `w` is kept; the zero quaternion yields zero.
  #[inline]
  #[must_use]
  pub fn transform_by_quaternion(v: Self, q: Quaternion) -> Self {
    (q * Quaternion::from_vector4(v) * q.conjugate()).to_vector4()
  }

  /// Rotates `(x, y, 0)`; `w` is 1.
  #[inline]
  #[must_use]
  pub fn transform_vector2_by_quaternion(v: Vector2, q: Quaternion) -> Self {
    Self::transform_by_quaternion(Self::from_vector2(v, 0.0, 1.0), q)
  }

  /// Rotates `(x, y, z)`; `w` is 1.
  #[inline]
  #[must_use]
  pub fn transform_vector3_by_quaternion(v: Vector3, q: Quaternion) -> Self {
    Self::transform_by_quaternion(Self::from_vector3(v, 1.0), q)
  }
}

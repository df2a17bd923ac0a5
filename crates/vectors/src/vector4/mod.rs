//! The four-lane `f32` vector.
//!
//! - [`Vector4`]: value type, 16 bytes, `#[repr(C)]` `x, y, z, w`
//! - arithmetic operators dispatch to the selected lane kernels
//! - `==` is lane-wise IEEE equality; [`Vector4::value_eq`] and [`Hash`] treat
//!   NaN lanes as equal and `-0.0` as `+0.0`
//!
//! The rest of the surface lives in submodules:
//! - `math`: reductions, min/max family, interpolation, transcendentals
//! - `mask`: classification, comparisons, selection, searching
//! - `transform`: matrix and quaternion transforms

mod mask;
mod math;
mod transform;

use core::{
  fmt,
  hash::{Hash, Hasher},
  ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div, DivAssign, Index, IndexMut,
    Mul, MulAssign, Neg, Not, Sub, SubAssign,
  },
};

use crate::{Vector2, Vector3, VectorError, bits, kernels};

/// Four `f32` lanes.
///
/// ```
/// use vectors::Vector4;
///
/// let v = Vector4::new(-2.0, 3.0, f32::MAX, f32::NAN) / 0.0;
/// assert_eq!(v.x, f32::NEG_INFINITY);
/// assert_eq!(v.z, f32::INFINITY);
/// assert!(v.w.is_nan());
/// assert!(v.value_eq(&v) && v != v);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vector4 {
  pub x: f32,
  pub y: f32,
  pub z: f32,
  pub w: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction
// ─────────────────────────────────────────────────────────────────────────────

impl Vector4 {
  /// Number of lanes.
  pub const LANES: usize = 4;

  pub const ZERO: Self = Self::splat(0.0);
  pub const ONE: Self = Self::splat(1.0);
  pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
  pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
  pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
  pub const UNIT_W: Self = Self::new(0.0, 0.0, 0.0, 1.0);
  /// Every bit of every lane set.
  pub const ALL_BITS_SET: Self = Self::splat(bits::ALL_BITS_SET);

  #[inline]
  #[must_use]
  pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
    Self { x, y, z, w }
  }

  #[inline]
  #[must_use]
  pub const fn splat(value: f32) -> Self {
    Self::new(value, value, value, value)
  }

  /// `value` in lane 0, zero elsewhere.
  #[inline]
  #[must_use]
  pub const fn create_scalar(value: f32) -> Self {
    Self::new(value, 0.0, 0.0, 0.0)
  }

  #[inline]
  #[must_use]
  pub const fn from_vector2(v: Vector2, z: f32, w: f32) -> Self {
    Self::new(v.x, v.y, z, w)
  }

  #[inline]
  #[must_use]
  pub const fn from_vector3(v: Vector3, w: f32) -> Self {
    Self::new(v.x, v.y, v.z, w)
  }

  #[inline]
  #[must_use]
  pub const fn from_array(a: [f32; 4]) -> Self {
    Self::new(a[0], a[1], a[2], a[3])
  }

  #[inline]
  #[must_use]
  pub const fn to_array(self) -> [f32; 4] {
    [self.x, self.y, self.z, self.w]
  }

  /// First four elements of `src`.
  ///
  /// # Errors
  ///
  /// [`VectorError::SourceTooShort`] when `src` has fewer than four elements.
  #[inline]
  pub fn try_from_slice(src: &[f32]) -> Result<Self, VectorError> {
    match src {
      [x, y, z, w, ..] => Ok(Self::new(*x, *y, *z, *w)),
      _ => Err(VectorError::SourceTooShort { len: src.len() }),
    }
  }

  #[inline]
  #[must_use]
  pub const fn xyz(self) -> Vector3 {
    Vector3::new(self.x, self.y, self.z)
  }

  #[inline]
  #[must_use]
  pub const fn to_scalar(self) -> f32 {
    self.x
  }
}

impl From<[f32; 4]> for Vector4 {
  #[inline]
  fn from(a: [f32; 4]) -> Self {
    Self::from_array(a)
  }
}

impl From<Vector4> for [f32; 4] {
  #[inline]
  fn from(v: Vector4) -> Self {
    v.to_array()
  }
}

impl TryFrom<&[f32]> for Vector4 {
  type Error = VectorError;

  #[inline]
  fn try_from(src: &[f32]) -> Result<Self, VectorError> {
    Self::try_from_slice(src)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lane access
// ─────────────────────────────────────────────────────────────────────────────

impl Vector4 {
  /// Lane `index`.
  ///
  /// # Errors
  ///
  /// [`VectorError::IndexOutOfRange`] for `index >= 4`.
  #[inline]
  pub const fn get_element(self, index: usize) -> Result<f32, VectorError> {
    match index {
      0 => Ok(self.x),
      1 => Ok(self.y),
      2 => Ok(self.z),
      3 => Ok(self.w),
      _ => Err(VectorError::IndexOutOfRange { index }),
    }
  }

  /// Copy with lane `index` replaced.
  ///
  /// # Errors
  ///
  /// [`VectorError::IndexOutOfRange`] for `index >= 4`.
  #[inline]
  pub const fn with_element(mut self, index: usize, value: f32) -> Result<Self, VectorError> {
    match index {
      0 => self.x = value,
      1 => self.y = value,
      2 => self.z = value,
      3 => self.w = value,
      _ => return Err(VectorError::IndexOutOfRange { index }),
    }
    Ok(self)
  }

  /// Writes the lanes to `dst[..4]`.
  ///
  /// # Errors
  ///
  /// [`VectorError::DestinationTooShort`] when `dst` has fewer than four
  /// elements; nothing is written.
  #[inline]
  pub fn copy_to(self, dst: &mut [f32]) -> Result<(), VectorError> {
    let len = dst.len();
    match dst {
      [x, y, z, w, ..] => {
        (*x, *y, *z, *w) = (self.x, self.y, self.z, self.w);
        Ok(())
      }
      _ => Err(VectorError::DestinationTooShort { len }),
    }
  }

  /// Writes the lanes to `dst[index..index + 4]`.
  ///
  /// # Errors
  ///
  /// [`VectorError::IndexOutOfRange`] when `index >= dst.len()`,
  /// [`VectorError::DestinationTooShort`] when fewer than four elements remain.
  /// Nothing is written on error.
  #[inline]
  pub fn copy_to_at(self, dst: &mut [f32], index: usize) -> Result<(), VectorError> {
    match dst.get_mut(index..) {
      Some(rest) if !rest.is_empty() => self.copy_to(rest),
      _ => Err(VectorError::IndexOutOfRange { index }),
    }
  }

  /// [`copy_to`](Self::copy_to) reporting failure as `false`.
  #[inline]
  #[must_use]
  pub fn try_copy_to(self, dst: &mut [f32]) -> bool {
    self.copy_to(dst).is_ok()
  }
}

impl Index<usize> for Vector4 {
  type Output = f32;

  /// # Panics
  ///
  /// For `index >= 4`, like slice indexing.
  #[inline]
  fn index(&self, index: usize) -> &f32 {
    match index {
      0 => &self.x,
      1 => &self.y,
      2 => &self.z,
      3 => &self.w,
      _ => panic!("index out of bounds: the len is 4 but the index is {index}"),
    }
  }
}

impl IndexMut<usize> for Vector4 {
  #[inline]
  fn index_mut(&mut self, index: usize) -> &mut f32 {
    match index {
      0 => &mut self.x,
      1 => &mut self.y,
      2 => &mut self.z,
      3 => &mut self.w,
      _ => panic!("index out of bounds: the len is 4 but the index is {index}"),
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Equality, hashing, formatting
// ─────────────────────────────────────────────────────────────────────────────

impl Vector4 {
  /// Lane-wise equality where NaN equals NaN (and `-0.0` equals `+0.0`).
  #[inline]
  #[must_use]
  pub fn value_eq(&self, other: &Self) -> bool {
    fn lane(a: f32, b: f32) -> bool {
      a == b || (a.is_nan() && b.is_nan())
    }
    lane(self.x, other.x) && lane(self.y, other.y) && lane(self.z, other.z) && lane(self.w, other.w)
  }

  /// Order-sensitive hash of the four lanes, consistent with [`value_eq`](Self::value_eq).
  #[inline]
  #[must_use]
  pub fn hash_code(&self) -> u64 {
    let mut hasher = rustc_hash::FxHasher::default();
    self.hash(&mut hasher);
    hasher.finish()
  }
}

impl Hash for Vector4 {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    for lane in self.to_array() {
      state.write_u32(bits::canonical_bits(lane));
    }
  }
}

impl fmt::Display for Vector4 {
  /// `<x, y, z, w>`; width and precision apply to every lane.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("<")?;
    fmt::Display::fmt(&self.x, f)?;
    f.write_str(", ")?;
    fmt::Display::fmt(&self.y, f)?;
    f.write_str(", ")?;
    fmt::Display::fmt(&self.z, f)?;
    f.write_str(", ")?;
    fmt::Display::fmt(&self.w, f)?;
    f.write_str(">")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! binary_op {
  ($trait:ident, $method:ident, $assign:ident, $assign_method:ident, $kernel:ident) => {
    impl $trait for Vector4 {
      type Output = Self;

      #[inline]
      fn $method(self, rhs: Self) -> Self {
        (kernels::lanes().$kernel)(self, rhs)
      }
    }

    impl $assign for Vector4 {
      #[inline]
      fn $assign_method(&mut self, rhs: Self) {
        *self = $trait::$method(*self, rhs);
      }
    }
  };
}

macro_rules! scalar_op {
  ($trait:ident, $method:ident, $assign:ident, $assign_method:ident) => {
    impl $trait<f32> for Vector4 {
      type Output = Self;

      #[inline]
      fn $method(self, rhs: f32) -> Self {
        $trait::$method(self, Self::splat(rhs))
      }
    }

    impl $assign<f32> for Vector4 {
      #[inline]
      fn $assign_method(&mut self, rhs: f32) {
        *self = $trait::$method(*self, Self::splat(rhs));
      }
    }
  };
}

binary_op!(Add, add, AddAssign, add_assign, add);
binary_op!(Sub, sub, SubAssign, sub_assign, sub);
binary_op!(Mul, mul, MulAssign, mul_assign, mul);
binary_op!(Div, div, DivAssign, div_assign, div);
binary_op!(BitAnd, bitand, BitAndAssign, bitand_assign, and);
binary_op!(BitOr, bitor, BitOrAssign, bitor_assign, or);
binary_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor);

scalar_op!(Add, add, AddAssign, add_assign);
scalar_op!(Sub, sub, SubAssign, sub_assign);
scalar_op!(Mul, mul, MulAssign, mul_assign);
scalar_op!(Div, div, DivAssign, div_assign);

impl Mul<Vector4> for f32 {
  type Output = Vector4;

  #[inline]
  fn mul(self, rhs: Vector4) -> Vector4 {
    Vector4::splat(self) * rhs
  }
}

impl Neg for Vector4 {
  type Output = Self;

  /// Flips every sign bit, so `-ZERO` is `-0.0` in each lane.
  #[inline]
  fn neg(self) -> Self {
    Self::new(-self.x, -self.y, -self.z, -self.w)
  }
}

impl Not for Vector4 {
  type Output = Self;

  #[inline]
  fn not(self) -> Self {
    self.map(bits::not)
  }
}

impl Vector4 {
  /// `-self`.
  #[inline]
  #[must_use]
  pub fn negate(self) -> Self {
    -self
  }

  /// `left & !right` per bit.
  #[inline]
  #[must_use]
  pub fn and_not(left: Self, right: Self) -> Self {
    (kernels::lanes().and_not)(left, right)
  }

  /// Whether 128-bit lanes are hardware accelerated on this machine.
  #[inline]
  #[must_use]
  pub fn is_hardware_accelerated() -> bool {
    platform::gate().widths().vector128_accelerated
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slice_construction_requires_four_elements() {
    assert_eq!(Vector4::try_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]), Ok(Vector4::new(1.0, 2.0, 3.0, 4.0)));
    assert_eq!(
      Vector4::try_from(&[1.0, 2.0, 3.0][..]),
      Err(VectorError::SourceTooShort { len: 3 })
    );
  }

  #[test]
  fn copy_to_at_checks_index_then_length() {
    let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
    let mut dst = [0.0f32; 6];
    assert_eq!(v.copy_to_at(&mut dst, 6), Err(VectorError::IndexOutOfRange { index: 6 }));
    assert_eq!(v.copy_to_at(&mut dst, 3), Err(VectorError::DestinationTooShort { len: 3 }));
    assert_eq!(dst, [0.0; 6]);
    assert_eq!(v.copy_to_at(&mut dst, 2), Ok(()));
    assert_eq!(dst, [0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
  }

  #[test]
  fn element_access() {
    let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(v.get_element(3), Ok(4.0));
    assert_eq!(v.get_element(4), Err(VectorError::IndexOutOfRange { index: 4 }));
    assert_eq!(v.with_element(1, 9.0), Ok(Vector4::new(1.0, 9.0, 3.0, 4.0)));
    assert!(v.with_element(7, 9.0).is_err());

    let mut m = v;
    m[2] = -3.0;
    assert_eq!(m[2], -3.0);
    assert_eq!(m.to_scalar(), 1.0);
  }

  #[test]
  #[should_panic(expected = "index out of bounds")]
  fn index_past_the_end_panics() {
    let _ = Vector4::ZERO[4];
  }

  #[test]
  fn negation_flips_sign_bits() {
    let n = -Vector4::ZERO;
    assert!(n.to_array().iter().all(|l| l.is_sign_negative() && *l == 0.0));
    assert_eq!(Vector4::ONE.negate(), Vector4::splat(-1.0));
  }

  #[test]
  fn not_and_and_not() {
    assert_eq!((!Vector4::ZERO).to_array().map(f32::to_bits), [u32::MAX; 4]);
    assert_eq!(Vector4::and_not(Vector4::splat(-1.0), Vector4::splat(-0.0)), Vector4::ONE);
  }

  #[test]
  fn not_flips_every_lane_bit() {
    let v = Vector4::new(1.5, -0.0, f32::INFINITY, f32::from_bits(0x0000_0001));
    let flipped = (!v).to_array().map(f32::to_bits);
    assert_eq!(flipped, v.to_array().map(|l| !l.to_bits()));
    assert_eq!((!!v).to_array().map(f32::to_bits), v.to_array().map(f32::to_bits));
  }
}

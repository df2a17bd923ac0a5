//! Per-lane masks, selection and searching.
//!
//! A mask lane is all bits set (true) or `+0.0` (false). Search helpers that
//! take a value compare with float `==`; the `*_where_all_bits_set` forms
//! compare raw bits against `0xFFFF_FFFF`.

use super::Vector4;
use crate::{bits, kernels, scalar};

impl Vector4 {
  #[inline]
  fn classify(self, pred: impl Fn(f32) -> bool) -> Self {
    self.map(|x| bits::mask(pred(x)))
  }

  #[inline]
  fn lanes_where(self, pred: impl Fn(f32) -> bool) -> [bool; 4] {
    self.to_array().map(pred)
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Classification
  // ───────────────────────────────────────────────────────────────────────────

  #[inline]
  #[must_use]
  pub fn is_nan(self) -> Self {
    self.classify(f32::is_nan)
  }

  /// Either infinity.
  #[inline]
  #[must_use]
  pub fn is_infinity(self) -> Self {
    self.classify(f32::is_infinite)
  }

  #[inline]
  #[must_use]
  pub fn is_positive_infinity(self) -> Self {
    self.classify(|x| x == f32::INFINITY)
  }

  #[inline]
  #[must_use]
  pub fn is_negative_infinity(self) -> Self {
    self.classify(|x| x == f32::NEG_INFINITY)
  }

  #[inline]
  #[must_use]
  pub fn is_finite(self) -> Self {
    self.classify(f32::is_finite)
  }

  #[inline]
  #[must_use]
  pub fn is_integer(self) -> Self {
    self.classify(scalar::is_integer)
  }

  #[inline]
  #[must_use]
  pub fn is_even_integer(self) -> Self {
    self.classify(scalar::is_even_integer)
  }

  #[inline]
  #[must_use]
  pub fn is_odd_integer(self) -> Self {
    self.classify(scalar::is_odd_integer)
  }

  /// Sign bit set (includes `-0.0` and negative NaNs).
  #[inline]
  #[must_use]
  pub fn is_negative(self) -> Self {
    self.classify(bits::sign_bit)
  }

  /// Sign bit clear (includes `+0.0` and positive NaNs).
  #[inline]
  #[must_use]
  pub fn is_positive(self) -> Self {
    self.classify(|x| !bits::sign_bit(x))
  }

  #[inline]
  #[must_use]
  pub fn is_normal(self) -> Self {
    self.classify(f32::is_normal)
  }

  #[inline]
  #[must_use]
  pub fn is_subnormal(self) -> Self {
    self.classify(f32::is_subnormal)
  }

  /// `== 0.0`, so both zeros match.
  #[inline]
  #[must_use]
  pub fn is_zero(self) -> Self {
    self.classify(|x| x == 0.0)
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Comparisons
  // ───────────────────────────────────────────────────────────────────────────

  #[inline]
  #[must_use]
  pub fn equals(self, other: Self) -> Self {
    (kernels::lanes().eq)(self, other)
  }

  #[inline]
  #[must_use]
  pub fn less_than(self, other: Self) -> Self {
    (kernels::lanes().lt)(self, other)
  }

  #[inline]
  #[must_use]
  pub fn less_than_or_equal(self, other: Self) -> Self {
    (kernels::lanes().le)(self, other)
  }

  #[inline]
  #[must_use]
  pub fn greater_than(self, other: Self) -> Self {
    other.less_than(self)
  }

  #[inline]
  #[must_use]
  pub fn greater_than_or_equal(self, other: Self) -> Self {
    other.less_than_or_equal(self)
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Selection and bits
  // ───────────────────────────────────────────────────────────────────────────

  /// `(left & mask) | (right & !mask)`, bit by bit.
  #[inline]
  #[must_use]
  pub fn conditional_select(mask: Self, left: Self, right: Self) -> Self {
    (left & mask) | Self::and_not(right, mask)
  }

  /// Sign bits packed into the low four bits, lane 0 in bit 0.
  #[inline]
  #[must_use]
  pub fn extract_most_significant_bits(self) -> u32 {
    self
      .lanes_where(bits::sign_bit)
      .iter()
      .enumerate()
      .fold(0, |acc, (i, &set)| acc | (u32::from(set) << i))
  }

  /// Lanes picked by index; indices past 3 produce `0.0`.
  #[inline]
  #[must_use]
  pub fn shuffle(self, i0: u8, i1: u8, i2: u8, i3: u8) -> Self {
    let pick = |i: u8| self.get_element(usize::from(i)).unwrap_or(0.0);
    Self::new(pick(i0), pick(i1), pick(i2), pick(i3))
  }

  // ───────────────────────────────────────────────────────────────────────────
  // Searching
  // ───────────────────────────────────────────────────────────────────────────

  #[inline]
  #[must_use]
  pub fn all(self, value: f32) -> bool {
    self.lanes_where(|x| x == value).iter().all(|&b| b)
  }

  #[inline]
  #[must_use]
  pub fn any(self, value: f32) -> bool {
    self.lanes_where(|x| x == value).iter().any(|&b| b)
  }

  #[inline]
  #[must_use]
  pub fn none(self, value: f32) -> bool {
    !self.any(value)
  }

  #[inline]
  #[must_use]
  pub fn count(self, value: f32) -> usize {
    self.lanes_where(|x| x == value).iter().filter(|&&b| b).count()
  }

  /// First lane equal to `value`, or `-1`.
  #[inline]
  #[must_use]
  pub fn index_of(self, value: f32) -> i32 {
    first(self.lanes_where(|x| x == value))
  }

  /// Last lane equal to `value`, or `-1`.
  #[inline]
  #[must_use]
  pub fn last_index_of(self, value: f32) -> i32 {
    last(self.lanes_where(|x| x == value))
  }

  #[inline]
  #[must_use]
  pub fn all_where_all_bits_set(self) -> bool {
    self.lanes_where(bits::is_all_bits_set).iter().all(|&b| b)
  }

  #[inline]
  #[must_use]
  pub fn any_where_all_bits_set(self) -> bool {
    self.lanes_where(bits::is_all_bits_set).iter().any(|&b| b)
  }

  #[inline]
  #[must_use]
  pub fn none_where_all_bits_set(self) -> bool {
    !self.any_where_all_bits_set()
  }

  #[inline]
  #[must_use]
  pub fn count_where_all_bits_set(self) -> usize {
    self.lanes_where(bits::is_all_bits_set).iter().filter(|&&b| b).count()
  }

  #[inline]
  #[must_use]
  pub fn index_of_where_all_bits_set(self) -> i32 {
    first(self.lanes_where(bits::is_all_bits_set))
  }

  #[inline]
  #[must_use]
  pub fn last_index_of_where_all_bits_set(self) -> i32 {
    last(self.lanes_where(bits::is_all_bits_set))
  }
}

fn first(hits: [bool; 4]) -> i32 {
  hits.iter().position(|&b| b).map_or(-1, |i| i as i32)
}

fn last(hits: [bool; 4]) -> i32 {
  hits.iter().rposition(|&b| b).map_or(-1, |i| i as i32)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn flags(mask: Vector4) -> [bool; 4] {
    mask.to_array().map(|l| match l.to_bits() {
      u32::MAX => true,
      0 => false,
      other => panic!("not a mask lane: {other:#x}"),
    })
  }

  #[test]
  fn classification() {
    let v = Vector4::new(f32::NAN, f32::NEG_INFINITY, -0.0, 1.0e-40);
    assert_eq!(flags(v.is_nan()), [true, false, false, false]);
    assert_eq!(flags(v.is_infinity()), [false, true, false, false]);
    assert_eq!(flags(v.is_negative_infinity()), [false, true, false, false]);
    assert_eq!(flags(v.is_positive_infinity()), [false; 4]);
    assert_eq!(flags(v.is_finite()), [false, false, true, true]);
    assert_eq!(flags(v.is_negative()), [false, true, true, false]);
    assert_eq!(flags(v.is_positive()), [true, false, false, true]);
    assert_eq!(flags(v.is_zero()), [false, false, true, false]);
    assert_eq!(flags(v.is_subnormal()), [false, false, false, true]);
    assert_eq!(flags(v.is_normal()), [false; 4]);
  }

  #[test]
  fn integer_masks() {
    let v = Vector4::new(2.0, -3.0, 0.5, f32::INFINITY);
    assert_eq!(flags(v.is_integer()), [true, true, false, false]);
    assert_eq!(flags(v.is_even_integer()), [true, false, false, false]);
    assert_eq!(flags(v.is_odd_integer()), [false, true, false, false]);
  }

  #[test]
  fn comparisons() {
    let a = Vector4::new(1.0, 2.0, f32::NAN, -0.0);
    let b = Vector4::new(2.0, 2.0, f32::NAN, 0.0);
    assert_eq!(flags(a.equals(b)), [false, true, false, true]);
    assert_eq!(flags(a.less_than(b)), [true, false, false, false]);
    assert_eq!(flags(a.less_than_or_equal(b)), [true, true, false, true]);
    assert_eq!(flags(a.greater_than(b)), [false; 4]);
    assert_eq!(flags(a.greater_than_or_equal(b)), [false, true, false, true]);
  }

  #[test]
  fn select_and_sign_bits() {
    let mask = Vector4::new(bits::ALL_BITS_SET, 0.0, bits::ALL_BITS_SET, 0.0);
    let picked = Vector4::conditional_select(mask, Vector4::ONE, Vector4::splat(2.0));
    assert_eq!(picked, Vector4::new(1.0, 2.0, 1.0, 2.0));
    assert_eq!(Vector4::new(-1.0, 1.0, -0.0, -f32::NAN).extract_most_significant_bits(), 0b1101);
    assert_eq!(Vector4::ZERO.extract_most_significant_bits(), 0);
  }

  #[test]
  fn shuffle_zeroes_out_of_range_lanes() {
    let v = Vector4::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(v.shuffle(3, 2, 1, 0), Vector4::new(4.0, 3.0, 2.0, 1.0));
    assert_eq!(v.shuffle(0, 4, 255, 0), Vector4::new(1.0, 0.0, 0.0, 1.0));
  }

  #[test]
  fn searching_by_value() {
    let v = Vector4::new(1.0, 2.0, 1.0, f32::NAN);
    assert!(Vector4::ONE.all(1.0));
    assert!(!v.all(1.0));
    assert!(v.any(2.0));
    assert!(v.none(f32::NAN));
    assert_eq!(v.count(1.0), 2);
    assert_eq!(v.index_of(1.0), 0);
    assert_eq!(v.last_index_of(1.0), 2);
    assert_eq!(v.index_of(7.0), -1);
    assert_eq!(Vector4::ZERO.count(-0.0), 4);
  }

  #[test]
  fn searching_by_bits() {
    let v = Vector4::new(0.0, bits::ALL_BITS_SET, f32::NAN, bits::ALL_BITS_SET);
    assert!(v.any_where_all_bits_set());
    assert!(!v.all_where_all_bits_set());
    assert!(Vector4::ALL_BITS_SET.all_where_all_bits_set());
    assert!(Vector4::ZERO.none_where_all_bits_set());
    assert_eq!(v.count_where_all_bits_set(), 2);
    assert_eq!(v.index_of_where_all_bits_set(), 1);
    assert_eq!(v.last_index_of_where_all_bits_set(), 3);
    assert_eq!(Vector4::ZERO.last_index_of_where_all_bits_set(), -1);
  }
}

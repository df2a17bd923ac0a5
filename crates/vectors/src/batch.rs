//! Slice operations over `&[Vector4]`.
//!
//! Every function checks lengths up front and fails with
//! [`VectorError::LengthMismatch`] before writing anything. Results are
//! bit-identical to applying the single-vector operation element by element.
//!
//! ```
//! use vectors::{Vector4, batch};
//!
//! let a = [Vector4::ONE; 3];
//! let b = [Vector4::splat(2.0); 3];
//! let mut out = [Vector4::ZERO; 3];
//! batch::add(&a, &b, &mut out)?;
//! assert_eq!(out, [Vector4::splat(3.0); 3]);
//!
//! let mut short = [Vector4::ZERO; 2];
//! assert!(batch::add(&a, &b, &mut short).is_err());
//! # Ok::<(), vectors::VectorError>(())
//! ```

use crate::{Matrix4x4, Vector4, VectorError, kernels};

#[inline]
fn same_len(left: usize, right: usize) -> Result<(), VectorError> {
  if left == right {
    Ok(())
  } else {
    Err(VectorError::LengthMismatch { left, right })
  }
}

/// `out[i] = a[i] + b[i]`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] unless all three lengths agree.
pub fn add(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(a.len(), b.len())?;
  same_len(a.len(), out.len())?;
  (kernels::selected_batch().func.add)(a, b, out);
  Ok(())
}

/// `out[i] = a[i] - b[i]`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] unless all three lengths agree.
pub fn sub(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(a.len(), b.len())?;
  same_len(a.len(), out.len())?;
  (kernels::selected_batch().func.sub)(a, b, out);
  Ok(())
}

/// `out[i] = a[i] * b[i]`, lane-wise.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] unless all three lengths agree.
pub fn mul(a: &[Vector4], b: &[Vector4], out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(a.len(), b.len())?;
  same_len(a.len(), out.len())?;
  (kernels::selected_batch().func.mul)(a, b, out);
  Ok(())
}

/// `out[i] = src[i] * factor`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] when `src` and `out` differ in length.
pub fn scale(src: &[Vector4], factor: f32, out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(src.len(), out.len())?;
  (kernels::selected_batch().func.scale)(src, factor, out);
  Ok(())
}

/// `out[i] = Vector4::lerp(a[i], b[i], t)`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] unless all three lengths agree.
pub fn lerp(a: &[Vector4], b: &[Vector4], t: f32, out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(a.len(), b.len())?;
  same_len(a.len(), out.len())?;
  (kernels::selected_batch().func.lerp)(a, b, t, out);
  Ok(())
}

/// `out[i] = a[i].dot(b[i])`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] unless all three lengths agree.
pub fn dot(a: &[Vector4], b: &[Vector4], out: &mut [f32]) -> Result<(), VectorError> {
  same_len(a.len(), b.len())?;
  same_len(a.len(), out.len())?;
  (kernels::selected_batch().func.dot)(a, b, out);
  Ok(())
}

/// `out[i] = Vector4::transform(src[i], m)`.
///
/// # Errors
///
/// [`VectorError::LengthMismatch`] when `src` and `out` differ in length.
pub fn transform(src: &[Vector4], m: &Matrix4x4, out: &mut [Vector4]) -> Result<(), VectorError> {
  same_len(src.len(), out.len())?;
  (kernels::selected_batch().func.transform)(src, m, out);
  Ok(())
}

/// Name of the batch kernel table in use, e.g. `"x86_64/avx"`.
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  kernels::selected_batch().name
}

//! Four-lane `f32` vectors with exact IEEE-754 semantics.
//!
//! [`Vector4`] is a 16-byte `#[repr(C)]` value type. Lane arithmetic goes
//! through a kernel table picked once from the process-wide capability gate
//! (portable, SSE2 or NEON); every candidate produces bit-identical results.
//!
//! # Example
//!
//! ```rust
//! use vectors::Vector4;
//!
//! let a = Vector4::new(1.0, 2.0, 3.0, 4.0);
//! let b = Vector4::new(5.0, 6.0, 7.0, 8.0);
//!
//! assert_eq!(a.dot(b), 70.0);
//! assert_eq!(Vector4::lerp(a, b, 0.5), Vector4::new(3.0, 4.0, 5.0, 6.0));
//! assert_eq!(Vector4::distance_squared(a, b), 64.0);
//! ```
//!
//! # Supporting Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Vector2`], [`Vector3`] | sources for widening constructors and transforms |
//! | [`Matrix4x4`] | row-vector affine transforms, translation in `m41..m43` |
//! | [`Quaternion`] | rotations applied as `q * p * conj(q)` |
//!
//! # Slices
//!
//! [`batch`] applies the same operations to `&[Vector4]`, using AVX (two
//! vectors per register) when the gate reports 256-bit acceleration.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod batch;
pub mod bits;
mod error;
pub mod kernels;
pub mod matrix;
pub mod quaternion;
pub mod scalar;
pub mod vector2;
pub mod vector3;
pub mod vector4;

// Re-export public types
pub use error::VectorError;
pub use matrix::Matrix4x4;
pub use quaternion::Quaternion;
pub use scalar::MidpointRounding;
pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;

/// Name of the lane kernel table in use, e.g. `"x86_64/sse2"`.
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  kernels::selected().name
}

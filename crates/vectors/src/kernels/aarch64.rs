//! NEON lane kernels: one `Vector4` per `float32x4_t`.
//!
//! This file is allowed to use `unsafe` for ISA-specific intrinsics.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

use super::Lane4Kernels;
use crate::Vector4;

pub const LANE4: Lane4Kernels = Lane4Kernels {
  add,
  sub,
  mul,
  div,
  sqrt,
  and,
  or,
  xor,
  and_not,
  eq,
  lt,
  le,
};

#[inline]
#[target_feature(enable = "neon")]
unsafe fn load(v: &Vector4) -> float32x4_t {
  // SAFETY: `Vector4` is `#[repr(C)]` with four contiguous `f32` lanes.
  vld1q_f32(core::ptr::from_ref(v).cast::<f32>())
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn store(r: float32x4_t) -> Vector4 {
  let mut out = Vector4::ZERO;
  // SAFETY: `out` provides 16 writable bytes.
  vst1q_f32(core::ptr::from_mut(&mut out).cast::<f32>(), r);
  out
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn u(a: float32x4_t) -> uint32x4_t {
  vreinterpretq_u32_f32(a)
}

#[inline]
#[target_feature(enable = "neon")]
unsafe fn f(a: uint32x4_t) -> float32x4_t {
  vreinterpretq_f32_u32(a)
}

macro_rules! lane_binary {
  ($($name:ident => |$a:ident, $b:ident| $body:expr),+ $(,)?) => {$(
    #[inline]
    fn $name(a: Vector4, b: Vector4) -> Vector4 {
      #[target_feature(enable = "neon")]
      unsafe fn kernel(a: Vector4, b: Vector4) -> Vector4 {
        let ($a, $b) = (load(&a), load(&b));
        store($body)
      }
      // SAFETY: NEON is part of the aarch64 baseline; the table is selected
      // only when the gate reports 128-bit acceleration.
      unsafe { kernel(a, b) }
    }
  )+};
}

lane_binary! {
  add => |a, b| vaddq_f32(a, b),
  sub => |a, b| vsubq_f32(a, b),
  mul => |a, b| vmulq_f32(a, b),
  div => |a, b| vdivq_f32(a, b),
  and => |a, b| f(vandq_u32(u(a), u(b))),
  or => |a, b| f(vorrq_u32(u(a), u(b))),
  xor => |a, b| f(veorq_u32(u(a), u(b))),
  and_not => |a, b| f(vbicq_u32(u(a), u(b))),
  eq => |a, b| f(vceqq_f32(a, b)),
  lt => |a, b| f(vcltq_f32(a, b)),
  le => |a, b| f(vcleq_f32(a, b)),
}

#[inline]
fn sqrt(a: Vector4) -> Vector4 {
  #[target_feature(enable = "neon")]
  unsafe fn kernel(a: Vector4) -> Vector4 {
    store(vsqrtq_f32(load(&a)))
  }
  // SAFETY: as for the binary lane kernels.
  unsafe { kernel(a) }
}

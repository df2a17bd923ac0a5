//! Fuzz target for single-vector lane kernels.
//!
//! Every runnable candidate must agree bit-for-bit with `portable`, except
//! that any NaN matches any NaN.

#![no_main]

use arbitrary::Arbitrary;
use backend::VectorTier;
use libfuzzer_sys::fuzz_target;
use vectors::{
  Vector4,
  kernels::{self, portable},
};

#[derive(Arbitrary, Debug)]
struct Input {
  a: [u32; 4],
  b: [u32; 4],
}

fn vector(bits: [u32; 4]) -> Vector4 {
  Vector4::from_array(bits.map(f32::from_bits))
}

fn same(x: Vector4, y: Vector4) -> bool {
  x.to_array()
    .iter()
    .zip(y.to_array())
    .all(|(p, q)| p.to_bits() == q.to_bits() || (p.is_nan() && q.is_nan()))
}

fuzz_target!(|input: Input| {
  let (a, b) = (vector(input.a), vector(input.b));
  let reference = portable::LANE4;
  let tier = VectorTier::detected();

  for candidate in kernels::lane4_candidates().iter().filter(|c| c.requires <= tier) {
    let k = candidate.func;
    for (got, want) in [
      ((k.add)(a, b), (reference.add)(a, b)),
      ((k.sub)(a, b), (reference.sub)(a, b)),
      ((k.mul)(a, b), (reference.mul)(a, b)),
      ((k.div)(a, b), (reference.div)(a, b)),
      ((k.sqrt)(a), (reference.sqrt)(a)),
      ((k.and)(a, b), (reference.and)(a, b)),
      ((k.or)(a, b), (reference.or)(a, b)),
      ((k.xor)(a, b), (reference.xor)(a, b)),
      ((k.and_not)(a, b), (reference.and_not)(a, b)),
      ((k.eq)(a, b), (reference.eq)(a, b)),
      ((k.lt)(a, b), (reference.lt)(a, b)),
      ((k.le)(a, b), (reference.le)(a, b)),
    ] {
      assert!(same(got, want), "{}: {got:?} != {want:?}", candidate.name);
    }
  }
});

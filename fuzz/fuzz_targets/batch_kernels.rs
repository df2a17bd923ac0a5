//! Fuzz target for slice batch kernels.
//!
//! Runnable candidates must match `portable` on arbitrary lengths, which
//! exercises the AVX pair loop together with its odd-length tail.

#![no_main]

use arbitrary::Arbitrary;
use backend::VectorTier;
use libfuzzer_sys::fuzz_target;
use vectors::{
  Matrix4x4, Vector4,
  kernels::{self, portable},
};

#[derive(Arbitrary, Debug)]
struct Input {
  a: Vec<[f32; 4]>,
  b: Vec<[f32; 4]>,
  t: f32,
  rows: [[f32; 4]; 4],
}

fn same(x: f32, y: f32) -> bool {
  x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())
}

fn same_vectors(x: &[Vector4], y: &[Vector4]) -> bool {
  x.iter()
    .zip(y)
    .all(|(p, q)| p.to_array().iter().zip(q.to_array()).all(|(l, r)| same(*l, r)))
}

fuzz_target!(|input: Input| {
  let a: Vec<Vector4> = input.a.iter().copied().map(Vector4::from_array).collect();
  let b: Vec<Vector4> = input.b.iter().copied().map(Vector4::from_array).collect();
  let n = a.len().min(b.len());
  let m = Matrix4x4::from_rows(input.rows.map(Vector4::from_array));
  let reference = portable::BATCH;
  let tier = VectorTier::detected();

  let mut want = vec![Vector4::ZERO; n];
  let mut got = vec![Vector4::ZERO; n];
  let mut want_dot = vec![0.0f32; n];
  let mut got_dot = vec![0.0f32; n];

  for candidate in kernels::batch_candidates().iter().filter(|c| c.requires <= tier) {
    let k = candidate.func;

    (reference.add)(&a, &b, &mut want);
    (k.add)(&a, &b, &mut got);
    assert!(same_vectors(&got, &want), "{} add", candidate.name);

    (reference.mul)(&a, &b, &mut want);
    (k.mul)(&a, &b, &mut got);
    assert!(same_vectors(&got, &want), "{} mul", candidate.name);

    (reference.lerp)(&a, &b, input.t, &mut want);
    (k.lerp)(&a, &b, input.t, &mut got);
    assert!(same_vectors(&got, &want), "{} lerp", candidate.name);

    (reference.dot)(&a, &b, &mut want_dot);
    (k.dot)(&a, &b, &mut got_dot);
    assert!(want_dot.iter().zip(&got_dot).all(|(x, y)| same(*x, *y)), "{} dot", candidate.name);

    (reference.transform)(&a[..n], &m, &mut want);
    (k.transform)(&a[..n], &m, &mut got);
    assert!(same_vectors(&got, &want), "{} transform", candidate.name);
  }
});

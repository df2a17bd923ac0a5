//! Every compiled kernel candidate the machine can run agrees bit-for-bit
//! with the portable kernels.

use backend::VectorTier;
use proptest::prelude::*;
use vectors::{
  Matrix4x4, Vector4,
  kernels::{self, BatchKernels, Lane4Kernels, portable},
};

fn runnable<F: Copy>(list: &'static [backend::dispatch::Candidate<F>]) -> impl Iterator<Item = (&'static str, F)> {
  let available = VectorTier::detected();
  list.iter().filter(move |c| c.requires <= available).map(|c| (c.name, c.func))
}

fn lanes_of(v: Vector4) -> [u32; 4] {
  v.to_array().map(f32::to_bits)
}

/// Bit-equal, except that any NaN matches any NaN.
fn agree(a: Vector4, b: Vector4) -> bool {
  a.to_array()
    .into_iter()
    .zip(b.to_array())
    .all(|(x, y)| x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan()))
}

fn check_lanes(name: &str, k: &Lane4Kernels, a: Vector4, b: Vector4) -> Result<(), TestCaseError> {
  let p = &portable::LANE4;
  for (op, fast, slow) in [
    ("add", k.add, p.add),
    ("sub", k.sub, p.sub),
    ("mul", k.mul, p.mul),
    ("div", k.div, p.div),
  ] {
    prop_assert!(agree(fast(a, b), slow(a, b)), "{name}/{op}: {a:?} {b:?}");
  }
  for (op, fast, slow) in [
    ("and", k.and, p.and),
    ("or", k.or, p.or),
    ("xor", k.xor, p.xor),
    ("and_not", k.and_not, p.and_not),
    ("eq", k.eq, p.eq),
    ("lt", k.lt, p.lt),
    ("le", k.le, p.le),
  ] {
    prop_assert_eq!(lanes_of(fast(a, b)), lanes_of(slow(a, b)), "{}/{}", name, op);
  }
  prop_assert!(agree((k.sqrt)(a), (p.sqrt)(a)), "{name}/sqrt: {a:?}");
  Ok(())
}

fn check_batch(name: &str, k: &BatchKernels, a: &[Vector4], b: &[Vector4], t: f32) -> Result<(), TestCaseError> {
  let p = &portable::BATCH;
  let n = a.len();
  let m = Matrix4x4::create_rotation_x(t) * Matrix4x4::create_rotation_z(-t);

  let (mut fast, mut slow) = (vec![Vector4::ZERO; n], vec![Vector4::ZERO; n]);
  for (op, f, s) in [("add", k.add, p.add), ("sub", k.sub, p.sub), ("mul", k.mul, p.mul)] {
    f(a, b, &mut fast);
    s(a, b, &mut slow);
    prop_assert!(fast.iter().zip(&slow).all(|(x, y)| agree(*x, *y)), "{name}/{op}");
  }

  (k.scale)(a, t, &mut fast);
  (p.scale)(a, t, &mut slow);
  prop_assert!(fast.iter().zip(&slow).all(|(x, y)| agree(*x, *y)), "{name}/scale");

  (k.lerp)(a, b, t, &mut fast);
  (p.lerp)(a, b, t, &mut slow);
  prop_assert!(fast.iter().zip(&slow).all(|(x, y)| agree(*x, *y)), "{name}/lerp");

  (k.transform)(a, &m, &mut fast);
  (p.transform)(a, &m, &mut slow);
  prop_assert!(fast.iter().zip(&slow).all(|(x, y)| agree(*x, *y)), "{name}/transform");

  let (mut fd, mut sd) = (vec![0.0f32; n], vec![0.0f32; n]);
  (k.dot)(a, b, &mut fd);
  (p.dot)(a, b, &mut sd);
  prop_assert!(
    fd.iter().zip(&sd).all(|(x, y)| x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())),
    "{name}/dot"
  );
  Ok(())
}

// Test Strategies

fn lane() -> impl Strategy<Value = f32> {
  prop_oneof![
    any::<u32>().prop_map(f32::from_bits),
    -1.0e4f32..1.0e4,
    Just(-0.0f32),
    Just(f32::INFINITY),
    Just(1.0e-40f32),
  ]
}

fn vector() -> impl Strategy<Value = Vector4> {
  [lane(), lane(), lane(), lane()].prop_map(Vector4::from_array)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(512))]

  #[test]
  fn lane_kernels_agree_with_portable(a in vector(), b in vector()) {
    for (name, k) in runnable(kernels::lane4_candidates()) {
      check_lanes(name, &k, a, b)?;
    }
  }

  #[test]
  fn batch_kernels_agree_with_portable(
    pairs in prop::collection::vec((vector(), vector()), 0..19),
    t in -2.0f32..2.0,
  ) {
    let (a, b): (Vec<Vector4>, Vec<Vector4>) = pairs.into_iter().unzip();
    for (name, k) in runnable(kernels::batch_candidates()) {
      check_batch(name, &k, &a, &b, t)?;
    }
  }
}

#[test]
fn selected_tables_are_runnable_candidates() {
  let lane_names: Vec<&str> = runnable(kernels::lane4_candidates()).map(|(n, _)| n).collect();
  assert_eq!(lane_names.first().copied(), Some(vectors::backend_name()));
  let batch_names: Vec<&str> = runnable(kernels::batch_candidates()).map(|(n, _)| n).collect();
  assert_eq!(batch_names.first().copied(), Some(vectors::batch::backend_name()));
}

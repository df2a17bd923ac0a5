use lanes::{Isa, Vector4, VectorTier};

#[test]
fn summary_reflects_the_gate() {
  let s = lanes::summary();
  let gate = lanes::gate();
  assert_eq!(s.arch, gate.arch());
  assert_eq!(s.tier, VectorTier::from_gate(&gate));
  assert_eq!(s.enabled, gate.enabled().len());
  assert_eq!(s.lane_backend, lanes::lane_backend_name());
  assert!(s.to_string().contains(s.batch_backend));
}

#[test]
fn accelerated_vectors_imply_sse2_or_neon() {
  if Vector4::is_hardware_accelerated() {
    let gate = lanes::gate();
    assert!(gate.is_enabled(Isa::Sse2) || gate.is_enabled(Isa::AdvSimd));
  }
}

#[test]
fn registry_is_reexported() {
  assert_eq!(lanes::registry::is_supported("sse2"), Some(lanes::gate().is_enabled(Isa::Sse2)));
  assert_eq!(lanes::registry::is_supported("NOT_A_CAPABILITY"), None);
}

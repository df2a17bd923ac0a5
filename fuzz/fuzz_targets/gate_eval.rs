//! Fuzz target for gate evaluation over synthetic CPUID tables.
//!
//! Any register contents, knob mask and OS policy must yield a gate that
//! honors the parent hierarchy, keeps groups whole, and never enables a
//! capability the hardware or knobs rule out.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::{
  Arch, Gate, Group, Hardware, Knob, Knobs, OsPolicy,
  cpuid::{CpuidRegs, CpuidTable},
  isa::NODES,
};

#[derive(Arbitrary, Debug)]
struct Input {
  leaf0: [u32; 3],
  leaf1: [u32; 4],
  leaf7: [u32; 4],
  leaf7_1: [u32; 4],
  xcr0: u64,
  disabled: u64,
  preferred: u32,
  max_t: u32,
  macos: bool,
}

fuzz_target!(|input: Input| {
  let [ebx, ecx, edx] = input.leaf0;
  let regs = |r: [u32; 4]| CpuidRegs::new(r[0], r[1], r[2], r[3]);
  let table = CpuidTable::new()
    .with(0, 0, CpuidRegs::new(7, ebx, ecx, edx))
    .with(1, 0, regs(input.leaf1))
    .with(7, 0, regs(input.leaf7))
    .with(7, 1, regs(input.leaf7_1))
    .with_xcr0(input.xcr0);
  let hw = Hardware::from_cpuid(Arch::X86_64, &table);

  let knobs = Knob::ALL
    .iter()
    .enumerate()
    .filter(|(i, _)| input.disabled & (1 << i) != 0)
    .fold(Knobs::all_enabled(), |k, (_, knob)| k.with_disabled(*knob))
    .with_preferred_vector_bit_width(input.preferred)
    .with_max_vector_t_bit_width(input.max_t);
  let policy = if input.macos { OsPolicy::MACOS } else { OsPolicy::NONE };

  let gate = Gate::evaluate(&hw, &knobs, policy);
  assert_eq!(gate, Gate::evaluate(&hw, &knobs, policy));

  // ─── Hierarchy ───
  for node in &NODES {
    if gate.is_enabled(node.isa) {
      assert!(hw.caps.has(node.requires));
      assert!(knobs.all(node.knobs));
      for parent in node.parents {
        assert!(gate.is_enabled(*parent));
      }
    }
  }

  // ─── Groups ───
  for group in Group::ALL {
    let on = gate.enabled().intersection(group.members());
    assert!(on.is_empty() || on == group.members());
  }

  // ─── Widths ───
  let w = gate.widths();
  assert!(w.preferred_vector_byte_length % 16 == 0);
  assert!(w.vector_t_byte_length >= 16);
  assert!(!w.vector512_accelerated || w.vector256_accelerated);
  assert!(!w.vector256_accelerated || w.vector128_accelerated);
});

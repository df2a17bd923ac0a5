//! Fuzz target for `Caps` and `IsaSet` set algebra.
//!
//! Checks commutativity, associativity and absorption, and that the
//! subset relation agrees with union and intersection.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::{Caps, IsaSet};

#[derive(Arbitrary, Debug)]
struct Input {
  a: [u64; 2],
  b: [u64; 2],
  c: [u64; 2],
  isa_a: u64,
  isa_b: u64,
}

fuzz_target!(|input: Input| {
  let a = Caps::from_raw(input.a);
  let b = Caps::from_raw(input.b);
  let c = Caps::from_raw(input.c);

  // ─── Commutativity ───
  assert_eq!(a | b, b | a);
  assert_eq!(a & b, b & a);

  // ─── Associativity ───
  assert_eq!((a | b) | c, a | (b | c));
  assert_eq!((a & b) & c, a & (b & c));

  // ─── Subsets ───
  let union = a | b;
  let inter = a & b;
  assert!(union.has(a) && union.has(b));
  assert!(a.has(inter) && b.has(inter));
  assert!(union.count() >= a.count().max(b.count()));
  assert!(inter.count() <= a.count().min(b.count()));
  assert!(a.difference(b).intersection(b).is_empty());

  // ─── Absorption ───
  assert_eq!(a | (a & b), a);
  assert_eq!(a & (a | b), a);

  // ─── IsaSet ───
  let x = IsaSet::from_raw(input.isa_a);
  let y = IsaSet::from_raw(input.isa_b);
  assert_eq!(x.intersection(y), y.intersection(x));
  assert!(x.difference(y).intersection(y).is_empty());
  for isa in x.iter() {
    assert!(x.contains(isa));
    assert!(!x.without(isa).contains(isa));
  }
});

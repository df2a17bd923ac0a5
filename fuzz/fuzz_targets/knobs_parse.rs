//! Fuzz target for environment knob parsing.
//!
//! Arbitrary variable values must never panic, only an exact zero disables a
//! knob, and widths come out as multiples of 128 bits.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::{
  Knob, Knobs,
  knobs::{ENV_MAX_VECTOR_T_BIT_WIDTH, ENV_PREFERRED_VECTOR_BIT_WIDTH, ENV_PREFIX},
};

#[derive(Arbitrary, Debug)]
struct Input {
  value: String,
  knob: u8,
  preferred: String,
  max_t: String,
}

fuzz_target!(|input: Input| {
  let knob = Knob::ALL[usize::from(input.knob) % Knob::ALL.len()];
  let target = format!("{ENV_PREFIX}{}", knob.name());

  let knobs = Knobs::from_lookup(|name: &str| {
    if name == target {
      Some(input.value.as_str())
    } else if name == ENV_PREFERRED_VECTOR_BIT_WIDTH {
      Some(input.preferred.as_str())
    } else if name == ENV_MAX_VECTOR_T_BIT_WIDTH {
      Some(input.max_t.as_str())
    } else {
      None
    }
  });

  for other in Knob::ALL {
    if other != knob {
      assert!(knobs.is_enabled(other));
    }
  }
  assert_eq!(knobs.preferred_vector_bit_width() % 128, 0);
  assert_eq!(knobs.max_vector_t_bit_width() % 128, 0);

  let zero = input.value.trim().parse::<i64>() == Ok(0);
  assert_eq!(knobs.is_enabled(knob), !zero);
});

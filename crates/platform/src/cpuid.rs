//! Raw CPU query boundary.
//!
//! The gate never executes `cpuid` itself. It asks a [`CpuidSource`] for the four
//! 32-bit registers of a `(leaf, subleaf)` query plus the XCR0 state mask, which
//! keeps every decision above this module a pure function that tests and fuzzers
//! can drive with synthetic register tables.

/// Output of one CPUID query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuidRegs {
  pub eax: u32,
  pub ebx: u32,
  pub ecx: u32,
  pub edx: u32,
}

impl CpuidRegs {
  #[inline]
  #[must_use]
  pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
    Self { eax, ebx, ecx, edx }
  }

  /// All registers zero: what an unsupported leaf reports.
  pub const ZERO: Self = Self::new(0, 0, 0, 0);
}

/// Tests bit `n` of a register.
#[inline(always)]
#[must_use]
pub(crate) const fn bit(reg: u32, n: u32) -> bool {
  reg & (1 << n) != 0
}

/// A source of raw CPUID results.
pub trait CpuidSource {
  /// Query `leaf`/`subleaf`.
  fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs;

  /// The XCR0 extended-state mask. Only consulted when leaf 1 reports OSXSAVE.
  fn xcr0(&self) -> u64;
}

// ─────────────────────────────────────────────────────────────────────────────
// Native source
// ─────────────────────────────────────────────────────────────────────────────

/// Executes the real `cpuid`/`xgetbv` instructions.
///
/// On non-x86 targets every query returns [`CpuidRegs::ZERO`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeCpuid;

impl CpuidSource for NativeCpuid {
  #[inline]
  #[allow(unsafe_code)]
  fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
    #[cfg(target_arch = "x86_64")]
    {
      // SAFETY: CPUID is part of the x86_64 baseline.
      #[allow(unused_unsafe)]
      let r = unsafe { core::arch::x86_64::__cpuid_count(leaf, subleaf) };
      CpuidRegs::new(r.eax, r.ebx, r.ecx, r.edx)
    }

    #[cfg(target_arch = "x86")]
    {
      // SAFETY: every x86 target Rust supports (i586+) implements CPUID.
      #[allow(unused_unsafe)]
      let r = unsafe { core::arch::x86::__cpuid_count(leaf, subleaf) };
      CpuidRegs::new(r.eax, r.ebx, r.ecx, r.edx)
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
    {
      let _ = (leaf, subleaf);
      CpuidRegs::ZERO
    }
  }

  #[inline]
  #[allow(unsafe_code)]
  fn xcr0(&self) -> u64 {
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
      // XGETBV faults unless the OS set CR4.OSXSAVE, which leaf 1 ECX bit 27 mirrors.
      if !bit(self.cpuid(1, 0).ecx, 27) {
        return 0;
      }

      #[cfg(target_arch = "x86_64")]
      // SAFETY: OSXSAVE is set (checked above), so XGETBV is available.
      let xcr0 = unsafe { xgetbv_x86_64() };
      #[cfg(target_arch = "x86")]
      // SAFETY: OSXSAVE is set (checked above), so XGETBV is available.
      let xcr0 = unsafe { xgetbv_x86() };
      xcr0
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
    {
      0
    }
  }
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
#[target_feature(enable = "xsave")]
unsafe fn xgetbv_x86_64() -> u64 {
  core::arch::x86_64::_xgetbv(0)
}

#[cfg(target_arch = "x86")]
#[allow(unsafe_code)]
#[target_feature(enable = "xsave")]
unsafe fn xgetbv_x86() -> u64 {
  core::arch::x86::_xgetbv(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Table source
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum number of `(leaf, subleaf)` entries a [`CpuidTable`] holds.
pub const TABLE_CAPACITY: usize = 8;

/// A fixed CPUID table for tests and fuzzing.
///
/// Leaves not present in the table report [`CpuidRegs::ZERO`], like a CPU that
/// doesn't implement them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuidTable {
  entries: [(u32, u32, CpuidRegs); TABLE_CAPACITY],
  len: usize,
  xcr0: u64,
}

impl Default for CpuidTable {
  fn default() -> Self {
    Self::new()
  }
}

impl CpuidTable {
  /// XCR0 with SSE, AVX and AVX-512 state enabled.
  pub const XCR0_ALL: u64 = 0xE7;

  /// An empty table with full OS vector state.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      entries: [(0, 0, CpuidRegs::ZERO); TABLE_CAPACITY],
      len: 0,
      xcr0: Self::XCR0_ALL,
    }
  }

  /// Add or replace the registers for `leaf`/`subleaf`.
  ///
  /// Entries past [`TABLE_CAPACITY`] are dropped.
  #[must_use]
  pub fn with(mut self, leaf: u32, subleaf: u32, regs: CpuidRegs) -> Self {
    if let Some(slot) = self.entries[..self.len]
      .iter_mut()
      .find(|(l, s, _)| *l == leaf && *s == subleaf)
    {
      slot.2 = regs;
      return self;
    }
    if let Some(slot) = self.entries.get_mut(self.len) {
      *slot = (leaf, subleaf, regs);
      self.len += 1;
    }
    self
  }

  #[must_use]
  pub const fn with_xcr0(mut self, xcr0: u64) -> Self {
    self.xcr0 = xcr0;
    self
  }
}

impl CpuidSource for CpuidTable {
  fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegs {
    self.entries[..self.len]
      .iter()
      .find(|(l, s, _)| *l == leaf && *s == subleaf)
      .map_or(CpuidRegs::ZERO, |(_, _, regs)| *regs)
  }

  fn xcr0(&self) -> u64 {
    self.xcr0
  }
}

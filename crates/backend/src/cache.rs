//! Lazy, process-wide cache for selected kernel tables.
//!
//! - **std**: `OnceLock`
//! - **no_std with atomics**: UNINIT/INITING/READY state machine
//! - **no_std without atomics**: recomputed on every call

#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
use core::{cell::UnsafeCell, mem::MaybeUninit};

/// A write-once cell for `Copy` values.
pub struct OnceCache<T: Copy> {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<T>,

  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  state: core::sync::atomic::AtomicU8,
  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  value: UnsafeCell<MaybeUninit<T>>,

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
  _marker: core::marker::PhantomData<T>,
}

// SAFETY: `value` is written once by the thread that wins UNINIT -> INITING and
// only read after READY is observed with Acquire.
#[allow(unsafe_code)]
#[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
unsafe impl<T: Copy + Send + Sync> Sync for OnceCache<T> {}

impl<T: Copy> core::fmt::Debug for OnceCache<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("OnceCache").finish_non_exhaustive()
  }
}

impl<T: Copy> OnceCache<T> {
  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  const UNINIT: u8 = 0;
  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  const INITING: u8 = 1;
  #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
  const READY: u8 = 2;

  #[must_use]
  pub const fn new() -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),

      #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
      state: core::sync::atomic::AtomicU8::new(0),
      #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
      value: UnsafeCell::new(MaybeUninit::uninit()),

      #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
      _marker: core::marker::PhantomData,
    }
  }

  /// The cached value, computing it with `f` on first use.
  ///
  /// `f` runs at most once on targets with atomics.
  #[inline]
  pub fn get_or_init(&self, f: impl FnOnce() -> T) -> T {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(f)
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
    {
      use core::sync::atomic::Ordering;

      if self.state.load(Ordering::Acquire) == Self::READY {
        // SAFETY: initialized once READY is observed.
        #[allow(unsafe_code)]
        return unsafe { (*self.value.get()).assume_init() };
      }

      if self
        .state
        .compare_exchange(Self::UNINIT, Self::INITING, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
      {
        let value = f();
        // SAFETY: exclusive access while INITING.
        #[allow(unsafe_code)]
        unsafe {
          (*self.value.get()).write(value);
        }
        self.state.store(Self::READY, Ordering::Release);
        return value;
      }

      while self.state.load(Ordering::Acquire) != Self::READY {
        core::hint::spin_loop();
      }
      // SAFETY: initialized once READY is observed.
      #[allow(unsafe_code)]
      unsafe {
        (*self.value.get()).assume_init()
      }
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
    {
      f()
    }
  }

  /// The cached value if already computed.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Option<T> {
    #[cfg(feature = "std")]
    {
      self.inner.get().copied()
    }

    #[cfg(all(not(feature = "std"), target_has_atomic = "8"))]
    {
      use core::sync::atomic::Ordering;
      if self.state.load(Ordering::Acquire) != Self::READY {
        return None;
      }
      // SAFETY: initialized once READY is observed.
      #[allow(unsafe_code)]
      Some(unsafe { (*self.value.get()).assume_init() })
    }

    #[cfg(all(not(feature = "std"), not(target_has_atomic = "8")))]
    {
      None
    }
  }
}

impl<T: Copy> Default for OnceCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn initializes_once() {
    static CACHE: OnceCache<(u32, u64)> = OnceCache::new();

    assert!(CACHE.get().is_none() || CACHE.get() == Some((42, 123)));

    let mut calls = 0;
    let v = CACHE.get_or_init(|| {
      calls += 1;
      (42, 123)
    });
    assert_eq!(v, (42, 123));

    let v = CACHE.get_or_init(|| {
      calls += 1;
      (99, 999)
    });
    assert_eq!(v, (42, 123));
    assert_eq!(CACHE.get(), Some((42, 123)));

    #[cfg(any(feature = "std", target_has_atomic = "8"))]
    assert_eq!(calls, 1);
  }

  #[test]
  fn caches_function_pointers() {
    fn double(x: u32) -> u32 {
      x * 2
    }
    static CACHE: OnceCache<fn(u32) -> u32> = OnceCache::new();
    let f = CACHE.get_or_init(|| double);
    assert_eq!(f(21), 42);
  }
}

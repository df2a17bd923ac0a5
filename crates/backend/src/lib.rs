//! Backend crate: tiered kernel selection for the lanes workspace.
//!
//! - **Tiers**: [`VectorTier`] ranks register widths (scalar, 128, 256, 512 bits)
//! - **Dispatch**: ordered [`Candidate`](dispatch::Candidate) lists resolved with
//!   [`select`](dispatch::select)
//! - **Caching**: [`OnceCache`] holds the selection for the life of the process
//!
//! Kernel crates register kernels best first with the [`candidates!`] macro,
//! select once against the tier of the process-wide gate, and call through the
//! cached function table afterwards.
//!
//! ```ignore
//! static KERNELS: OnceCache<Selected<AddFn>> = OnceCache::new();
//!
//! fn add_kernel() -> Selected<AddFn> {
//!   KERNELS.get_or_init(|| {
//!     select(VectorTier::detected(), candidates![
//!       "x86_64/avx"  => VectorTier::V256   => add_avx,
//!       "x86_64/sse2" => VectorTier::V128   => add_sse2,
//!       "portable"    => VectorTier::Scalar => add_portable,
//!     ])
//!     .unwrap_or(Selected::new("portable", add_portable))
//!   })
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;
pub mod tier;

pub use cache::OnceCache;
pub use dispatch::{Candidate, Selected, select};
pub use platform;
pub use tier::VectorTier;

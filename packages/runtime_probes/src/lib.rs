#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Diagnostic probes that observe implementation-defined behavior of the Rust runtime and
//! standard library on the current toolchain and target.
//!
//! Each probe is a small experiment: it builds containers, assigns vectors, sorts slices or
//! inspects type layouts, and describes what it observed as plain English lines. Many probes
//! measure heap allocations through the [`alloc_watch`] package, which must be installed as
//! the global allocator of the process running them.
//!
//! The probes are listed in the [`catalog()`] and run through [`run_probes()`], which contains
//! the failure of any one probe so the rest still run.
//!
//! # Running probes
//!
//! ```
//! use alloc_watch::CountingAllocator;
//! use runtime_probes::{Context, run_probes, select};
//!
//! #[global_allocator]
//! static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
//!
//! fn main() {
//!     let mut stdout = std::io::stdout();
//!     let mut ctx = Context::new(ALLOCATOR.counters(), &mut stdout);
//!
//!     let probes = select(&["toolchain", "struct_reordering"]).unwrap();
//!     let summary = run_probes(&mut ctx, &probes);
//!
//!     assert_eq!(summary.failed(), 0);
//! }
//! ```
//!
//! The `runtime_probes` binary does the same for the probes named on its command line.

mod context;
mod error;
pub mod format;
mod growth;
mod monitor;
pub mod probes;
mod runner;
mod search;

pub use context::*;
pub use error::*;
pub use growth::*;
pub use monitor::*;
pub use runner::*;
pub use search::*;

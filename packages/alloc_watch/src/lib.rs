#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Allocation counting for diagnostic probes.
//!
//! This package provides a global allocator wrapper that counts every heap allocation and
//! deallocation made by the process, optionally announcing each event on standard output,
//! plus a scoped tracker that measures how many allocations happen during its lifetime.
//!
//! The core functionality includes:
//! - [`CountingAllocator`] - A Rust memory allocator wrapper that counts allocation events
//! - [`Counters`] - The counters and announcement flags owned by the allocator
//! - [`AllocationTracker`] - Measures the allocation delta between its creation and drop
//!
//! This package is not meant for use in production, serving only as a development tool.
//!
//! # Simple usage
//!
//! ```
//! use alloc_watch::{AllocationTracker, CountingAllocator, Messages, Scope};
//!
//! #[global_allocator]
//! static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
//!
//! fn main() {
//!     let tracker = AllocationTracker::new(ALLOCATOR.counters(), Scope::Thread, Messages::NONE)
//!         .unwrap();
//!
//!     let data = vec![1, 2, 3, 4, 5]; // This allocates memory.
//!     std::hint::black_box(&data);
//!
//!     assert_eq!(tracker.allocations_made(), 1);
//! }
//! ```
//!
//! # Announcements
//!
//! A tracker can ask the allocator to print a line for every allocation (and deallocation)
//! event while it is alive. Only one tracker may announce at a time: enabling an announcement
//! flag that is already enabled fails with [`Error::AlreadyEnabled`].
//!
//! # Miri compatibility
//!
//! Miri replaces the global allocator with its own logic, so you cannot execute code that uses
//! this package under Miri.

mod allocator;
mod error;
mod tracker;

pub use allocator::*;
pub use error::*;
pub use tracker::*;

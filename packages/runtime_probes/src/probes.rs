//! The probes. Every probe is an independent experiment with the signature of
//! [`ProbeFn`][crate::ProbeFn] that describes its observations on the context output.
//!
//! Probes that measure something also expose the measurement as a function returning the
//! value, so the observation itself can be checked without parsing prose.

use std::hint::black_box;

use alloc_watch::Messages;

use crate::{Context, Result};

pub mod atomics;
pub mod call_counts;
pub mod enum_widths;
pub mod growth_curves;
pub mod inline_storage;
pub mod layout;
pub mod maps;
pub mod shared_pointers;
pub mod sorting;
pub mod toolchain;
pub mod vectors;

/// Writes `description` as a line, then runs `action` while announcing every allocation.
///
/// If `action` allocates nothing, `Made no allocations.` is announced instead. Returns the
/// number of allocation events.
pub(crate) fn announce_allocations<T>(
    ctx: &mut Context<'_>,
    description: &str,
    action: impl FnOnce() -> T,
) -> Result<u64> {
    writeln!(ctx.out(), "{description}")?;
    ctx.out().flush()?;

    let tracker = ctx.track(Messages::ALLOCATIONS)?;
    let result = black_box(action());
    let allocations = tracker.allocations_made();

    // The value is dropped after the tracker so that its deallocation is not announced
    // as part of the next description.
    drop(tracker);
    drop(result);

    Ok(allocations)
}

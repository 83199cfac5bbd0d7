//! Small-buffer optimization: how long a value can get before it needs the heap.

use std::hint::black_box;
use std::mem;

use alloc_watch::Messages;
use smallvec::SmallVec;

use crate::format::{INDENTATION, pluralize, with_thousands_separators};
use crate::{Context, Result, largest_satisfying};

/// The largest length the search considers.
pub const SEARCH_LIMIT: usize = 1 << 24;

/// Counts the allocations made by `build(len)`.
///
/// # Errors
///
/// Fails if allocation tracking cannot be set up.
pub fn allocations_to_build<T>(
    ctx: &Context<'_>,
    len: usize,
    build: impl FnOnce(usize) -> T,
) -> Result<u64> {
    let tracker = ctx.track(Messages::NONE)?;
    let value = black_box(build(len));
    let allocations = tracker.allocations_made();

    drop(tracker);
    drop(value);

    Ok(allocations)
}

/// Finds the largest length in `1..=SEARCH_LIMIT` for which `build` makes no allocation.
///
/// Returns 0 if every length allocates. Assumes that once a length allocates, every longer
/// length does too.
///
/// # Errors
///
/// Fails if allocation tracking cannot be set up.
pub fn max_inline_len<T>(ctx: &Context<'_>, build: impl Fn(usize) -> T) -> Result<usize> {
    largest_satisfying(SEARCH_LIMIT, |len| -> Result<bool> {
        Ok(allocations_to_build(ctx, len, &build)? == 0)
    })
}

fn describe(ctx: &mut Context<'_>, subject: &str, max_inline: usize) -> Result<()> {
    let max_inline: u64 = max_inline.try_into().expect("usize always fits into u64");

    if max_inline == 0 {
        writeln!(
            ctx.out(),
            "{INDENTATION}{subject}: no small buffer optimization, every non-empty value allocates."
        )?;
    } else {
        writeln!(
            ctx.out(),
            "{INDENTATION}{subject}: small buffer optimization for up to {}.",
            pluralize(max_inline, "byte")
        )?;
    }

    Ok(())
}

/// Searches for the inline capacity of `String`, `Box<[u8]>` and two `SmallVec` sizes.
///
/// # Errors
///
/// Fails if the output cannot be written or allocation tracking cannot be set up.
pub fn small_buffer_optimization(ctx: &mut Context<'_>) -> Result<()> {
    let string_size: u64 = mem::size_of::<String>()
        .try_into()
        .expect("usize always fits into u64");
    let max_string: u64 = isize::MAX.unsigned_abs().try_into().expect("usize always fits into u64");

    writeln!(
        ctx.out(),
        "String takes {} and can hold at most {} bytes.",
        pluralize(string_size, "byte"),
        with_thousands_separators(max_string)
    )?;
    writeln!(
        ctx.out(),
        "Searching for the longest values that can be built without allocating."
    )?;

    let string = max_inline_len(ctx, |len| "A".repeat(len))?;
    describe(ctx, "String", string)?;

    let boxed = max_inline_len(ctx, |len| vec![b'A'; len].into_boxed_slice())?;
    describe(ctx, "Box<[u8]>", boxed)?;

    let small = max_inline_len(ctx, |len| SmallVec::<[u8; 16]>::from_elem(b'A', len))?;
    describe(ctx, "SmallVec<[u8; 16]>", small)?;

    let larger = max_inline_len(ctx, |len| SmallVec::<[u8; 64]>::from_elem(b'A', len))?;
    describe(ctx, "SmallVec<[u8; 64]>", larger)?;

    Ok(())
}

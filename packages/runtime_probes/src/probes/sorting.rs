//! Whether the slice sorting algorithms allocate scratch memory.

use std::hint::black_box;
use std::iter;

use alloc_watch::Messages;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::format::{type_description, with_thousands_separators};
use crate::{Context, Result};

/// The smallest and largest number of elements sorted. Every size in between is ten times the
/// previous one.
const SIZES: (usize, usize) = (10, 1_000_000);

/// A sorting function to probe.
pub type SortFn = fn(&mut [u32]);

/// Generates `len` pseudo-random values, the same ones on every run.
#[must_use]
pub fn random_values(len: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(0);

    (0..len).map(|_| rng.random()).collect()
}

/// Counts the allocations made while sorting `values`.
///
/// # Errors
///
/// Fails if the requested announcements cannot be enabled.
pub fn sort_allocations(
    ctx: &Context<'_>,
    values: &mut [u32],
    sort: SortFn,
    messages: Messages,
) -> Result<u64> {
    let tracker = ctx.track(messages)?;
    sort(black_box(values));

    Ok(tracker.allocations_made())
}

fn sizes() -> impl Iterator<Item = usize> {
    iter::successors(Some(SIZES.0), |size| size.checked_mul(10))
        .take_while(|size| *size <= SIZES.1)
}

fn announce_sorts(ctx: &mut Context<'_>, name: &str, sort: SortFn) -> Result<()> {
    for size in sizes() {
        let mut values = random_values(size);
        let size: u64 = size.try_into().expect("usize always fits into u64");

        writeln!(
            ctx.out(),
            "Running {name} on {} {} elements.",
            with_thousands_separators(size),
            type_description::<u32>()
        )?;
        ctx.out().flush()?;

        sort_allocations(ctx, &mut values, sort, Messages::ALLOCATIONS)?;
    }

    Ok(())
}

/// Announces the allocations made by `sort_unstable()` for growing inputs.
///
/// # Errors
///
/// Fails if the output cannot be written or allocations cannot be announced.
pub fn unstable(ctx: &mut Context<'_>) -> Result<()> {
    announce_sorts(ctx, "sort_unstable()", <[u32]>::sort_unstable)
}

/// Announces the allocations made by the stable `sort()` for growing inputs.
///
/// # Errors
///
/// Fails if the output cannot be written or allocations cannot be announced.
pub fn stable(ctx: &mut Context<'_>) -> Result<()> {
    announce_sorts(ctx, "sort()", <[u32]>::sort)
}

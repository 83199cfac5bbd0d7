//! Allocations of `Vec` assignment and lifetime, and the size limit of `Vec`.

use std::hint::black_box;
use std::mem;

use alloc_watch::Messages;

use crate::format::{INDENTATION, type_description, with_thousands_separators};
use crate::{Context, Result};

/// Vector lengths combined pairwise by the assignment probe.
const ASSIGNMENT_SIZES: [usize; 3] = [10, 100, 1000];

/// Length of the vectors created by the scoped blocks probe.
const BLOCK_VECTOR_SIZE: usize = 4;

/// Counts the allocations made by `lhs.clone_from(&rhs)` for byte vectors of the given lengths.
///
/// # Errors
///
/// Fails if the requested announcements cannot be enabled.
pub fn clone_from_allocations(
    ctx: &Context<'_>,
    lhs_len: usize,
    rhs_len: usize,
    messages: Messages,
) -> Result<u64> {
    let mut lhs = vec![0_u8; lhs_len];
    let rhs = vec![1_u8; rhs_len];

    let tracker = ctx.track(messages)?;
    lhs.clone_from(&rhs);
    black_box(&lhs);

    Ok(tracker.allocations_made())
}

/// Announces the allocations made by assigning vectors of every size to vectors of every size.
///
/// # Errors
///
/// Fails if the output cannot be written or allocations cannot be announced.
pub fn assignment(ctx: &mut Context<'_>) -> Result<()> {
    for lhs_len in ASSIGNMENT_SIZES {
        for rhs_len in ASSIGNMENT_SIZES {
            write!(
                ctx.out(),
                "Testing assigning vector of size {rhs_len} to a vector of size {lhs_len}. "
            )?;
            ctx.out().flush()?;

            clone_from_allocations(ctx, lhs_len, rhs_len, Messages::ALLOCATIONS)?;
        }
    }

    Ok(())
}

/// Announces allocations and deallocations of short-lived vectors in nested blocks.
///
/// # Errors
///
/// Fails if the output cannot be written or allocations cannot be announced.
pub fn scoped_blocks(ctx: &mut Context<'_>) -> Result<()> {
    let _tracker = ctx.track(Messages::ALL)?;

    writeln!(
        ctx.out(),
        "Creating two vectors of size {BLOCK_VECTOR_SIZE} in the same block."
    )?;
    {
        let first = black_box(vec![0_u8; BLOCK_VECTOR_SIZE]);
        let second = black_box(vec![0_u8; BLOCK_VECTOR_SIZE]);
        drop((first, second));
    }

    writeln!(
        ctx.out(),
        "Creating two vectors of size {BLOCK_VECTOR_SIZE} in two consecutive blocks."
    )?;
    {
        drop(black_box(vec![0_u8; BLOCK_VECTOR_SIZE]));
    }
    {
        drop(black_box(vec![0_u8; BLOCK_VECTOR_SIZE]));
    }

    Ok(())
}

/// The largest number of elements a `Vec<T>` can hold: no allocation may exceed `isize::MAX`
/// bytes. Zero-sized elements are not limited by memory at all.
#[must_use]
pub fn maximum_len<T>() -> usize {
    let max_bytes = usize::try_from(isize::MAX).expect("isize::MAX always fits into usize");

    max_bytes
        .checked_div(mem::size_of::<T>())
        .unwrap_or(usize::MAX)
}

/// Describes the maximum sizes of vectors of a few element types and what happens when
/// reserving past them.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn maximum_size(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(out, "Testing the maximum size of Vec.")?;

    for (element, max) in [
        (type_description::<u8>(), maximum_len::<u8>()),
        (type_description::<u32>(), maximum_len::<u32>()),
        (type_description::<u64>(), maximum_len::<u64>()),
        (type_description::<()>(), maximum_len::<()>()),
    ] {
        let max: u64 = max.try_into().expect("usize always fits into u64");
        writeln!(
            out,
            "{INDENTATION}A Vec of {element} can hold at most {} elements.",
            with_thousands_separators(max)
        )?;
    }

    writeln!(
        out,
        "{INDENTATION}An empty Vec<()> reports a capacity of {}.",
        Vec::<()>::new().capacity()
    )?;

    match Vec::<u8>::new().try_reserve(usize::MAX) {
        Ok(()) => writeln!(out, "{INDENTATION}Reserving usize::MAX bytes succeeded.")?,
        Err(e) => writeln!(out, "{INDENTATION}Reserving usize::MAX bytes fails: {e}.")?,
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn maximum_len_divides_by_element_size() {
        let max_bytes = usize::try_from(isize::MAX).unwrap();

        assert_eq!(maximum_len::<u8>(), max_bytes);
        assert_eq!(maximum_len::<u32>(), max_bytes / 4);
        assert_eq!(maximum_len::<[u8; 3]>(), max_bytes / 3);
    }

    #[test]
    fn zero_sized_elements_are_unlimited() {
        assert_eq!(maximum_len::<()>(), usize::MAX);
        assert_eq!(Vec::<()>::new().capacity(), usize::MAX);
    }
}

//! How many allocations the reference-counted pointers make depending on how they are built.

use std::rc::Rc;
use std::sync::Arc;

use super::announce_allocations;
use crate::{Context, Result};

const LARGE: usize = 128;

/// Announces the allocations made by building `Arc` and `Rc` values in different ways.
///
/// `Arc::new()` places the counters and the value in one allocation. Converting from an
/// existing `Box` needs a second allocation for the combined block.
///
/// # Errors
///
/// Fails if the output cannot be written or allocations cannot be announced.
pub fn allocations(ctx: &mut Context<'_>) -> Result<()> {
    announce_allocations(ctx, "Testing Arc::new(u64).", || Arc::new(42_u64))?;

    announce_allocations(ctx, "Testing Arc::from(Box::new(u64)).", || {
        Arc::<u64>::from(Box::new(42_u64))
    })?;

    announce_allocations(
        ctx,
        &format!("Testing Arc::new([u8; {LARGE}])."),
        || Arc::new([0_u8; LARGE]),
    )?;

    announce_allocations(
        ctx,
        &format!("Testing Arc::from(Box::new([u8; {LARGE}]))."),
        || Arc::<[u8; LARGE]>::from(Box::new([0_u8; LARGE])),
    )?;

    announce_allocations(ctx, "Testing Rc::new(u64).", || Rc::new(42_u64))?;

    announce_allocations(ctx, "Testing Arc::<str>::from(&str).", || {
        Arc::<str>::from("shared text")
    })?;

    Ok(())
}

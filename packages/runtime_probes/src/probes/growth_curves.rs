//! How the standard containers grow their capacity as elements are added.

use std::collections::{HashSet, VecDeque};

use crate::format::{INDENTATION, with_thousands_separators};
use crate::{Context, GrowthCurve, GrowthStep, Result};

/// Number of elements each growth probe inserts.
pub const TARGET_SIZE: usize = 1_000_000;

/// Inserts `count` elements via `insert` and returns every capacity change along the way.
///
/// `insert` receives the index of the element to insert and returns the capacity afterwards.
pub fn growth_steps(
    initial: usize,
    count: usize,
    mut insert: impl FnMut(usize) -> usize,
) -> Vec<GrowthStep> {
    let mut curve = GrowthCurve::new(initial);

    (0..count)
        .filter_map(|index| curve.observe(insert(index)))
        .collect()
}

fn describe_growth(
    ctx: &mut Context<'_>,
    container: &str,
    initial: usize,
    insert: impl FnMut(usize) -> usize,
) -> Result<()> {
    // Observation happens before printing so that output cannot disturb the container.
    let steps = growth_steps(initial, TARGET_SIZE, insert);
    let target: u64 = TARGET_SIZE.try_into().expect("usize always fits into u64");

    let out = ctx.out();
    writeln!(
        out,
        "Testing {container} growth over {} insertions.",
        with_thousands_separators(target)
    )?;
    writeln!(out, "{INDENTATION}It started with a capacity of {initial}.")?;

    for step in steps {
        writeln!(out, "{step}")?;
    }

    Ok(())
}

fn element(index: usize) -> i32 {
    i32::try_from(index).expect("element indexes stay below TARGET_SIZE, which fits into i32")
}

/// Describes the capacities a `Vec<i32>` passes through.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn vec(ctx: &mut Context<'_>) -> Result<()> {
    let mut values: Vec<i32> = Vec::new();
    let initial = values.capacity();

    describe_growth(ctx, "Vec<i32>", initial, |index| {
        values.push(element(index));
        values.capacity()
    })
}

/// Describes the capacities a `Vec<i32>` passes through when room for every element is
/// reserved right before it is pushed.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn vec_reserve(ctx: &mut Context<'_>) -> Result<()> {
    let mut values: Vec<i32> = Vec::new();
    let initial = values.capacity();

    describe_growth(ctx, "Vec<i32> with reserve(1)", initial, |index| {
        values.reserve(1);
        values.push(element(index));
        values.capacity()
    })
}

/// Describes the capacities a `VecDeque<i32>` passes through.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn vec_deque(ctx: &mut Context<'_>) -> Result<()> {
    let mut values: VecDeque<i32> = VecDeque::new();
    let initial = values.capacity();

    describe_growth(ctx, "VecDeque<i32>", initial, |index| {
        values.push_back(element(index));
        values.capacity()
    })
}

/// Describes the capacities a `String` passes through as single-byte characters are pushed.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn string(ctx: &mut Context<'_>) -> Result<()> {
    let mut text = String::new();
    let initial = text.capacity();

    describe_growth(ctx, "String", initial, |_| {
        text.push('A');
        text.capacity()
    })
}

/// Describes the capacities a `HashSet<i32>` passes through.
///
/// Rust reports the number of elements a hash set can hold without growing, not its bucket
/// count, so the load factor is already accounted for in these numbers.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn hash_set(ctx: &mut Context<'_>) -> Result<()> {
    let mut values: HashSet<i32> = HashSet::new();
    let initial = values.capacity();

    describe_growth(ctx, "HashSet<i32>", initial, |index| {
        values.insert(element(index));
        values.capacity()
    })
}

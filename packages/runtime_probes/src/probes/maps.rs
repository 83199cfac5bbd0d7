//! What happens when a `HashMap` is given a key it already holds.

use std::collections::HashMap;

use crate::format::INDENTATION;
use crate::{Context, Result};

/// The key-value pairs inserted in order. The third reuses the key of the first.
const INSERTIONS: [(i32, i32); 3] = [(1, 2), (2, 3), (1, 3)];

/// Describes the results of `insert()` and `entry().or_insert()` with a conflicting key.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn conflicting_key(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(out, "Testing HashMap::insert() with a conflicting key.")?;

    let mut map = HashMap::new();
    for (key, value) in INSERTIONS {
        let previous = map.insert(key, value);
        writeln!(
            out,
            "{INDENTATION}insert({key}, {value}) returned {previous:?}."
        )?;
    }

    let mut entries: Vec<(i32, i32)> = map.into_iter().collect();
    entries.sort_unstable();

    writeln!(out, "{INDENTATION}The map now holds:")?;
    for (key, value) in entries {
        writeln!(out, "{INDENTATION}{INDENTATION}{key}: {value}")?;
    }

    let mut first_wins = HashMap::new();
    for (key, value) in INSERTIONS {
        first_wins.entry(key).or_insert(value);
    }

    if let Some(value) = first_wins.get(&1) {
        writeln!(
            out,
            "{INDENTATION}With entry().or_insert() instead, key 1 keeps the value {value}."
        )?;
    }

    Ok(())
}

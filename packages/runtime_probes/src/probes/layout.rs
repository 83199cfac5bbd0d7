//! Whether the compiler reorders struct fields to reduce padding.

use std::io::Write;
use std::mem::{self, offset_of};

use crate::format::INDENTATION;
use crate::{Context, Result};

/// Fields declared in an order that needs padding around `b`.
#[allow(dead_code, reason = "only the layout of the struct is inspected")]
struct Natural {
    a: u8,
    b: u32,
    c: u8,
}

/// The same fields with their declaration order enforced.
#[allow(dead_code, reason = "only the layout of the struct is inspected")]
#[repr(C)]
struct Declared {
    a: u8,
    b: u32,
    c: u8,
}

/// Whether the compiler placed the fields of a default-representation struct in a different
/// order than they were declared in.
#[must_use]
pub fn fields_reordered() -> bool {
    let a = offset_of!(Natural, a);
    let b = offset_of!(Natural, b);
    let c = offset_of!(Natural, c);

    !(a < b && b < c)
}

fn describe_offsets(
    out: &mut dyn Write,
    name: &str,
    size: usize,
    offsets: [usize; 3],
) -> Result<()> {
    let [a, b, c] = offsets;

    writeln!(
        out,
        "{INDENTATION}{name} takes {size} bytes with a at offset {a}, b at offset {b} and c at offset {c}."
    )?;

    Ok(())
}

/// Describes the layouts of the same fields with and without `#[repr(C)]`.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn struct_reordering(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(out, "Testing the layout of struct {{ a: u8, b: u32, c: u8 }}.")?;

    describe_offsets(
        out,
        "The default representation",
        mem::size_of::<Natural>(),
        [
            offset_of!(Natural, a),
            offset_of!(Natural, b),
            offset_of!(Natural, c),
        ],
    )?;
    describe_offsets(
        out,
        "#[repr(C)]",
        mem::size_of::<Declared>(),
        [
            offset_of!(Declared, a),
            offset_of!(Declared, b),
            offset_of!(Declared, c),
        ],
    )?;

    if fields_reordered() {
        writeln!(out, "This compiler did reorder struct fields.")?;
    } else {
        writeln!(out, "This compiler did not reorder struct fields.")?;
    }

    Ok(())
}

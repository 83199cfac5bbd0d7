//! Sizes of the atomic types and which widths the target supports natively.

use std::sync::atomic::{
    AtomicBool, AtomicPtr, AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize,
};

use crate::format::{INDENTATION, type_description};
use crate::{Context, Result};

/// Atomic widths and whether the target has native atomic operations of that width.
#[must_use]
pub fn native_widths() -> [(&'static str, bool); 5] {
    [
        ("8", cfg!(target_has_atomic = "8")),
        ("16", cfg!(target_has_atomic = "16")),
        ("32", cfg!(target_has_atomic = "32")),
        ("64", cfg!(target_has_atomic = "64")),
        ("ptr", cfg!(target_has_atomic = "ptr")),
    ]
}

/// Describes the size of each atomic type and the native atomic widths.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn sizes(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(out, "Testing the sizes of atomic types.")?;

    for description in [
        type_description::<AtomicBool>(),
        type_description::<AtomicU8>(),
        type_description::<AtomicU16>(),
        type_description::<AtomicU32>(),
        type_description::<AtomicU64>(),
        type_description::<AtomicUsize>(),
        type_description::<AtomicPtr<u8>>(),
    ] {
        writeln!(out, "{INDENTATION}{description}")?;
    }

    for (width, native) in native_widths() {
        let support = if native { "native" } else { "no native" };
        writeln!(out, "{INDENTATION}Width {width} has {support} atomic operations.")?;
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn atomics_match_their_plain_sizes() {
        assert_eq!(mem::size_of::<AtomicU32>(), mem::size_of::<u32>());
        assert_eq!(mem::size_of::<AtomicUsize>(), mem::size_of::<usize>());
        assert_eq!(type_description::<AtomicU16>(), "AtomicU16 (16 bits)");
    }

    #[test]
    fn pointer_width_is_supported_when_the_type_exists() {
        // AtomicUsize only exists on targets with native pointer-width atomics.
        let pointer = native_widths()
            .into_iter()
            .find(|(width, _)| *width == "ptr")
            .map(|(_, native)| native);

        assert_eq!(pointer, Some(true));
    }
}

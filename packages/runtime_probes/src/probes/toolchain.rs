//! The target and build configuration the probes were compiled for.

use std::env::consts;

use crate::format::INDENTATION;
use crate::{Context, Result};

/// Whether the probes were built with debug assertions, which usually means a debug build.
#[must_use]
pub fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

/// The byte order of the target.
#[must_use]
pub fn endianness() -> &'static str {
    if cfg!(target_endian = "little") {
        "little-endian"
    } else {
        "big-endian"
    }
}

/// Describes the target platform and build configuration.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn describe(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(
        out,
        "Built runtime_probes {} in the {} profile.",
        env!("CARGO_PKG_VERSION"),
        build_profile()
    )?;
    writeln!(
        out,
        "{INDENTATION}Target: {} on {} ({} family).",
        consts::ARCH,
        consts::OS,
        consts::FAMILY
    )?;
    writeln!(
        out,
        "{INDENTATION}Pointers are {} bits wide and the byte order is {}.",
        usize::BITS,
        endianness()
    )?;

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn endianness_matches_byte_layout() {
        let expected = if 1_u16.to_ne_bytes() == [1, 0] {
            "little-endian"
        } else {
            "big-endian"
        };

        assert_eq!(endianness(), expected);
    }

    #[test]
    fn description_names_the_target() {
        let mut out = Vec::new();
        let counters = alloc_watch::Counters::new();
        let mut ctx = Context::new(&counters, &mut out);

        describe(&mut ctx).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(consts::ARCH));
        assert!(text.contains(build_profile()));
        assert_eq!(text.lines().count(), 3);
    }
}

//! The storage width the compiler selects for enums with various discriminant ranges.

use std::any;
use std::io::Write;
use std::mem;
use std::num::NonZeroU32;
use std::result;

use crate::format::{INDENTATION, bits_of, pluralize, short_type_name};
use crate::{Context, Result};

/// The storage width of one enum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumCase {
    declaration: String,
    bytes: usize,
    bits: u64,
}

impl EnumCase {
    /// The enum as written in source, or its type name for library enums.
    #[must_use]
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// The storage width in bytes.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    fn of<T>(declaration: String) -> Self {
        Self {
            declaration,
            bytes: mem::size_of::<T>(),
            bits: bits_of::<T>(),
        }
    }
}

/// Declares a fieldless enum and captures its source text together with its size.
macro_rules! enum_case {
    ($(#[$attr:meta])* enum $name:ident { $($variants:tt)* }) => {{
        #[allow(dead_code, reason = "only the layout of the enum is inspected")]
        $(#[$attr])*
        enum $name { $($variants)* }

        EnumCase::of::<$name>(
            stringify!($(#[$attr])* enum $name { $($variants)* }).to_string(),
        )
    }};
}

fn type_case<T>() -> EnumCase {
    EnumCase::of::<T>(short_type_name(any::type_name::<T>()))
}

/// Hand-written fieldless enums with specific discriminant ranges.
///
/// Without a `repr` attribute the discriminants must fit into `isize` and the compiler picks
/// the smallest integer that holds them all. Spanning the full 64-bit ranges requires an
/// explicit `repr`.
#[must_use]
pub fn fieldless_cases() -> Vec<EnumCase> {
    #[cfg_attr(
        not(target_pointer_width = "64"),
        expect(unused_mut, reason = "64-bit only cases are pushed below")
    )]
    let mut cases = vec![
        enum_case!(enum Enum { Value }),
        enum_case!(enum Enum { First, Second }),
        enum_case!(enum Enum { Negative = -1, Positive = 1 }),
        enum_case!(enum Enum { Low = 0, High = 255 }),
        enum_case!(enum Enum { Low = 0, High = 256 }),
        enum_case!(enum Enum { Low = -129, High = 0 }),
        enum_case!(enum Enum { Negative = -2_147_483_648, Positive = 2_147_483_647 }),
        enum_case!(enum Enum { Negative = isize::MIN, Positive = isize::MAX }),
        enum_case!(#[repr(u8)] enum Enum { Value }),
        enum_case!(#[repr(u64)] enum Enum { Value = u64::MAX }),
        enum_case!(#[repr(u64)] enum Enum { Low = u64::MIN, High = u64::MAX }),
        enum_case!(#[repr(i64)] enum Enum { Negative = i64::MIN, Positive = i64::MAX }),
        enum_case!(#[repr(i64)] enum Enum { Negative = -1, Positive = i64::MAX }),
    ];

    #[cfg(target_pointer_width = "64")]
    cases.push(enum_case!(enum Enum { Low = 0, High = 4_294_967_296 }));

    cases
}

/// Library enums that carry data, where the compiler can hide the discriminant in a niche.
#[must_use]
pub fn niche_cases() -> Vec<EnumCase> {
    vec![
        type_case::<Option<bool>>(),
        type_case::<Option<u32>>(),
        type_case::<Option<NonZeroU32>>(),
        type_case::<Option<Box<u8>>>(),
        type_case::<Option<&u8>>(),
        type_case::<Option<Option<bool>>>(),
        type_case::<result::Result<u32, ()>>(),
    ]
}

fn describe(out: &mut dyn Write, cases: &[EnumCase]) -> Result<()> {
    for case in cases {
        let bytes: u64 = case.bytes.try_into().expect("usize always fits into u64");

        writeln!(
            out,
            "{INDENTATION}{}: {} ({}).",
            case.declaration,
            pluralize(bytes, "byte"),
            pluralize(case.bits, "bit")
        )?;
    }

    Ok(())
}

/// Describes the storage width of every enum case.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn storage_widths(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(out, "Testing the storage width of fieldless enums.")?;
    describe(out, &fieldless_cases())?;

    writeln!(out, "Testing the storage width of enums that carry data.")?;
    describe(out, &niche_cases())?;

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn bytes_of(cases: &[EnumCase], declaration_fragment: &str) -> usize {
        cases
            .iter()
            .find(|case| case.declaration().contains(declaration_fragment))
            .unwrap_or_else(|| panic!("no case contains '{declaration_fragment}'"))
            .bytes()
    }

    #[test]
    fn explicit_representations_are_honored() {
        let cases = fieldless_cases();

        assert_eq!(bytes_of(&cases, "repr(u8)"), 1);
        assert_eq!(bytes_of(&cases, "repr(u64)"), 8);
        assert_eq!(bytes_of(&cases, "repr(i64)"), 8);
    }

    #[test]
    fn single_variant_enum_needs_no_storage() {
        let cases = fieldless_cases();

        assert_eq!(cases.first().map(EnumCase::bytes), Some(0));
    }

    #[test]
    fn every_case_is_described() {
        let mut out = Vec::new();
        describe(&mut out, &fieldless_cases()).unwrap();
        describe(&mut out, &niche_cases()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().count();

        assert_eq!(lines, fieldless_cases().len() + niche_cases().len());
        assert!(text.contains("NonZero"));
        assert!(text.contains(": 4 bytes (32 bits)."));
    }

    #[test]
    fn niche_keeps_option_of_non_zero_small() {
        let cases = niche_cases();

        assert_eq!(bytes_of(&cases, "NonZero"), 4);
        assert_eq!(bytes_of(&cases, "Option<bool>"), 1);
    }

    #[test]
    fn standard_result_is_described_by_its_short_name() {
        let cases = niche_cases();

        assert_eq!(
            bytes_of(&cases, "Result<u32, ()>"),
            mem::size_of::<result::Result<u32, ()>>()
        );
        assert!(
            cases
                .iter()
                .any(|case| case.declaration() == "Result<u32, ()>")
        );
    }
}

//! Helpers for writing probe observations as prose.

use std::any;
use std::mem;

/// Prefix of lines that belong to the preceding heading line.
pub const INDENTATION: &str = "  ";

/// Joins items into an English list: `a`, `a and b`, `a, b, and c`.
#[must_use]
pub fn enumerate<S: AsRef<str>>(items: &[S]) -> String {
    let mut result = String::new();

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            let is_last = index.checked_add(1) == Some(items.len());

            result.push_str(match (is_last, items.len()) {
                (false, _) => ", ",
                (true, 2) => " and ",
                (true, _) => ", and ",
            });
        }

        result.push_str(item.as_ref());
    }

    result
}

/// Formats a count with its noun, adding a plural `s` unless the count is one.
#[must_use]
pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Formats an integer with `,` between every group of three digits.
#[must_use]
pub fn with_thousands_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len().saturating_mul(4).div_ceil(3));

    for (index, digit) in digits.chars().enumerate() {
        let remaining = digits.len().saturating_sub(index);

        if index > 0 && remaining.checked_rem(3) == Some(0) {
            result.push(',');
        }

        result.push(digit);
    }

    result
}

/// Removes module paths from a type name, keeping generic structure intact.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
#[must_use]
pub fn short_type_name(full: &str) -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let mut result = String::with_capacity(full.len());
    let mut path_start = 0;

    for (index, ch) in full.char_indices() {
        if !(ch.is_alphanumeric() || ch == '_' || ch == ':') {
            result.push_str(last_segment(full.get(path_start..index).unwrap_or_default()));
            result.push(ch);
            path_start = index.saturating_add(ch.len_utf8());
        }
    }

    result.push_str(last_segment(full.get(path_start..).unwrap_or_default()));
    result
}

/// Names a type together with its storage width, e.g. `u32 (32 bits)`.
#[must_use]
pub fn type_description<T>() -> String {
    format!(
        "{} ({})",
        short_type_name(any::type_name::<T>()),
        pluralize(bits_of::<T>(), "bit")
    )
}

/// The storage width of a type in bits.
#[must_use]
pub fn bits_of<T>() -> u64 {
    let bytes: u64 = mem::size_of::<T>()
        .try_into()
        .expect("type sizes always fit into u64");

    bytes.saturating_mul(8)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::AtomicPtr;

    use super::*;

    #[test]
    fn enumerate_handles_every_length() {
        assert_eq!(enumerate::<&str>(&[]), "");
        assert_eq!(enumerate(&["a"]), "a");
        assert_eq!(enumerate(&["a", "b"]), "a and b");
        assert_eq!(enumerate(&["a", "b", "c"]), "a, b, and c");
        assert_eq!(enumerate(&["a", "b", "c", "d"]), "a, b, c, and d");
    }

    #[test]
    fn enumerate_accepts_owned_strings() {
        let items = vec!["one".to_string(), "two".to_string()];
        assert_eq!(enumerate(&items), "one and two");
    }

    #[test]
    fn pluralize_only_singular_for_one() {
        assert_eq!(pluralize(0, "byte"), "0 bytes");
        assert_eq!(pluralize(1, "byte"), "1 byte");
        assert_eq!(pluralize(2, "byte"), "2 bytes");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(with_thousands_separators(0), "0");
        assert_eq!(with_thousands_separators(999), "999");
        assert_eq!(with_thousands_separators(1000), "1,000");
        assert_eq!(with_thousands_separators(1_000_000), "1,000,000");
        assert_eq!(with_thousands_separators(12_345_678), "12,345,678");
        assert_eq!(
            with_thousands_separators(u64::MAX),
            "18,446,744,073,709,551,615"
        );
    }

    #[test]
    fn short_type_name_strips_paths() {
        assert_eq!(short_type_name("u32"), "u32");
        assert_eq!(
            short_type_name("core::sync::atomic::AtomicBool"),
            "AtomicBool"
        );
        assert_eq!(
            short_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(
            short_type_name("std::collections::HashMap<u8, alloc::boxed::Box<[u8]>>"),
            "HashMap<u8, Box<[u8]>>"
        );
    }

    #[test]
    fn type_description_includes_bits() {
        assert_eq!(type_description::<u32>(), "u32 (32 bits)");
        assert_eq!(type_description::<bool>(), "bool (8 bits)");
        assert_eq!(type_description::<()>(), "() (0 bits)");
        assert!(type_description::<AtomicPtr<u8>>().starts_with("AtomicPtr<u8> ("));
    }
}

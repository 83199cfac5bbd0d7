//! Searching for the edge of a monotonic property.

/// Finds the largest `n` in `1..=upper` for which `predicate(n)` holds.
///
/// The predicate must be monotonic: true for every value up to some threshold and false
/// above it. Returns 0 if the predicate holds for no value (or if `upper` is 0). The
/// predicate is called `O(log upper)` times.
///
/// # Errors
///
/// The first error returned by the predicate ends the search and is returned.
///
/// # Panics
///
/// Panics if `upper` is `usize::MAX`, which leaves no room for the end of the search range.
///
/// # Examples
///
/// ```
/// use runtime_probes::largest_satisfying;
///
/// let largest = largest_satisfying(1000, |n| Ok::<_, ()>(n * n <= 500)).unwrap();
/// assert_eq!(largest, 22);
/// ```
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division,
    reason = "all values stay within 1..=upper + 1, which is checked up front"
)]
pub fn largest_satisfying<E>(
    upper: usize,
    mut predicate: impl FnMut(usize) -> Result<bool, E>,
) -> Result<usize, E> {
    let end = upper
        .checked_add(1)
        .expect("search bound must leave room for one past the end");

    // Invariant: the predicate holds below `first`, and the answer is in first..first + count.
    let mut first = 1_usize;
    let mut count = end - first;

    while count > 0 {
        let step = count / 2;
        let middle = first + step;

        if predicate(middle)? {
            first = middle + 1;
            count -= step + 1;
        } else {
            count = step;
        }
    }

    Ok(first - 1)
}

//! Recording the capacity values a resizable container passes through.

use std::fmt;

use crate::format::INDENTATION;

/// Width of the capacity column. Wide enough for capacities up to 10 times the largest
/// element count any growth probe inserts.
const CAPACITY_WIDTH: usize = 8;

/// Watches the capacity of a container as it grows and reports every change.
///
/// # Examples
///
/// ```
/// use runtime_probes::GrowthCurve;
///
/// let mut values = Vec::new();
/// let mut curve = GrowthCurve::new(values.capacity());
///
/// for i in 0..10 {
///     values.push(i);
///
///     if let Some(step) = curve.observe(values.capacity()) {
///         println!("{step}");
///     }
/// }
/// ```
#[derive(Debug)]
pub struct GrowthCurve {
    last: usize,
}

impl GrowthCurve {
    /// Starts watching a container whose current capacity is `initial`.
    #[must_use]
    pub fn new(initial: usize) -> Self {
        Self { last: initial }
    }

    /// Records the current capacity, returning the step if it differs from the last one.
    pub fn observe(&mut self, capacity: usize) -> Option<GrowthStep> {
        if capacity == self.last {
            return None;
        }

        let step = GrowthStep {
            previous: self.last,
            capacity,
        };
        self.last = capacity;

        Some(step)
    }

    /// The most recently observed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.last
    }
}

/// One change of capacity observed by a [`GrowthCurve`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GrowthStep {
    previous: usize,
    capacity: usize,
}

impl GrowthStep {
    /// The capacity before the change.
    #[must_use]
    pub fn previous(&self) -> usize {
        self.previous
    }

    /// The capacity after the change.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times larger the new capacity is than the previous one.
    ///
    /// `None` when the previous capacity was zero.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "capacities in the probes are far below 2^52, and this is a ratio for display"
    )]
    pub fn factor(&self) -> Option<f64> {
        if self.previous == 0 {
            None
        } else {
            Some(self.capacity as f64 / self.previous as f64)
        }
    }
}

impl fmt::Display for GrowthStep {
    #[cfg_attr(test, mutants::skip)] // Layout is covered by the test below, not the exact padding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{INDENTATION}{:>CAPACITY_WIDTH$}", self.capacity)?;

        if let Some(factor) = self.factor() {
            write!(f, " (x{factor:.4})")?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn unchanged_capacity_is_not_a_step() {
        let mut curve = GrowthCurve::new(4);

        assert_eq!(curve.observe(4), None);
        assert_eq!(curve.capacity(), 4);
    }

    #[test]
    fn changed_capacity_is_a_step() {
        let mut curve = GrowthCurve::new(0);

        let first = curve.observe(4).unwrap();
        assert_eq!(first.previous(), 0);
        assert_eq!(first.capacity(), 4);
        assert_eq!(first.factor(), None);

        let second = curve.observe(8).unwrap();
        assert_eq!(second.previous(), 4);
        assert_eq!(second.factor(), Some(2.0));

        assert_eq!(curve.capacity(), 8);
    }

    #[test]
    fn display_shows_capacity_and_factor() {
        let mut curve = GrowthCurve::new(0);

        let first = curve.observe(4).unwrap();
        assert_eq!(first.to_string(), "         4");

        let second = curve.observe(6).unwrap();
        assert_eq!(second.to_string(), "         6 (x1.5000)");
    }

    #[test]
    fn vec_growth_is_non_decreasing() {
        let mut values = Vec::new();
        let mut curve = GrowthCurve::new(values.capacity());
        let mut steps = Vec::new();

        for i in 0..10_000_u32 {
            values.push(i);

            if let Some(step) = curve.observe(values.capacity()) {
                steps.push(step);
            }
        }

        assert!(!steps.is_empty());

        for step in &steps {
            assert!(step.capacity() > step.previous());

            if let Some(factor) = step.factor() {
                #[expect(clippy::cast_precision_loss, reason = "small test values")]
                let expected = step.capacity() as f64 / step.previous() as f64;
                assert!((factor - expected).abs() < f64::EPSILON);
            }
        }

        for pair in steps.windows(2) {
            assert_eq!(pair[0].capacity(), pair[1].previous());
        }
    }

    #[test]
    fn hash_set_growth_is_non_decreasing() {
        let mut set = HashSet::new();
        let mut curve = GrowthCurve::new(set.capacity());
        let mut last = set.capacity();

        for i in 0..10_000_u32 {
            set.insert(i);

            if let Some(step) = curve.observe(set.capacity()) {
                assert!(step.capacity() >= last);
                last = step.capacity();
            }
        }

        assert!(last >= 10_000);
    }
}

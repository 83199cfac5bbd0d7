//! Which constructors, clones and destructors run when a value is appended to a `Vec`.

use std::fmt;
use std::{iter, slice};

use crate::{CallCounts, Context, Monitor, Result};

/// One way of appending a value to a vector.
#[derive(Clone, Copy)]
pub struct AppendScenario {
    name: &'static str,
    append: fn(&CallCounts),
}

impl AppendScenario {
    /// Describes the append operation, e.g. `Vec::push() with a new value`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the scenario from start to end and returns every call it made.
    ///
    /// The vectors involved are dropped before returning, so their destructor calls are
    /// included.
    #[must_use]
    pub fn counts(&self) -> CallCounts {
        let counts = CallCounts::new();
        (self.append)(&counts);
        counts
    }
}

impl fmt::Debug for AppendScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendScenario")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn push_clone(counts: &CallCounts) {
    let existing = Monitor::new(counts);
    let mut values = Vec::with_capacity(1);
    values.push(existing.clone());
}

fn push_new(counts: &CallCounts) {
    let mut values = Vec::with_capacity(1);
    values.push(Monitor::new(counts));
}

fn extend_from_slice(counts: &CallCounts) {
    let existing = Monitor::new(counts);
    let mut values = Vec::with_capacity(1);
    values.extend_from_slice(slice::from_ref(&existing));
}

fn extend_once(counts: &CallCounts) {
    let mut values = Vec::with_capacity(1);
    values.extend(iter::once(Monitor::new(counts)));
}

fn push_into_full(counts: &CallCounts) {
    // The value that fills the vector has its own counts, so only the growing push is reported.
    let filler_counts = CallCounts::new();

    let mut values = Vec::with_capacity(1);
    values.push(Monitor::new(&filler_counts));
    values.push(Monitor::new(counts));
}

fn resize(counts: &CallCounts) {
    let mut values = Vec::with_capacity(1);
    values.resize(1, Monitor::new(counts));
}

/// Every append scenario, in the order the probe reports them.
#[must_use]
pub fn append_scenarios() -> [AppendScenario; 6] {
    [
        AppendScenario {
            name: "Vec::push() with a clone of an existing value",
            append: push_clone,
        },
        AppendScenario {
            name: "Vec::push() with a new value",
            append: push_new,
        },
        AppendScenario {
            name: "Vec::extend_from_slice() with an existing value",
            append: extend_from_slice,
        },
        AppendScenario {
            name: "Vec::extend() with a new value",
            append: extend_once,
        },
        AppendScenario {
            name: "Vec::push() into a vector that is already full",
            append: push_into_full,
        },
        AppendScenario {
            name: "Vec::resize() to add a new value",
            append: resize,
        },
    ]
}

/// Describes the calls made by every append scenario.
///
/// # Errors
///
/// Fails if the output cannot be written.
pub fn append(ctx: &mut Context<'_>) -> Result<()> {
    let out = ctx.out();

    writeln!(
        out,
        "Counting the calls made when appending to a Vec. Moves run no code and are not counted."
    )?;

    for scenario in append_scenarios() {
        writeln!(out, "When using {}, {}.", scenario.name(), scenario.counts())?;
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn scenario(name_fragment: &str) -> AppendScenario {
        append_scenarios()
            .into_iter()
            .find(|scenario| scenario.name().contains(name_fragment))
            .unwrap()
    }

    #[test]
    fn cloning_push_clones_once() {
        let counts = scenario("clone of an existing").counts();

        assert_eq!(counts.constructions(), 1);
        assert_eq!(counts.clones(), 1);
        assert_eq!(counts.drops(), 2);
    }

    #[test]
    fn new_values_are_never_cloned() {
        for fragment in ["push() with a new", "extend() with a new", "resize()"] {
            let counts = scenario(fragment).counts();

            assert_eq!(counts.constructions(), 1, "{fragment}");
            assert_eq!(counts.clones(), 0, "{fragment}");
            assert_eq!(counts.drops(), 1, "{fragment}");
        }
    }

    #[test]
    fn growing_a_full_vector_does_not_clone() {
        let counts = scenario("already full").counts();

        assert_eq!(counts.constructions(), 1);
        assert_eq!(counts.clones(), 0);
        assert_eq!(counts.drops(), 1);
    }

    #[test]
    fn every_scenario_appends_exactly_one_value() {
        for scenario in append_scenarios() {
            let counts = scenario.counts();

            assert_eq!(counts.constructions(), 1, "{}", scenario.name());
            assert!(counts.clones() <= 1, "{}", scenario.name());
        }
    }

    #[test]
    fn every_construction_is_dropped() {
        for scenario in append_scenarios() {
            let counts = scenario.counts();
            let created = counts.constructions() + counts.clones();

            assert_eq!(created, counts.drops(), "{}", scenario.name());
            assert_eq!(counts.clone_froms(), 0, "{}", scenario.name());
        }
    }

    #[test]
    fn scenario_names_are_unique() {
        let scenarios = append_scenarios();

        for (index, scenario) in scenarios.iter().enumerate() {
            assert!(
                scenarios
                    .iter()
                    .skip(index + 1)
                    .all(|other| other.name() != scenario.name())
            );
        }
    }
}

//! The catalog of probes and running a selection of them.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::probes::{
    atomics, call_counts, enum_widths, growth_curves, inline_storage, layout, maps,
    shared_pointers, sorting, toolchain, vectors,
};
use crate::{Context, Error, Result};

/// The signature shared by every probe.
pub type ProbeFn = fn(&mut Context<'_>) -> Result<()>;

/// A named probe in the catalog.
#[derive(Clone, Copy)]
pub struct Probe {
    name: &'static str,
    summary: &'static str,
    run: ProbeFn,
}

impl Probe {
    /// Creates a probe from its name, a one-line summary and its function.
    #[must_use]
    pub const fn new(name: &'static str, summary: &'static str, run: ProbeFn) -> Self {
        Self { name, summary, run }
    }

    /// The name the probe is selected by on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A one-line description of what the probe observes.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        self.summary
    }

    /// Runs the probe, without catching panics.
    ///
    /// # Errors
    ///
    /// Returns whatever error ended the probe early.
    pub fn run(&self, ctx: &mut Context<'_>) -> Result<()> {
        (self.run)(ctx)
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

static CATALOG: &[Probe] = &[
    Probe::new(
        "toolchain",
        "target platform and build configuration",
        toolchain::describe,
    ),
    Probe::new(
        "vec_assignment",
        "allocations of clone_from() between vectors of different sizes",
        vectors::assignment,
    ),
    Probe::new(
        "vec_scoped_blocks",
        "allocations and deallocations of vectors in nested blocks",
        vectors::scoped_blocks,
    ),
    Probe::new(
        "vec_maximum_size",
        "the largest number of elements a Vec can hold",
        vectors::maximum_size,
    ),
    Probe::new(
        "vec_growth",
        "capacities of a Vec<i32> growing to one million elements",
        growth_curves::vec,
    ),
    Probe::new(
        "vec_reserve_growth",
        "capacities of a Vec<i32> that reserves room before every push",
        growth_curves::vec_reserve,
    ),
    Probe::new(
        "vec_deque_growth",
        "capacities of a VecDeque<i32> growing to one million elements",
        growth_curves::vec_deque,
    ),
    Probe::new(
        "string_growth",
        "capacities of a String growing to one million bytes",
        growth_curves::string,
    ),
    Probe::new(
        "hash_set_growth",
        "capacities of a HashSet<i32> growing to one million elements",
        growth_curves::hash_set,
    ),
    Probe::new(
        "map_conflicting_key",
        "HashMap insertion with a key that is already present",
        maps::conflicting_key,
    ),
    Probe::new(
        "small_buffer_optimization",
        "the longest values that are stored without allocating",
        inline_storage::small_buffer_optimization,
    ),
    Probe::new(
        "enum_widths",
        "storage widths of enums with various discriminant ranges",
        enum_widths::storage_widths,
    ),
    Probe::new(
        "append_call_counts",
        "constructor, clone and destructor calls when appending to a Vec",
        call_counts::append,
    ),
    Probe::new(
        "shared_pointer_allocations",
        "allocations of Arc and Rc depending on how they are built",
        shared_pointers::allocations,
    ),
    Probe::new(
        "sort_unstable_allocations",
        "allocations of sort_unstable() on growing inputs",
        sorting::unstable,
    ),
    Probe::new(
        "sort_allocations",
        "allocations of the stable sort() on growing inputs",
        sorting::stable,
    ),
    Probe::new(
        "atomic_sizes",
        "sizes of the atomic types and natively supported widths",
        atomics::sizes,
    ),
    Probe::new(
        "struct_reordering",
        "whether struct fields are reordered to reduce padding",
        layout::struct_reordering,
    ),
];

/// Every probe, in the order they run by default.
#[must_use]
pub fn catalog() -> &'static [Probe] {
    CATALOG
}

/// Selects the probes with the given names, keeping catalog order.
///
/// An empty list selects every probe. Naming a probe more than once runs it once.
///
/// # Errors
///
/// Returns [`Error::UnknownProbe`] for the first name that is not in the catalog.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static Probe>> {
    if let Some(unknown) = names
        .iter()
        .map(|name| name.as_ref())
        .find(|name| !CATALOG.iter().any(|probe| probe.name == *name))
    {
        return Err(Error::UnknownProbe {
            name: unknown.to_string(),
        });
    }

    Ok(CATALOG
        .iter()
        .filter(|probe| names.is_empty() || names.iter().any(|name| name.as_ref() == probe.name))
        .collect())
}

/// The outcome of running a set of probes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    succeeded: usize,
    failed: usize,
}

impl RunSummary {
    /// The number of probes that ran to completion.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// The number of probes that returned an error or panicked.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}

/// Runs one probe, containing any error or panic it produces.
///
/// Returns whether the probe succeeded. A failure is logged and never affects other probes.
pub fn run_probe(ctx: &mut Context<'_>, probe: &Probe) -> bool {
    tracing::debug!(probe = probe.name, "starting probe");

    match panic::catch_unwind(AssertUnwindSafe(|| probe.run(ctx))) {
        Ok(Ok(())) => {
            tracing::debug!(probe = probe.name, "probe finished");
            true
        }
        Ok(Err(error)) => {
            tracing::error!(probe = probe.name, %error, "probe failed");
            false
        }
        Err(payload) => {
            tracing::error!(
                probe = probe.name,
                message = panic_message(payload.as_ref()),
                "probe panicked"
            );
            false
        }
    }
}

/// Runs the probes one after another in the given order.
///
/// A probe that fails does not stop the run; the failure is counted in the summary.
pub fn run_probes(ctx: &mut Context<'_>, probes: &[&Probe]) -> RunSummary {
    let mut summary = RunSummary::default();

    for probe in probes {
        if run_probe(ctx, probe) {
            summary.succeeded = summary.succeeded.saturating_add(1);
        } else {
            summary.failed = summary.failed.saturating_add(1);
        }
    }

    tracing::debug!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "probe run finished"
    );

    summary
}

//! A value that counts how it is constructed, cloned and dropped.

use std::cell::Cell;
use std::fmt;

use crate::format::{enumerate, pluralize};

/// Call counts collected by every [`Monitor`] created from it.
///
/// Moves are not counted: in Rust they are bitwise copies that never run user code.
#[derive(Debug, Default)]
pub struct CallCounts {
    constructions: Cell<u64>,
    clones: Cell<u64>,
    clone_froms: Cell<u64>,
    drops: Cell<u64>,
}

impl CallCounts {
    /// Creates a set of counts that are all zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls to [`Monitor::new()`].
    #[must_use]
    pub fn constructions(&self) -> u64 {
        self.constructions.get()
    }

    /// Calls to `Clone::clone()`.
    #[must_use]
    pub fn clones(&self) -> u64 {
        self.clones.get()
    }

    /// Calls to `Clone::clone_from()`.
    #[must_use]
    pub fn clone_froms(&self) -> u64 {
        self.clone_froms.get()
    }

    /// Calls to `Drop::drop()`.
    #[must_use]
    pub fn drops(&self) -> u64 {
        self.drops.get()
    }

    /// Whether no call was counted at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructions() == 0
            && self.clones() == 0
            && self.clone_froms() == 0
            && self.drops() == 0
    }

    fn increment(counter: &Cell<u64>) {
        counter.set(counter.get().wrapping_add(1));
    }
}

impl fmt::Display for CallCounts {
    /// Describes the counts as prose, e.g. `made 1 call to the constructor and 1 call to the
    /// destructor`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptions: Vec<String> = [
            (self.constructions(), "constructor"),
            (self.clones(), "clone method"),
            (self.clone_froms(), "clone_from method"),
            (self.drops(), "destructor"),
        ]
        .into_iter()
        .filter(|(count, _)| *count != 0)
        .map(|(count, what)| format!("{} to the {what}", pluralize(count, "call")))
        .collect();

        if descriptions.is_empty() {
            write!(f, "made no calls")
        } else {
            write!(f, "made {}", enumerate(&descriptions))
        }
    }
}

/// A value whose constructions, clones and drops are counted in a shared [`CallCounts`].
pub struct Monitor<'a> {
    counts: &'a CallCounts,
}

impl<'a> Monitor<'a> {
    /// Creates a monitor, counting one construction.
    #[must_use]
    pub fn new(counts: &'a CallCounts) -> Self {
        CallCounts::increment(&counts.constructions);
        Self { counts }
    }
}

impl Clone for Monitor<'_> {
    fn clone(&self) -> Self {
        CallCounts::increment(&self.counts.clones);
        Self {
            counts: self.counts,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        CallCounts::increment(&source.counts.clone_froms);
        self.counts = source.counts;
    }
}

impl Drop for Monitor<'_> {
    fn drop(&mut self) {
        CallCounts::increment(&self.counts.drops);
    }
}

impl fmt::Debug for Monitor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor").finish_non_exhaustive()
    }
}

use std::fmt;
use std::io::Write;

use alloc_watch::{AllocationTracker, Counters, Messages, Scope};

use crate::Result;

/// Everything a probe needs: the allocation counters to measure with and the output to
/// describe its observations on.
///
/// Probes never reach for the global allocator directly, so tests can run them against any
/// output and in the thread scope.
pub struct Context<'a> {
    counters: &'a Counters,
    scope: Scope,
    out: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    /// Creates a context that measures process-wide allocations and writes to `out`.
    ///
    /// Allocator announcements always go to stdout. To keep them in order with the probe
    /// observations, `out` should be stdout itself rather than a buffer in front of it.
    #[must_use]
    pub fn new(counters: &'a Counters, out: &'a mut dyn Write) -> Self {
        Self {
            counters,
            scope: Scope::Process,
            out,
        }
    }

    /// Measures allocations in the given scope instead.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Starts tracking allocations with the requested announcements.
    ///
    /// Writing to [`out()`][Self::out] while the tracker is alive is allowed, but any
    /// allocation the output makes is counted as well.
    ///
    /// # Errors
    ///
    /// Fails if another tracker is already announcing the requested events.
    pub fn track(&self, messages: Messages) -> Result<AllocationTracker<'a>> {
        Ok(AllocationTracker::new(self.counters, self.scope, messages)?)
    }

    /// The output that probe observations are written to.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// The allocation counters used by this context.
    #[must_use]
    pub fn counters(&self) -> &'a Counters {
        self.counters
    }

    /// The scope allocations are measured in.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("counters", &self.counters)
            .field("scope", &self.scope)
            .field("out", &"<output>")
            .finish()
    }
}

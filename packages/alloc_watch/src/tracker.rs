//! Scoped allocation tracking.

use std::marker::PhantomData;

use crate::allocator::{Announcement, announce, thread_allocations, thread_bytes};
use crate::{Counters, Result};

/// Which allocations an [`AllocationTracker`] counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum Scope {
    /// Allocations made by any thread of the process.
    #[default]
    Process,

    /// Allocations made by the thread that created the tracker.
    Thread,
}

impl Scope {
    fn allocations(self, counters: &Counters) -> u64 {
        match self {
            Self::Process => counters.allocations(),
            Self::Thread => thread_allocations(),
        }
    }

    fn bytes(self, counters: &Counters) -> u64 {
        match self {
            Self::Process => counters.bytes(),
            Self::Thread => thread_bytes(),
        }
    }
}

/// Which allocator events an [`AllocationTracker`] announces on stdout while it is alive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Messages {
    allocations: bool,
    deallocations: bool,
}

impl Messages {
    /// Announce nothing. The tracker only counts.
    pub const NONE: Self = Self {
        allocations: false,
        deallocations: false,
    };

    /// Announce every allocation.
    pub const ALLOCATIONS: Self = Self {
        allocations: true,
        deallocations: false,
    };

    /// Announce every allocation and every deallocation.
    pub const ALL: Self = Self {
        allocations: true,
        deallocations: true,
    };

    /// Whether allocations are announced.
    #[must_use]
    pub const fn allocations(self) -> bool {
        self.allocations
    }

    /// Whether deallocations are announced.
    #[must_use]
    pub const fn deallocations(self) -> bool {
        self.deallocations
    }
}

/// Measures the allocations made between its creation and drop.
///
/// The tracker records the allocation count when it is created. Any time before it is dropped,
/// [`allocations_made()`][Self::allocations_made] reports how many allocation events happened
/// since then.
///
/// If the tracker announces allocations, dropping it prints `Made no allocations.` when nothing
/// was allocated. Dropping it turns off the announcements it turned on.
///
/// At most one announcing tracker can be alive at a time. Trackers that announce nothing can
/// be nested freely, including inside an announcing one.
///
/// # Examples
///
/// ```
/// use alloc_watch::{AllocationTracker, CountingAllocator, Messages, Scope};
///
/// #[global_allocator]
/// static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
///
/// let tracker =
///     AllocationTracker::new(ALLOCATOR.counters(), Scope::Thread, Messages::NONE).unwrap();
/// let small = [0_u8; 16]; // On the stack, no allocation.
/// std::hint::black_box(&small);
///
/// assert_eq!(tracker.allocations_made(), 0);
/// ```
#[derive(Debug)]
#[must_use = "Measurements are taken between creation and drop"]
pub struct AllocationTracker<'a> {
    counters: &'a Counters,
    scope: Scope,
    messages: Messages,

    allocations_at_start: u64,
    bytes_at_start: u64,

    // The thread scope reads thread-local counters, so the tracker must stay on its thread.
    _single_threaded: PhantomData<*const ()>,
}

impl<'a> AllocationTracker<'a> {
    /// Starts tracking allocations, turning on the requested announcements.
    ///
    /// Creating a tracker does not allocate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyEnabled`][crate::Error::AlreadyEnabled] if an announcement this
    /// tracker requests is already enabled, typically by another announcing tracker. In that
    /// case no announcement flag is changed.
    pub fn new(counters: &'a Counters, scope: Scope, messages: Messages) -> Result<Self> {
        if messages.allocations {
            counters.enable_allocation_messages()?;
        }

        if messages.deallocations {
            if let Err(e) = counters.enable_deallocation_messages() {
                if messages.allocations {
                    counters.disable_allocation_messages();
                }

                return Err(e);
            }
        }

        // Read after enabling, which may have set up stdout and allocated doing so.
        let allocations_at_start = scope.allocations(counters);
        let bytes_at_start = scope.bytes(counters);

        Ok(Self {
            counters,
            scope,
            messages,
            allocations_at_start,
            bytes_at_start,
            _single_threaded: PhantomData,
        })
    }

    /// The number of allocation events since this tracker was created.
    #[must_use]
    pub fn allocations_made(&self) -> u64 {
        self.scope
            .allocations(self.counters)
            .checked_sub(self.allocations_at_start)
            .expect("allocation count could not possibly decrease")
    }

    /// The number of bytes requested since this tracker was created.
    #[must_use]
    pub fn bytes_allocated(&self) -> u64 {
        self.scope
            .bytes(self.counters)
            .checked_sub(self.bytes_at_start)
            .expect("allocated byte count could not possibly decrease")
    }

    /// The scope this tracker counts allocations in.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// What dropping the tracker right now would announce.
    fn closing_announcement(&self) -> Option<Announcement> {
        (self.messages.allocations && self.allocations_made() == 0)
            .then_some(Announcement::NoAllocations)
    }
}

impl Drop for AllocationTracker<'_> {
    fn drop(&mut self) {
        if let Some(announcement) = self.closing_announcement() {
            announce(announcement);
        }

        if self.messages.allocations {
            self.counters.disable_allocation_messages();
        }

        if self.messages.deallocations {
            self.counters.disable_deallocation_messages();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // The thread scope reads thread-local counters, so the tracker must not leave its thread.
    static_assertions::assert_not_impl_any!(AllocationTracker<'static>: Send, Sync);
    static_assertions::assert_impl_all!(Messages: Send, Sync, Copy);
    static_assertions::assert_impl_all!(Scope: Send, Sync, Copy);

    #[test]
    fn message_presets() {
        assert!(!Messages::NONE.allocations());
        assert!(!Messages::NONE.deallocations());

        assert!(Messages::ALLOCATIONS.allocations());
        assert!(!Messages::ALLOCATIONS.deallocations());

        assert!(Messages::ALL.allocations());
        assert!(Messages::ALL.deallocations());

        assert_eq!(Messages::default(), Messages::NONE);
    }

    #[test]
    fn empty_announcing_tracker_reports_no_allocations() {
        let counters = Counters::new();
        let tracker = AllocationTracker::new(&counters, Scope::Process, Messages::ALLOCATIONS)
            .unwrap();

        assert_eq!(
            tracker.closing_announcement(),
            Some(Announcement::NoAllocations)
        );
    }

    #[test]
    fn busy_announcing_tracker_reports_nothing_extra() {
        let counters = Counters::new();
        let tracker = AllocationTracker::new(&counters, Scope::Process, Messages::ALLOCATIONS)
            .unwrap();

        assert!(counters.register_allocation(8));

        assert_eq!(tracker.allocations_made(), 1);
        assert_eq!(tracker.closing_announcement(), None);
    }

    #[test]
    fn silent_tracker_reports_nothing() {
        let counters = Counters::new();
        let tracker = AllocationTracker::new(&counters, Scope::Process, Messages::NONE).unwrap();

        assert_eq!(tracker.closing_announcement(), None);
        drop(tracker);

        assert!(!counters.allocation_messages_enabled());
    }

    #[test]
    fn default_scope_is_process() {
        assert_eq!(Scope::default(), Scope::Process);
    }
}

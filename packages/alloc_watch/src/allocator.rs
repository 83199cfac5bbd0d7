//! Allocation wrapper for counting memory allocations.

use std::alloc::{GlobalAlloc, Layout};
use std::cell::Cell;
use std::io::{self, Write};
use std::sync::atomic::{self, AtomicBool, AtomicU64};
use std::{fmt, ptr};

use crate::{Error, MessageKind, Result};

/// Large enough for the longest announcement with a 20-digit size.
const ANNOUNCEMENT_CAPACITY: usize = 64;

thread_local! {
    // Counters of the current thread, for measurements that must ignore other threads.
    // Const-initialized without a destructor, so touching them never allocates.
    static THREAD_ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
    static THREAD_BYTES: Cell<u64> = const { Cell::new(0) };

    // Set while this thread is printing an announcement. Allocations made by the printing
    // machinery itself are still counted but never announced, otherwise we would recurse.
    static ANNOUNCING: Cell<bool> = const { Cell::new(false) };
}

/// The number of allocation events made by the current thread since it started.
#[inline]
pub(crate) fn thread_allocations() -> u64 {
    THREAD_ALLOCATIONS.try_with(Cell::get).unwrap_or(0)
}

/// The number of bytes requested by the current thread since it started.
#[inline]
pub(crate) fn thread_bytes() -> u64 {
    THREAD_BYTES.try_with(Cell::get).unwrap_or(0)
}

/// A line the allocator or a tracker prints on stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Announcement {
    Allocation { size: usize },
    Deallocation { size: usize },
    NoAllocations,
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { size } => write!(f, "Made an allocation of size {size}."),
            Self::Deallocation { size } => write!(f, "Freed an allocation of size {size}."),
            Self::NoAllocations => write!(f, "Made no allocations."),
        }
    }
}

/// Formats the announcement as a full line into `buffer`, returning the written bytes.
///
/// Returns `None` if the line does not fit.
pub(crate) fn format_announcement(announcement: Announcement, buffer: &mut [u8]) -> Option<&[u8]> {
    let mut cursor = io::Cursor::new(&mut *buffer);
    writeln!(cursor, "{announcement}").ok()?;

    let written = usize::try_from(cursor.position()).ok()?;
    buffer.get(..written)
}

/// Prints one announcement line to stdout without touching the heap.
pub(crate) fn announce(announcement: Announcement) {
    announce_to(announcement, |line| {
        // There is nobody to report a failed write to from inside the allocator.
        _ = io::stdout().write_all(line);
    });
}

/// Formats the announcement into a stack buffer and hands the line to `sink` in one piece.
///
/// Announcements made on the same thread while `sink` runs are dropped.
pub(crate) fn announce_to(announcement: Announcement, sink: impl FnOnce(&[u8])) {
    let entered = ANNOUNCING
        .try_with(|announcing| !announcing.replace(true))
        .unwrap_or(false);

    if !entered {
        return;
    }

    let mut buffer = [0_u8; ANNOUNCEMENT_CAPACITY];

    if let Some(line) = format_announcement(announcement, &mut buffer) {
        sink(line);
    }

    _ = ANNOUNCING.try_with(|announcing| announcing.set(false));
}

/// Allocation counters and announcement flags owned by a [`CountingAllocator`].
///
/// The counters are monotonic: they only ever grow. Measurements are taken by comparing two
/// readings, which is what [`AllocationTracker`][crate::AllocationTracker] does.
///
/// # Examples
///
/// ```
/// use alloc_watch::CountingAllocator;
///
/// #[global_allocator]
/// static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
///
/// let before = ALLOCATOR.counters().allocations();
/// let data = Box::new(42_u64);
/// std::hint::black_box(&data);
///
/// assert!(ALLOCATOR.counters().allocations() > before);
/// ```
#[derive(Debug)]
pub struct Counters {
    allocations: AtomicU64,
    bytes: AtomicU64,
    deallocations: AtomicU64,

    announce_allocations: AtomicBool,
    announce_deallocations: AtomicBool,
}

impl Counters {
    /// Creates counters that are not attached to any allocator.
    ///
    /// Such counters never change on their own. They are useful for running code that takes
    /// counters where no [`CountingAllocator`] is installed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            deallocations: AtomicU64::new(0),
            announce_allocations: AtomicBool::new(false),
            announce_deallocations: AtomicBool::new(false),
        }
    }

    /// Records one allocation event of `size` bytes.
    ///
    /// Returns `false` without recording anything if the allocation count is saturated,
    /// in which case the allocation request must fail.
    pub(crate) fn register_allocation(&self, size: usize) -> bool {
        // Relaxed is sufficient: we only need atomicity, not ordering w.r.t. other memory ops.
        if self
            .allocations
            .fetch_update(
                atomic::Ordering::Relaxed,
                atomic::Ordering::Relaxed,
                |count| count.checked_add(1),
            )
            .is_err()
        {
            return false;
        }

        let size_u64: u64 = size.try_into().expect("usize always fits into u64");
        self.bytes.fetch_add(size_u64, atomic::Ordering::Relaxed);

        _ = THREAD_ALLOCATIONS.try_with(|count| count.set(count.get().wrapping_add(1)));
        _ = THREAD_BYTES.try_with(|bytes| bytes.set(bytes.get().wrapping_add(size_u64)));

        if self.announce_allocations.load(atomic::Ordering::Relaxed) {
            announce(Announcement::Allocation { size });
        }

        true
    }

    fn register_deallocation(&self, size: usize) {
        self.deallocations.fetch_add(1, atomic::Ordering::Relaxed);

        if self.announce_deallocations.load(atomic::Ordering::Relaxed) {
            announce(Announcement::Deallocation { size });
        }
    }

    /// The number of allocation events made by the process.
    ///
    /// Every successful call to `alloc`, `alloc_zeroed` or `realloc` counts as one event.
    #[must_use]
    #[inline]
    pub fn allocations(&self) -> u64 {
        self.allocations.load(atomic::Ordering::Relaxed)
    }

    /// The number of bytes requested by all allocation events of the process.
    #[must_use]
    #[inline]
    pub fn bytes(&self) -> u64 {
        self.bytes.load(atomic::Ordering::Relaxed)
    }

    /// The number of deallocation events made by the process.
    #[must_use]
    #[inline]
    pub fn deallocations(&self) -> u64 {
        self.deallocations.load(atomic::Ordering::Relaxed)
    }

    /// Starts printing a line for every allocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyEnabled`] if allocation messages are already enabled.
    pub fn enable_allocation_messages(&self) -> Result<()> {
        Self::enable(&self.announce_allocations, MessageKind::Allocation)
    }

    /// Stops printing a line for every allocation. Always safe to call.
    pub fn disable_allocation_messages(&self) {
        self.announce_allocations
            .store(false, atomic::Ordering::Relaxed);
    }

    /// Starts printing a line for every deallocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyEnabled`] if deallocation messages are already enabled.
    pub fn enable_deallocation_messages(&self) -> Result<()> {
        Self::enable(&self.announce_deallocations, MessageKind::Deallocation)
    }

    /// Stops printing a line for every deallocation. Always safe to call.
    pub fn disable_deallocation_messages(&self) {
        self.announce_deallocations
            .store(false, atomic::Ordering::Relaxed);
    }

    /// Whether a line is currently printed for every allocation.
    #[must_use]
    pub fn allocation_messages_enabled(&self) -> bool {
        self.announce_allocations.load(atomic::Ordering::Relaxed)
    }

    /// Whether a line is currently printed for every deallocation.
    #[must_use]
    pub fn deallocation_messages_enabled(&self) -> bool {
        self.announce_deallocations.load(atomic::Ordering::Relaxed)
    }

    fn enable(flag: &AtomicBool, messages: MessageKind) -> Result<()> {
        // Stdout allocates its buffer on first use. Get that out of the way now, while
        // nothing is being announced yet.
        _ = io::stdout().flush();

        if flag.swap(true, atomic::Ordering::Relaxed) {
            return Err(Error::AlreadyEnabled { messages });
        }

        Ok(())
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

/// A memory allocator that counts allocations and deallocations.
///
/// This allocator wraps any [`GlobalAlloc`] implementation, forwarding every request to it
/// after updating the [`Counters`]. When the allocation count is saturated, allocation
/// requests fail, which the Rust runtime reports as a fatal allocation error.
///
/// # Examples
///
/// ```rust
/// use alloc_watch::CountingAllocator;
///
/// #[global_allocator]
/// static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
/// ```
pub struct CountingAllocator<A: GlobalAlloc> {
    inner: A,
    counters: Counters,
}

impl<A: GlobalAlloc> fmt::Debug for CountingAllocator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("inner", &"<allocator>")
            .field("counters", &self.counters)
            .finish()
    }
}

impl CountingAllocator<std::alloc::System> {
    /// Creates a new counting allocator using the system's default allocator.
    #[must_use]
    #[inline]
    pub const fn system() -> Self {
        Self::new(std::alloc::System)
    }
}

impl<A: GlobalAlloc> CountingAllocator<A> {
    /// Creates a new counting allocator that forwards to the provided allocator.
    #[must_use]
    #[inline]
    pub const fn new(allocator: A) -> Self {
        Self {
            inner: allocator,
            counters: Counters::new(),
        }
    }

    /// The counters and announcement flags of this allocator.
    #[must_use]
    #[inline]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}

// SAFETY: We delegate all allocation operations to the underlying allocator,
// which already implements GlobalAlloc safely, while adding counting functionality.
// Returning null on a saturated counter is the documented way to signal allocation failure.
unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAllocator<A> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if !self.counters.register_allocation(layout.size()) {
            return ptr::null_mut();
        }

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc(layout) }
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.counters.register_deallocation(layout.size());

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.dealloc(ptr, layout) }
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        if !self.counters.register_allocation(layout.size()) {
            return ptr::null_mut();
        }

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc_zeroed(layout) }
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if !self.counters.register_allocation(new_size) {
            return ptr::null_mut();
        }

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.realloc(ptr, layout, new_size) }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(CountingAllocator<std::alloc::System>: Send, Sync);
    static_assertions::assert_impl_all!(Counters: Send, Sync);

    // These tests operate on standalone counters, not the global allocator.

    #[test]
    fn new_counters_are_zero_and_silent() {
        let counters = Counters::new();

        assert_eq!(counters.allocations(), 0);
        assert_eq!(counters.bytes(), 0);
        assert_eq!(counters.deallocations(), 0);
        assert!(!counters.allocation_messages_enabled());
        assert!(!counters.deallocation_messages_enabled());
    }

    #[test]
    fn register_allocation_counts_events_and_bytes() {
        let counters = Counters::new();

        assert!(counters.register_allocation(16));
        assert!(counters.register_allocation(48));
        counters.register_deallocation(16);

        assert_eq!(counters.allocations(), 2);
        assert_eq!(counters.bytes(), 64);
        assert_eq!(counters.deallocations(), 1);
    }

    #[test]
    fn saturated_count_refuses_allocation() {
        let counters = Counters::new();
        counters
            .allocations
            .store(u64::MAX, atomic::Ordering::Relaxed);

        assert!(!counters.register_allocation(8));
        assert_eq!(counters.allocations(), u64::MAX);
        assert_eq!(counters.bytes(), 0);
    }

    #[test]
    fn enabling_twice_is_an_error() {
        let counters = Counters::new();

        counters.enable_allocation_messages().unwrap();
        assert!(matches!(
            counters.enable_allocation_messages(),
            Err(Error::AlreadyEnabled {
                messages: MessageKind::Allocation
            })
        ));

        counters.enable_deallocation_messages().unwrap();
        assert!(matches!(
            counters.enable_deallocation_messages(),
            Err(Error::AlreadyEnabled {
                messages: MessageKind::Deallocation
            })
        ));
    }

    #[test]
    fn disabling_is_always_safe() {
        let counters = Counters::new();

        counters.disable_allocation_messages();
        counters.disable_deallocation_messages();

        counters.enable_allocation_messages().unwrap();
        counters.disable_allocation_messages();
        counters.disable_allocation_messages();
        assert!(!counters.allocation_messages_enabled());

        // After disabling, enabling works again.
        counters.enable_allocation_messages().unwrap();
        assert!(counters.allocation_messages_enabled());
    }

    fn formatted(announcement: Announcement) -> String {
        let mut buffer = [0_u8; ANNOUNCEMENT_CAPACITY];
        let line = format_announcement(announcement, &mut buffer).unwrap();

        String::from_utf8(line.to_vec()).unwrap()
    }

    #[test]
    fn announcement_lines() {
        assert_eq!(
            formatted(Announcement::Allocation { size: 24 }),
            "Made an allocation of size 24.\n"
        );
        assert_eq!(
            formatted(Announcement::Deallocation { size: 4 }),
            "Freed an allocation of size 4.\n"
        );
        assert_eq!(formatted(Announcement::NoAllocations), "Made no allocations.\n");
    }

    #[test]
    fn largest_announcement_fits_the_buffer() {
        assert_eq!(
            formatted(Announcement::Allocation { size: usize::MAX }),
            format!("Made an allocation of size {}.\n", usize::MAX)
        );
        assert_eq!(
            formatted(Announcement::Deallocation { size: usize::MAX }),
            format!("Freed an allocation of size {}.\n", usize::MAX)
        );
    }

    #[test]
    fn line_that_does_not_fit_is_not_announced() {
        let mut buffer = [0_u8; 8];

        assert_eq!(
            format_announcement(Announcement::NoAllocations, &mut buffer),
            None
        );
    }

    #[test]
    fn nested_announcements_are_dropped() {
        let mut outer = Vec::new();
        let mut nested_called = false;

        announce_to(Announcement::Allocation { size: 8 }, |line| {
            outer.extend_from_slice(line);
            announce_to(Announcement::Deallocation { size: 8 }, |_| nested_called = true);
        });

        assert_eq!(outer, b"Made an allocation of size 8.\n");
        assert!(!nested_called);

        // The guard is released afterwards.
        let mut after = Vec::new();
        announce_to(Announcement::NoAllocations, |line| after.extend_from_slice(line));
        assert_eq!(after, b"Made no allocations.\n");
    }

    #[test]
    fn register_allocation_updates_thread_counters() {
        let counters = Counters::new();
        let before_allocations = thread_allocations();
        let before_bytes = thread_bytes();

        assert!(counters.register_allocation(100));

        assert_eq!(thread_allocations(), before_allocations.wrapping_add(1));
        assert_eq!(thread_bytes(), before_bytes.wrapping_add(100));
    }
}

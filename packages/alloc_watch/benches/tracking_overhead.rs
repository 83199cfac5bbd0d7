//! Benchmarks to measure the compute overhead of `alloc_watch` logic itself.
//!
//! These benchmarks measure the overhead of the tracking infrastructure by
//! benchmarking empty trackers and single allocations with and without a tracker.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use alloc_watch::{AllocationTracker, CountingAllocator, Messages, Scope};
use criterion::{Criterion, criterion_group, criterion_main};

#[global_allocator]
static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_watch_overhead");

    group.bench_function("baseline_empty", |b| {
        b.iter(|| {
            black_box(());
        });
    });

    group.bench_function("process_tracker_empty", |b| {
        b.iter(|| {
            let tracker =
                AllocationTracker::new(ALLOCATOR.counters(), Scope::Process, Messages::NONE)
                    .expect("silent tracker cannot fail");
            black_box(tracker.allocations_made());
        });
    });

    group.bench_function("thread_tracker_empty", |b| {
        b.iter(|| {
            let tracker =
                AllocationTracker::new(ALLOCATOR.counters(), Scope::Thread, Messages::NONE)
                    .expect("silent tracker cannot fail");
            black_box(tracker.allocations_made());
        });
    });

    group.bench_function("counted_box_allocation", |b| {
        b.iter(|| {
            black_box(Box::new(black_box(42_u64)));
        });
    });

    group.finish();
}

//! Announces the allocations made by a few common operations.
//!
//! Run with: `cargo run --example alloc_watch_basic`

use std::collections::HashMap;
use std::hint::black_box;

use alloc_watch::{AllocationTracker, CountingAllocator, Messages, Scope};

#[global_allocator]
static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();

fn main() {
    println!("Formatting a string.");
    {
        let _tracker =
            AllocationTracker::new(ALLOCATOR.counters(), Scope::Process, Messages::ALLOCATIONS)
                .expect("no other tracker announces");
        black_box(format!("String number {}", black_box(7)));
    }

    println!("Inserting three entries into a HashMap.");
    {
        let tracker =
            AllocationTracker::new(ALLOCATOR.counters(), Scope::Process, Messages::ALL)
                .expect("no other tracker announces");
        let mut map = HashMap::new();
        map.insert("key1", "value1");
        map.insert("key2", "value2");
        map.insert("key3", "value3");
        black_box(&map);

        let allocations = tracker.allocations_made();
        drop(tracker);
        drop(map);
        println!("That took {allocations} allocation events.");
    }

    println!("Adding two integers.");
    {
        let _tracker =
            AllocationTracker::new(ALLOCATOR.counters(), Scope::Process, Messages::ALLOCATIONS)
                .expect("no other tracker announces");
        black_box(black_box(2_u32).wrapping_add(black_box(2)));
    }
}

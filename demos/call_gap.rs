//! Call Gap Example
//!
//! Measures the delay between successive calls, the reason call slots are
//! pre-allocated.
//!
//! # Key Concepts Demonstrated
//!
//! ## 1. Slot pre-allocation
//!
//! When a call consumes slot N, slot N+1 is created before the wrapped
//! function runs. Slot N+1's `created_at` therefore marks the moment it
//! became the active slot, and its report's `duration()` is the gap until
//! the next call actually landed. A slow wrapped function does not inflate
//! the measurement of the call that follows it.
//!
//! ## 2. Deferred notification
//!
//! `when_called` listeners registered ahead of an invocation run inline
//! when that invocation lands, exactly once.

use std::{thread, time::Duration};

use spyglass::{Result, Spy};

pub fn main() -> Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut flush: Spy<(), (), ()> = Spy::named("flush");

    // Watch the second call before it happens.
    flush.track(1).when_called(|report| {
        println!(
            "second call observed, {:?} after its slot opened",
            report.duration(),
        );
    });

    flush.call((), ())?;

    // Simulate a debounce window between flushes.
    thread::sleep(Duration::from_millis(20));

    flush.call((), ())?;

    let gap = flush
        .report(1)
        .duration()
        .expect("second call was recorded");
    assert!(gap >= Duration::from_millis(20));
    println!("gap between calls: {gap:?}");

    Ok(())
}

//! Arithmetic Spy Example
//!
//! Wraps a real function in a spy and walks through the recorded history.
//!
//! # Key Concepts Demonstrated
//!
//! ## 1. Wrapping
//!
//! The spy forwards every call to the wrapped closure and captures its
//! return value; callers see the same value the closure produced.
//!
//! ## 2. Reports
//!
//! Each call slot yields an immutable `Report` snapshot: context,
//! arguments, return value, timestamps, and the global order stamp.
//!
//! ## 3. Ordering across spies
//!
//! Two spies sharing a `Sequence` produce comparable `absolute_order`
//! values, so a test can assert which spy was called first.

use spyglass::{Result, Sequence, Spy};

pub fn main() -> Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Both spies draw order stamps from the same counter.
    let sequence = Sequence::new();

    let mut adder = Spy::builder()
        .name("adder")
        .wrapping(|_: &(), (a, b): &(i32, i32)| a + b)
        .sequence(sequence.clone())
        .build();

    let mut doubler = Spy::builder()
        .name("doubler")
        .wrapping(|_: &(), n: &i32| n * 2)
        .sequence(sequence)
        .build();

    let sum = adder.call((), (2, 3))?;
    println!("{adder} returned {sum:?}");
    let twice = doubler.call((), 21)?;
    println!("{doubler} returned {twice:?}");
    let sum = adder.call((), (10, 32))?;
    println!("{adder} returned {sum:?}");

    // Walk the adder's history.
    for report in adder.called_reports() {
        println!(
            "order {:?}: {:?} -> {:?}",
            report.absolute_order(),
            report.arguments(),
            report.return_value(),
        );
    }

    // The doubler's only call landed between the adder's two.
    let first_add = adder.first_called_report().expect("adder was called");
    let double = doubler.first_called_report().expect("doubler was called");
    let last_add = adder.last_called_report().expect("adder was called");
    assert!(first_add.happened_before(&double));
    assert!(double.happened_before(&last_add));

    println!("call counts: adder={}, doubler={}", adder.call_count(), doubler.call_count());
    Ok(())
}

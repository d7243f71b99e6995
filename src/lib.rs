//! # Spyglass
//!
//! A call-recording engine for building test doubles.
//!
//! A [`Spy`] wraps an optional underlying function, intercepts every
//! invocation, and exposes a queryable, timestamped, strictly ordered
//! history of calls: arguments, context, return value, timing, and call
//! index. Call order is stamped from a process-wide [`Sequence`], so the
//! order of calls is comparable across independent spies.
//!
//! ## Quick Start
//!
//! ```rust
//! use spyglass::Spy;
//!
//! let mut spy = Spy::builder()
//!     .name("adder")
//!     .wrapping(|_: &(), (a, b): &(i32, i32)| a + b)
//!     .build();
//!
//! assert_eq!(spy.call((), (2, 3)).unwrap(), Some(5));
//! assert_eq!(spy.call((), (4, 4)).unwrap(), Some(8));
//!
//! let report = spy.report(0);
//! assert!(report.called());
//! assert_eq!(report.arguments(), Some(&(2, 3)));
//! assert_eq!(report.return_value(), Some(&5));
//! assert!(report.happened_before(&spy.report(1)));
//!
//! assert_eq!(spy.call_count(), 2);
//! assert_eq!(spy.to_string(), "adder spy");
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Spy`] | Callable wrapper that records every invocation |
//! | [`Tracker`] | Per-call-slot state holder; notified exactly once |
//! | [`Report`] | Immutable snapshot of a call slot |
//! | [`Sequence`] | Injectable counter issuing global call order |
//! | [`SpyName`] | Cheap-to-clone display name (`"{name} spy"`) |
//! | [`SpyBuilder`] | Spy construction with custom configuration |
//! | [`Callable`] | The wrapped-function capability |
//! | [`Capture`] | Bound for captured context/arguments/return values |
//!
//! ## Call Slots
//!
//! A spy's history is a sparse collection of 0-indexed call slots. Slot 0 is
//! materialized at construction, and every invocation pre-allocates the next
//! slot *before* the wrapped function runs. Each slot's `created_at`
//! therefore marks the moment it became the active one, and
//! [`Report::duration`] measures the gap between successive calls,
//! independent of how long the previous call's wrapped function took:
//!
//! ```rust
//! use spyglass::Spy;
//!
//! let mut debounced: Spy<(), (), ()> = Spy::named("flush");
//! debounced.call((), ()).unwrap();
//! // ... time passes between calls ...
//! debounced.call((), ()).unwrap();
//!
//! // Slot 1 was pre-allocated when slot 0 was consumed, so this duration
//! // is the delay between the two calls.
//! assert!(debounced.report(1).duration().is_some());
//! ```
//!
//! Listeners register ahead of the invocation they observe through
//! [`Spy::track`] and [`Tracker::when_called`]; each listener is delivered
//! exactly once, whether registered before or after the call.
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for [`Report`] and [`SpyName`]
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - `arithmetic.rs` - wrap a function and inspect its call history
//! - `call_gap.rs` - measure the delay between successive calls
//!
//! ## Note
//!
//! The engine is single-threaded and synchronous: invocation and
//! notification run to completion without yielding, and `when_called`
//! callbacks run inline. Only the [`Sequence`] counter is shared state, and
//! it is atomic.

mod callable;
mod capture;
mod error;
mod report;
mod sequence;
mod spy;
mod spy_builder;
mod spy_name;
mod tracker;

pub use callable::Callable;
pub use capture::Capture;
pub use error::Error;
pub use report::Report;
pub use sequence::Sequence;
pub use spy::Spy;
pub use spy_builder::SpyBuilder;
pub use spy_name::SpyName;
pub use tracker::Tracker;

/// Convenience alias for `Result<T, spyglass::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;

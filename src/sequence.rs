use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, OnceLock,
};

/// Monotonically increasing counter issuing absolute call order.
///
/// Every [`Tracker`](crate::Tracker) stamps the next value from its spy's
/// `Sequence` at notification time, which makes call order comparable across
/// independent spies that share a counter. The value is only meaningful for
/// relative comparison (`a` before `b` ⇔ `a < b`), never as a duration.
///
/// Clones share the underlying counter. Spies use [`Sequence::global`] by
/// default; construct and inject a fresh `Sequence` through
/// [`SpyBuilder::sequence`](crate::SpyBuilder::sequence) when a test needs
/// ordering isolated from the rest of the process.
///
/// The counter is atomic so ordering stays globally consistent even if the
/// engine is ever driven from more than one thread; no other state in the
/// crate is shared.
///
/// # Example
///
/// ```rust
/// use spyglass::Sequence;
///
/// let sequence = Sequence::new();
/// assert_eq!(sequence.next(), 1);
/// assert_eq!(sequence.next(), 2);
///
/// let shared = sequence.clone();
/// assert_eq!(shared.next(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Sequence(Arc<AtomicU64>);

impl Sequence {
    /// Create a counter independent from every other `Sequence`.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(0)))
    }

    /// The process-wide counter used by spies unless one is injected.
    ///
    /// Initialized on first use and never torn down.
    pub fn global() -> Self {
        static GLOBAL: OnceLock<Sequence> = OnceLock::new();
        GLOBAL.get_or_init(Sequence::new).clone()
    }

    /// Returns the post-increment value: 1 for the first notification drawn
    /// from this counter, then 2, and so on.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The value most recently issued, or 0 if none has been.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Restart the counter so the next value issued is 1.
    ///
    /// For test isolation on a reused counter. Resetting a counter that live
    /// trackers still reference reissues already-assigned order values, so
    /// reset only between independent test runs.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Sequence::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_starts_at_one() {
        let sequence = Sequence::new();
        assert_eq!(sequence.next(), 1);
    }

    #[test]
    fn next_is_strictly_increasing() {
        let sequence = Sequence::new();
        let first = sequence.next();
        let second = sequence.next();
        let third = sequence.next();
        assert!(first < second && second < third);
    }

    #[test]
    fn clones_share_the_counter() {
        let sequence = Sequence::new();
        let shared = sequence.clone();
        assert_eq!(sequence.next(), 1);
        assert_eq!(shared.next(), 2);
        assert_eq!(sequence.current(), 2);
    }

    #[test]
    fn fresh_sequences_are_independent() {
        let a = Sequence::new();
        let b = Sequence::new();
        assert_eq!(a.next(), 1);
        assert_eq!(b.next(), 1);
    }

    #[test]
    fn reset_restarts_from_one() {
        let sequence = Sequence::new();
        sequence.next();
        sequence.next();
        sequence.reset();
        assert_eq!(sequence.current(), 0);
        assert_eq!(sequence.next(), 1);
    }

    #[test]
    fn global_clones_share_the_counter() {
        // Other tests may bump the global counter concurrently, so only
        // assert the ordering relation, not exact values.
        let a = Sequence::global();
        let b = Sequence::global();
        assert!(a.next() < b.next());
    }
}

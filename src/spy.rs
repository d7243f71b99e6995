use std::{collections::BTreeMap, fmt};

use tracing::trace;

use crate::{Callable, Capture, Report, Result, Sequence, SpyBuilder, SpyName, Tracker};

/// Callable wrapper that records every invocation.
///
/// A spy optionally wraps an underlying function and keeps a timestamped,
/// strictly ordered history of calls: arguments, context, return value,
/// timing, and call index. Queries return immutable [`Report`] snapshots;
/// [`track`](Self::track) exposes the underlying [`Tracker`] of a slot for
/// registering `when_called` listeners ahead of the invocation.
///
/// Call slots are sparse and lazily materialized: slot 0 exists from
/// construction, and each invocation pre-allocates the next slot *before*
/// the wrapped function runs, so every slot's `created_at` marks the moment
/// it became the active one. That makes [`Report::duration`] the gap
/// between successive calls (useful for asserting on debounce/throttle
/// delays), independent of how long the previous call took to execute.
///
/// `C`, `A`, and `R` are the captured context, arguments, and return value
/// types (see [`Capture`]).
///
/// # Example
///
/// ```rust
/// use spyglass::Spy;
///
/// let mut spy = Spy::builder()
///     .name("adder")
///     .wrapping(|_: &(), (a, b): &(i32, i32)| a + b)
///     .build();
///
/// assert_eq!(spy.call((), (2, 3)).unwrap(), Some(5));
///
/// let report = spy.report(0);
/// assert!(report.called());
/// assert_eq!(report.arguments(), Some(&(2, 3)));
/// assert_eq!(report.return_value(), Some(&5));
/// ```
pub struct Spy<C: Capture, A: Capture, R: Capture> {
    name: SpyName,
    wrapped: Option<Box<dyn Callable<C, A, R>>>,
    sequence: Sequence,
    slots: BTreeMap<usize, Tracker<C, A, R>>,
    current_slot: usize,
}

impl<C: Capture, A: Capture, R: Capture> fmt::Debug for Spy<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("name", &self.name)
            .field("slots", &self.slots.len())
            .field("current_slot", &self.current_slot)
            .finish_non_exhaustive()
    }
}

impl<C: Capture, A: Capture, R: Capture> Spy<C, A, R> {
    pub(crate) fn from_parts(
        name: SpyName,
        wrapped: Option<Box<dyn Callable<C, A, R>>>,
        sequence: Sequence,
    ) -> Self {
        let mut spy = Self {
            name,
            wrapped,
            sequence,
            slots: BTreeMap::new(),
            current_slot: 0,
        };
        // Slot 0 exists up front so its created_at marks spy creation.
        spy.slot_mut(0);
        spy
    }

    /// An anonymous spy wrapping nothing; every call records and returns
    /// `None`.
    #[must_use]
    pub fn new() -> Self {
        SpyBuilder::new().build()
    }

    /// A named spy wrapping nothing.
    pub fn named(name: impl Into<SpyName>) -> Self {
        SpyBuilder::new().name(name).build()
    }

    /// An anonymous spy forwarding every call to `f`.
    pub fn wrapping<F>(f: F) -> Self
    where
        F: FnMut(&C, &A) -> R + 'static,
    {
        SpyBuilder::new().wrapping(f).build()
    }

    /// Construction with custom configuration: name, wrapped callable,
    /// injected [`Sequence`].
    pub fn builder() -> SpyBuilder<C, A, R> {
        SpyBuilder::new()
    }

    // ==================== Invocation ====================

    /// Record an invocation, forwarding it to the wrapped function if any.
    ///
    /// Consumes the tracker at the current slot and pre-allocates the next
    /// one before the wrapped function runs. The wrapped function receives
    /// the same context and arguments by reference; its return value is
    /// captured and becomes this call's return value (`None` when the spy
    /// wraps nothing).
    ///
    /// # Errors
    ///
    /// A failure from a fallible wrapped callable propagates unmodified, and
    /// the consumed slot stays unnotified; a failing wrapped function never
    /// produces a report. [`Error::AlreadyNotified`](crate::Error) surfaces
    /// only when the consumed slot was already notified manually through
    /// [`track`](Self::track).
    pub fn call(&mut self, context: C, arguments: A) -> Result<Option<R>> {
        let index = self.current_slot;
        self.current_slot += 1;
        let next = self.current_slot;
        self.slot_mut(next);

        let return_value = match self.wrapped.as_mut() {
            Some(wrapped) => Some(wrapped.invoke(&context, &arguments)?),
            None => None,
        };
        self.slot_mut(index)
            .notify(context, arguments, return_value.clone())?;
        trace!(spy = %self.name, slot = index, "invocation recorded");
        Ok(return_value)
    }

    /// [`call`](Self::call) with a defaulted context, for the common
    /// `C = ()` case.
    pub fn invoke(&mut self, arguments: A) -> Result<Option<R>>
    where
        C: Default,
    {
        self.call(C::default(), arguments)
    }

    // ==================== Query Access ====================

    /// Snapshot of the slot at `index`, materializing it on demand.
    ///
    /// Only the requested slot is created; a never-invoked slot reports
    /// `called() == false` with its `created_at` set.
    pub fn report(&mut self, index: usize) -> Report<C, A, R> {
        self.slot_mut(index).report()
    }

    /// Reports for all materialized slots, in slot order.
    ///
    /// Includes pre-allocated and on-demand slots that were never invoked;
    /// filter with [`called_reports`](Self::called_reports) for history of
    /// actual calls.
    pub fn reports(&self) -> Vec<Report<C, A, R>> {
        self.slots.values().map(Tracker::report).collect()
    }

    /// Reports of the slots that were actually called, in slot order.
    pub fn called_reports(&self) -> Vec<Report<C, A, R>> {
        self.slots
            .values()
            .filter(|tracker| tracker.called())
            .map(Tracker::report)
            .collect()
    }

    /// Number of invocations recorded so far.
    pub fn call_count(&self) -> usize {
        self.slots.values().filter(|tracker| tracker.called()).count()
    }

    /// Report of the earliest called slot, or `None` before the first call.
    ///
    /// Distinct from a never-called slot's report, which exists but carries
    /// `called() == false`.
    pub fn first_called_report(&self) -> Option<Report<C, A, R>> {
        self.slots
            .values()
            .find(|tracker| tracker.called())
            .map(Tracker::report)
    }

    /// Report of the latest called slot, or `None` before the first call.
    pub fn last_called_report(&self) -> Option<Report<C, A, R>> {
        self.slots
            .values()
            .rev()
            .find(|tracker| tracker.called())
            .map(Tracker::report)
    }

    /// Direct access to the tracker at a slot, materializing it on demand.
    ///
    /// Use this to register [`when_called`](Tracker::when_called) listeners
    /// ahead of the invocation, or to drive [`notify`](Tracker::notify)
    /// manually from a harness.
    pub fn track(&mut self, index: usize) -> &mut Tracker<C, A, R> {
        self.slot_mut(index)
    }

    /// This spy's display name.
    pub fn name(&self) -> &SpyName {
        &self.name
    }

    fn slot_mut(&mut self, index: usize) -> &mut Tracker<C, A, R> {
        self.slots
            .entry(index)
            .or_insert_with(|| Tracker::new(self.name.clone(), index, self.sequence.clone()))
    }
}

impl<C: Capture, A: Capture, R: Capture> Default for Spy<C, A, R> {
    fn default() -> Self {
        Spy::new()
    }
}

impl<C: Capture, A: Capture, R: Capture> fmt::Display for Spy<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;
    use crate::Error;

    #[test]
    fn calling_spy_records_a_call() {
        let mut spy: Spy<&'static str, Vec<i32>, ()> = Spy::new();
        spy.call("receiver", vec![0, 1]).unwrap();

        let report = spy.report(0);
        assert!(report.called());
        assert_eq!(report.context(), Some(&"receiver"));
        assert_eq!(report.arguments(), Some(&vec![0, 1]));
        assert_eq!(report.return_value(), None);
        assert!(report.duration().is_some());
    }

    #[test]
    fn wrapped_function_receives_the_call_and_its_value_is_captured() {
        let received = Rc::new(RefCell::new(None));
        let inner = received.clone();
        let mut spy = Spy::wrapping(move |_: &(), arguments: &Vec<i32>| {
            *inner.borrow_mut() = Some(arguments.clone());
            42
        });

        let value = spy.call((), vec![0, 1]).unwrap();
        assert_eq!(value, Some(42));
        assert_eq!(*received.borrow(), Some(vec![0, 1]));
        assert_eq!(spy.report(0).return_value(), Some(&42));
    }

    #[test]
    fn spy_without_wrapped_function_returns_none() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        assert_eq!(spy.call((), ()).unwrap(), None);
        assert_eq!(spy.report(0).return_value(), None);
    }

    #[test]
    fn invoke_defaults_the_context() {
        let mut spy = Spy::wrapping(|_: &(), n: &i32| n + 1);
        assert_eq!(spy.invoke(41).unwrap(), Some(42));
        assert_eq!(spy.report(0).context(), Some(&()));
    }

    #[test]
    fn call_count_follows_each_invocation() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        for n in 1..=4 {
            assert_eq!(spy.call_count(), n - 1);
            assert_eq!(spy.called_reports().len(), n - 1);
            spy.call((), ()).unwrap();
            assert_eq!(spy.call_count(), n);
            assert_eq!(spy.called_reports().len(), n);
        }
    }

    #[test]
    fn uncalled_slots_are_reported_but_not_counted() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        spy.call((), ()).unwrap();
        spy.call((), ()).unwrap();
        spy.track(5);

        // Slots 0 and 1 were called, slot 2 was pre-allocated, slot 5 was
        // materialized on demand; nothing in between exists.
        assert_eq!(spy.call_count(), 2);
        assert_eq!(spy.reports().len(), 4);
        assert_eq!(spy.called_reports().len(), 2);
    }

    #[test]
    fn report_for_never_invoked_slot_has_created_at_only() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        let report = spy.report(3);

        assert!(!report.called());
        assert!(report.created_at() > 0);
        assert_eq!(report.called_at(), None);
        assert_eq!(report.absolute_order(), None);
        assert_eq!(report.context(), None);
        assert_eq!(report.arguments(), None);
        assert_eq!(report.return_value(), None);
        // Only slot 0 (construction) and slot 3 (on demand) exist.
        assert_eq!(spy.reports().len(), 2);
    }

    #[test]
    fn next_slot_is_preallocated_by_each_call() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        assert_eq!(spy.reports().len(), 1);

        spy.call((), ()).unwrap();
        let reports = spy.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].called());
        assert!(!reports[1].called());
        assert!(reports[1].created_at() >= reports[0].created_at());
    }

    #[test]
    fn first_and_last_called_report() {
        let mut spy = Spy::wrapping(|_: &(), n: &i32| n * 2);
        assert!(spy.first_called_report().is_none());
        assert!(spy.last_called_report().is_none());

        spy.call((), 1).unwrap();
        spy.call((), 2).unwrap();
        spy.track(7);

        let first = spy.first_called_report().unwrap();
        let last = spy.last_called_report().unwrap();
        assert_eq!(first.return_value(), Some(&2));
        assert_eq!(last.return_value(), Some(&4));
    }

    #[test]
    fn absolute_order_increases_across_interleaved_spies() {
        let sequence = Sequence::new();
        let mut adder: Spy<(), (), ()> =
            Spy::builder().name("adder").sequence(sequence.clone()).build();
        let mut logger: Spy<(), i32, ()> =
            Spy::builder().name("logger").sequence(sequence).build();

        adder.call((), ()).unwrap();
        logger.call((), 1).unwrap();
        adder.call((), ()).unwrap();

        assert_eq!(adder.report(0).absolute_order(), Some(1));
        assert_eq!(logger.report(0).absolute_order(), Some(2));
        assert_eq!(adder.report(1).absolute_order(), Some(3));
        assert!(adder.report(0).happened_before(&logger.report(0)));
        assert!(logger.report(0).happened_before(&adder.report(1)));
    }

    #[test]
    fn when_called_registered_ahead_of_invocation_fires_on_call() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        let notified = Rc::new(Cell::new(false));

        let flag = notified.clone();
        spy.track(0).when_called(move |report| flag.set(report.called()));
        assert!(!notified.get());

        spy.call((), ()).unwrap();
        assert!(notified.get());
    }

    #[test]
    fn failing_wrapped_function_leaves_the_slot_unnotified() {
        #[derive(Debug, thiserror::Error)]
        #[error("boom")]
        struct Boom;

        let mut spy = Spy::builder()
            .name("faulty")
            .try_wrapping(|_: &(), fail: &bool| {
                if *fail {
                    Err(Error::external(Boom))
                } else {
                    Ok(1)
                }
            })
            .build();

        let err = spy.call((), true).unwrap_err();
        assert!(matches!(err, Error::External(_)));
        assert!(!spy.report(0).called());
        assert_eq!(spy.call_count(), 0);

        // The failed invocation still consumed slot 0; the next call lands
        // on slot 1.
        assert_eq!(spy.call((), false).unwrap(), Some(1));
        assert!(!spy.report(0).called());
        assert!(spy.report(1).called());
        assert_eq!(spy.call_count(), 1);
    }

    #[test]
    fn manually_notifying_a_consumed_slot_fails() {
        let mut spy: Spy<(), (), ()> = Spy::new();
        spy.call((), ()).unwrap();
        let before = spy.report(0);

        let err = spy.track(0).notify((), (), None).unwrap_err();
        assert_eq!(
            err,
            Error::AlreadyNotified("anonymous spy first call".into())
        );
        assert_eq!(spy.report(0), before);
    }

    #[test]
    fn display_uses_the_spy_name() {
        assert_eq!(Spy::<(), (), ()>::new().to_string(), "anonymous spy");
        assert_eq!(Spy::<(), (), ()>::named("adder").to_string(), "adder spy");
    }
}

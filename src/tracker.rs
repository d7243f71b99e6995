use std::{
    fmt,
    time::SystemTime,
};

use tracing::trace;

use crate::{Capture, Error, Report, Result, Sequence, SpyName};

/// Current time in nanoseconds since the Unix epoch.
///
/// # Panics
///
/// Panics if the system clock is set before the Unix epoch.
pub(crate) fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .expect("SystemTime before Unix epoch")
        .as_nanos() as u64
}

/// State holder for one call slot of a [`Spy`](crate::Spy).
///
/// A tracker is created when its slot is pre-allocated and transitions from
/// *unnotified* to *notified* exactly once, when an invocation lands on the
/// slot (or [`notify`](Self::notify) is driven manually). Once notified,
/// every field is fixed for the tracker's remaining lifetime; a second
/// notification fails with [`Error::AlreadyNotified`].
///
/// Obtain trackers through [`Spy::track`](crate::Spy::track), typically to
/// register [`when_called`](Self::when_called) listeners ahead of the
/// invocation they observe.
pub struct Tracker<C: Capture, A: Capture, R: Capture> {
    spy_name: SpyName,
    index: usize,
    sequence: Sequence,
    created_at: u64,
    called_at: Option<u64>,
    called: bool,
    absolute_order: Option<u64>,
    context: Option<C>,
    arguments: Option<A>,
    return_value: Option<R>,
    pending: Vec<Box<dyn FnOnce(Report<C, A, R>)>>,
}

impl<C: Capture, A: Capture, R: Capture> fmt::Debug for Tracker<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("spy_name", &self.spy_name)
            .field("index", &self.index)
            .field("called", &self.called)
            .field("absolute_order", &self.absolute_order)
            .finish_non_exhaustive()
    }
}

impl<C: Capture, A: Capture, R: Capture> Tracker<C, A, R> {
    pub(crate) fn new(spy_name: SpyName, index: usize, sequence: Sequence) -> Self {
        Self {
            spy_name,
            index,
            sequence,
            created_at: now_nanos(),
            called_at: None,
            called: false,
            absolute_order: None,
            context: None,
            arguments: None,
            return_value: None,
            pending: Vec::new(),
        }
    }

    /// Position of this slot within the owning spy's history.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// True once the slot has been notified.
    #[inline]
    pub fn called(&self) -> bool {
        self.called
    }

    /// Record the invocation that consumed this slot.
    ///
    /// Stamps the notification time, marks the slot called, draws the next
    /// absolute order value from the spy's [`Sequence`](crate::Sequence),
    /// captures context/arguments/return value, then delivers the finalized
    /// report to every pending [`when_called`](Self::when_called) callback
    /// in registration order and clears the queue. Returns the finalized
    /// report. This is the only mutating operation on a tracker.
    ///
    /// `return_value` is `None` when the spy wraps no function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyNotified`] if the slot was already notified;
    /// the recorded state is left untouched. Double notification is a
    /// programming error in the harness driving the spy, not a
    /// data-validity issue.
    pub fn notify(
        &mut self,
        context: C,
        arguments: A,
        return_value: Option<R>,
    ) -> Result<Report<C, A, R>> {
        if self.called {
            return Err(Error::AlreadyNotified(self.to_string()));
        }
        self.called_at = Some(now_nanos());
        self.called = true;
        // Timestamps alone cannot order calls settled within the same clock
        // tick; the sequence value can.
        self.absolute_order = Some(self.sequence.next());
        self.context = Some(context);
        self.arguments = Some(arguments);
        self.return_value = return_value;

        let report = self.report();
        for callback in self.pending.drain(..) {
            callback(report.clone());
        }
        trace!(call = %self, order = self.absolute_order, "notified");
        Ok(report)
    }

    /// Run `callback` once, with the report of this slot's notification.
    ///
    /// If the slot is already notified the callback runs synchronously right
    /// now with the current snapshot; otherwise it is queued and runs inline
    /// during the eventual [`notify`](Self::notify). Either way it is
    /// delivered exactly once. Callbacks run in registration order; one that
    /// panics propagates and aborts delivery of those remaining.
    pub fn when_called<F>(&mut self, callback: F)
    where
        F: FnOnce(Report<C, A, R>) + 'static,
    {
        if self.called {
            callback(self.report());
        } else {
            self.pending.push(Box::new(callback));
        }
    }

    /// Snapshot the slot's current state.
    ///
    /// Safe to read at any time: before notification the report carries
    /// `called() == false`, a `created_at`, and nothing else.
    pub fn report(&self) -> Report<C, A, R> {
        Report {
            created_at: self.created_at,
            called_at: self.called_at,
            called: self.called,
            absolute_order: self.absolute_order,
            context: self.context.clone(),
            arguments: self.arguments.clone(),
            return_value: self.return_value.clone(),
        }
    }
}

impl<C: Capture, A: Capture, R: Capture> fmt::Display for Tracker<C, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            0 => write!(f, "{} first call", self.spy_name),
            1 => write!(f, "{} second call", self.spy_name),
            2 => write!(f, "{} third call", self.spy_name),
            n => write!(f, "{} call n°{}", self.spy_name, n + 1),
        }
    }
}

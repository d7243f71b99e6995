use std::time::Duration;

use crate::Capture;

/// Immutable snapshot of a call slot.
///
/// Produced by [`Tracker::report`](crate::Tracker::report) and the query
/// methods on [`Spy`](crate::Spy), and delivered to
/// [`when_called`](crate::Tracker::when_called) callbacks. A report reflects
/// the slot at the moment it was taken and never changes afterwards; a slot
/// that has not been notified yet yields `called() == false` with every
/// capture field `None` and only `created_at()` set.
///
/// Timestamps are nanoseconds since the Unix epoch (`u64`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "C: serde::Serialize, A: serde::Serialize, R: serde::Serialize",
        deserialize = "C: serde::de::DeserializeOwned, A: serde::de::DeserializeOwned, R: serde::de::DeserializeOwned"
    ))
)]
pub struct Report<C: Capture, A: Capture, R: Capture> {
    pub(crate) created_at: u64,
    pub(crate) called_at: Option<u64>,
    pub(crate) called: bool,
    pub(crate) absolute_order: Option<u64>,
    pub(crate) context: Option<C>,
    pub(crate) arguments: Option<A>,
    pub(crate) return_value: Option<R>,
}

impl<C: Capture, A: Capture, R: Capture> Report<C, A, R> {
    /// When the slot was pre-allocated.
    #[inline]
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// When the slot was notified, or `None` if it never was.
    #[inline]
    pub fn called_at(&self) -> Option<u64> {
        self.called_at
    }

    /// True once the slot has been consumed by an invocation.
    #[inline]
    pub fn called(&self) -> bool {
        self.called
    }

    /// Global order stamp assigned at notification time.
    ///
    /// Comparable across spies sharing a [`Sequence`](crate::Sequence);
    /// meaningless as a duration.
    #[inline]
    pub fn absolute_order(&self) -> Option<u64> {
        self.absolute_order
    }

    /// The context (receiver) the call was made with.
    #[inline]
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    /// The arguments the call was made with.
    #[inline]
    pub fn arguments(&self) -> Option<&A> {
        self.arguments.as_ref()
    }

    /// What the wrapped function returned, if the spy wraps one.
    #[inline]
    pub fn return_value(&self) -> Option<&R> {
        self.return_value.as_ref()
    }

    /// Elapsed time from slot pre-allocation to notification.
    ///
    /// Because the next slot is pre-allocated before the current call's
    /// wrapped function runs, this measures "time since this slot became the
    /// active one": the gap between successive calls, independent of how
    /// long the previous call took to execute.
    pub fn duration(&self) -> Option<Duration> {
        self.called_at
            .map(|called_at| Duration::from_nanos(called_at.saturating_sub(self.created_at)))
    }

    /// True iff both reports were notified and this one earlier.
    ///
    /// Uses the absolute order stamp, so it compares correctly across two
    /// spies sharing a [`Sequence`](crate::Sequence) even when wall-clock
    /// timestamps collide. Unnotified reports order against nothing.
    pub fn happened_before<C2, A2, R2>(&self, other: &Report<C2, A2, R2>) -> bool
    where
        C2: Capture,
        A2: Capture,
        R2: Capture,
    {
        match (self.absolute_order, other.absolute_order) {
            (Some(own), Some(others)) => own < others,
            _ => false,
        }
    }
}

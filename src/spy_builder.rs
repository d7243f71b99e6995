use crate::{Callable, Capture, Result, Sequence, Spy, SpyName};

/// Builder for a [`Spy`] with custom configuration.
///
/// Returned by [`Spy::builder`]. Use this when the plain constructors are
/// not enough: naming a wrapped spy, wrapping a fallible callable, or
/// injecting a [`Sequence`] so a test can assert on absolute order without
/// interference from the rest of the process.
///
/// Defaults: anonymous name, no wrapped function, the process-wide
/// [`Sequence::global`] counter.
///
/// # Examples
///
/// ```rust
/// use spyglass::{Sequence, Spy};
///
/// let sequence = Sequence::new();
/// let mut spy = Spy::builder()
///     .name("doubler")
///     .wrapping(|_: &(), n: &i32| n * 2)
///     .sequence(sequence)
///     .build();
///
/// assert_eq!(spy.call((), 21).unwrap(), Some(42));
/// assert_eq!(spy.report(0).absolute_order(), Some(1));
/// ```
pub struct SpyBuilder<C: Capture, A: Capture, R: Capture> {
    name: Option<SpyName>,
    wrapped: Option<Box<dyn Callable<C, A, R>>>,
    sequence: Option<Sequence>,
}

impl<C: Capture, A: Capture, R: Capture> SpyBuilder<C, A, R> {
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            wrapped: None,
            sequence: None,
        }
    }

    /// Set the spy's display name.
    pub fn name(mut self, name: impl Into<SpyName>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Forward every call to `f` and capture its return value.
    ///
    /// For a callable that can fail, use
    /// [`try_wrapping`](Self::try_wrapping) instead.
    pub fn wrapping<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&C, &A) -> R + 'static,
    {
        self.wrapped = Some(Box::new(move |context: &C, arguments: &A| {
            Result::Ok(f(context, arguments))
        }));
        self
    }

    /// Forward every call to a fallible [`Callable`].
    ///
    /// A failure propagates out of [`Spy::call`] unmodified and leaves the
    /// consumed slot unnotified.
    pub fn try_wrapping<F>(mut self, f: F) -> Self
    where
        F: Callable<C, A, R> + 'static,
    {
        self.wrapped = Some(Box::new(f));
        self
    }

    /// Draw absolute order from `sequence` instead of the process-wide
    /// counter.
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Build the spy, materializing its first call slot.
    pub fn build(self) -> Spy<C, A, R> {
        Spy::from_parts(
            self.name.unwrap_or_default(),
            self.wrapped,
            self.sequence.unwrap_or_else(Sequence::global),
        )
    }
}

impl<C: Capture, A: Capture, R: Capture> Default for SpyBuilder<C, A, R> {
    fn default() -> Self {
        SpyBuilder::new()
    }
}

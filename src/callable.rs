use crate::Result;

/// The capability a spy delegates to: callable with a context and an
/// argument list, returning a value or failing.
///
/// This is the single seam between the recording engine and the wrapped
/// function. There is no hierarchy of function kinds; anything that can be
/// invoked with `(&C, &A)` and produce a `Result<R>` qualifies, and the
/// blanket impl below covers every such closure. Infallible closures are
/// adapted at the [`Spy`](crate::Spy) construction boundary instead of
/// through a second overlapping impl.
///
/// A failure returned here propagates out of
/// [`Spy::call`](crate::Spy::call) unmodified; the call slot it would have
/// filled stays unnotified. Wrap foreign error types with
/// [`Error::external`](crate::Error::external).
///
/// # Example
///
/// ```rust
/// use spyglass::{Callable, Error, Result};
///
/// fn checked_div(_: &(), (a, b): &(i32, i32)) -> Result<i32> {
///     a.checked_div(*b)
///         .ok_or_else(|| Error::external(std::io::Error::other("division by zero")))
/// }
///
/// let mut f = checked_div;
/// assert_eq!(f.invoke(&(), &(6, 3)).unwrap(), 2);
/// assert!(f.invoke(&(), &(6, 0)).is_err());
/// ```
pub trait Callable<C, A, R> {
    /// Invoke the underlying function with the given context and arguments.
    fn invoke(&mut self, context: &C, arguments: &A) -> Result<R>;
}

impl<C, A, R, F> Callable<C, A, R> for F
where
    F: FnMut(&C, &A) -> Result<R>,
{
    fn invoke(&mut self, context: &C, arguments: &A) -> Result<R> {
        self(context, arguments)
    }
}

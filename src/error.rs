use std::sync::Arc;

/// The single error type for all spyglass operations.
///
/// Every fallible spyglass API returns `spyglass::Result<T>` (alias for
/// `Result<T, spyglass::Error>`). Failures from wrapped functions are
/// carried in [`Error::External`] with their source preserved, so callers
/// only need to handle one error type.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A call slot was notified a second time. The payload is the slot's
    /// display name, e.g. `"adder spy first call"`.
    #[error("{0} has already been notified")]
    AlreadyNotified(String),

    /// A fallible wrapped function failed. The spy passes the failure
    /// through without retrying or transforming it, and the slot the call
    /// consumed stays unnotified.
    #[error("External error: {0}")]
    External(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a foreign error for propagation out of a wrapped function.
    pub fn external(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::External(Arc::new(e))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyNotified(a), Self::AlreadyNotified(b)) => a == b,
            (Self::External(a), Self::External(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Error {}

/// Marker trait for values a spy can capture.
///
/// The context, arguments, and return value of every recorded call must be
/// `Clone + 'static` because they:
/// - Are stored in the call slot's [`Tracker`](crate::Tracker) for the
///   spy's entire lifetime ('static)
/// - Are snapshotted into [`Report`](crate::Report)s and delivered to
///   `when_called` callbacks (Clone)
///
/// Implemented automatically for every eligible type; there is nothing to
/// derive or implement by hand.
///
/// # Example
///
/// ```rust
/// use spyglass::Capture;
///
/// fn assert_capture<T: Capture>() {}
///
/// assert_capture::<Vec<i32>>();
/// assert_capture::<(String, u64)>();
/// assert_capture::<()>();
/// ```
pub trait Capture: Clone + 'static {}

impl<T: Clone + 'static> Capture for T {}

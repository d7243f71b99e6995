use std::{hash::Hash, sync::Arc};

/// Display name of a spy.
///
/// Explicit when the spy was built with a name, `"anonymous"` otherwise
/// (Rust closures carry no runtime name to fall back to). Formats as
/// `"{name} spy"`, the prefix every call slot's ordinal name starts with.
///
/// `SpyName` is cheap to clone and safe to serialize. Equality works
/// correctly across serialization boundaries (uses string comparison with a
/// fast-path for pointer equality when names share the same allocation).
///
/// # Example
///
/// ```rust
/// use spyglass::SpyName;
///
/// assert_eq!(SpyName::new("adder").to_string(), "adder spy");
/// assert_eq!(SpyName::anonymous().to_string(), "anonymous spy");
/// ```
#[derive(Debug, Clone, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpyName(Arc<str>);

impl SpyName {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The fallback name for spies built without one.
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }

    /// Returns the bare name, without the `" spy"` suffix.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SpyName {
    fn default() -> Self {
        SpyName::anonymous()
    }
}

impl PartialEq for SpyName {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for SpyName {}

impl Hash for SpyName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl std::fmt::Display for SpyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} spy", self.0)
    }
}

impl From<&str> for SpyName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SpyName {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

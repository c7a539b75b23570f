//! Credential handling and header injection.

use std::fmt;

/// An API key bound to one client for its whole lifetime.
///
/// Header injection happens in exactly one place (the request descriptor
/// constructor in [`crate::client`]), so real sends, streaming sends, and
/// curl rendering always carry the identical header set.
#[derive(Clone)]
pub(crate) struct Credential(String);

impl Credential {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The `Authorization` header pair this credential injects.
    pub(crate) fn header(&self) -> (String, String) {
        ("Authorization".to_string(), format!("Bearer {}", self.0))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never leak the key through Debug output or logs.
        f.write_str("Credential([redacted])")
    }
}

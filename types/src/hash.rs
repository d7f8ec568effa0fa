//! Transaction identifier as returned by the provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque transaction identifier.
///
/// The provider hands this back on submission and it is relayed verbatim;
/// nothing in the workspace inspects or recomputes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Truncated form for display: first 10 and last 8 characters.
    ///
    /// The identifier is relayed verbatim from the provider, so a
    /// non-ASCII value is passed through untruncated rather than
    /// sliced at an arbitrary byte offset.
    pub fn short(&self) -> String {
        if self.0.len() <= 18 || !self.0.is_ascii() {
            self.0.clone()
        } else {
            format!("{}...{}", &self.0[..10], &self.0[self.0.len() - 8..])
        }
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

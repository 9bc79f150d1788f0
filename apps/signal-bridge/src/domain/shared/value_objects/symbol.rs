//! Symbol value object for broker trading symbols.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A broker trading symbol.
///
/// Examples:
/// - Index future: "NIFTY27NOV25FUT"
/// - Stock future: "RELIANCE27NOV25FUT"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the symbol contains the given fragment.
    ///
    /// Matching is case-sensitive against the normalized (uppercase) symbol.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }

    /// Whether the symbol is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

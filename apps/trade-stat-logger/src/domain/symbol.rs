//! Symbol value object for security identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// A security identifier (ticker).
///
/// Normalized to trimmed uppercase so `"aapl"` and `" AAPL "` address the
/// same ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the symbol is empty after trimming.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, LedgerError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LedgerError::invalid_input(
                "security",
                "security identifier cannot be empty",
            ));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

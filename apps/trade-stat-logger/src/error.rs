//! Error types for the trade stat logger.
//!
//! Only input validation surfaces as an error. Degenerate statistics are
//! reported as `None` metrics and closing an unknown security is a no-op,
//! so neither appears here.
//!
//! | Reason | Raised by |
//! |--------|-----------|
//! | `INVALID_INPUT` | Non-positive price, negative quantity, empty symbol |
//! | `INVALID_CLOSURE_DATE` | Unparseable closing date |
//! | `PRICE_UNAVAILABLE` | Price source could not quote a security |

use thiserror::Error;

use crate::ports::PriceSourceError;

/// Errors raised by ledger, session and closing operations.
///
/// Every variant is raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An argument failed validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// Argument name.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A closing date could not be parsed.
    #[error("Incorrect date format '{value}', expected DD/MM/YYYY or YYYY-MM-DD")]
    InvalidClosureDate {
        /// The rejected input.
        value: String,
    },

    /// The price source failed to quote a security.
    #[error("No closing price for {symbol}: {source}")]
    PriceUnavailable {
        /// Security that could not be priced.
        symbol: String,
        /// Underlying price source failure.
        source: PriceSourceError,
    },
}

impl LedgerError {
    /// Shorthand for [`LedgerError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Stable reason string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "INVALID_INPUT",
            Self::InvalidClosureDate { .. } => "INVALID_CLOSURE_DATE",
            Self::PriceUnavailable { .. } => "PRICE_UNAVAILABLE",
        }
    }

    /// Returns true for argument validation failures.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InvalidClosureDate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_display() {
        let err = LedgerError::invalid_input("price", "must be positive, got 0");
        let msg = err.to_string();
        assert!(msg.contains("price"));
        assert!(msg.contains("must be positive"));
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn closure_date_display() {
        let err = LedgerError::InvalidClosureDate {
            value: "2024/31/12".to_string(),
        };
        assert!(err.to_string().contains("2024/31/12"));
        assert_eq!(err.code(), "INVALID_CLOSURE_DATE");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn price_unavailable_keeps_source() {
        let err = LedgerError::PriceUnavailable {
            symbol: "AAPL".to_string(),
            source: PriceSourceError::SymbolNotFound {
                symbol: "AAPL".to_string(),
            },
        };
        assert_eq!(err.code(), "PRICE_UNAVAILABLE");
        assert!(!err.is_invalid_input());
        assert!(std::error::Error::source(&err).is_some());
    }
}

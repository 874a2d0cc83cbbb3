//! Price Source Port (Driven Port)
//!
//! Interface for looking up the price used to close out a position.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::Symbol;

/// Price source error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceSourceError {
    /// Symbol not found.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// No price for the requested date.
    #[error("No price for {symbol} on {date}")]
    DataUnavailable {
        /// Requested symbol.
        symbol: String,
        /// Requested date.
        date: NaiveDate,
    },

    /// Provider-specific failure.
    #[error("Price source error: {message}")]
    Provider {
        /// Error details.
        message: String,
    },
}

/// Port for pricing a security as of a date.
///
/// Invoked once per open security when closing all positions. The core never
/// talks to a market data provider directly.
pub trait PriceSource {
    /// Get the price of `symbol` as of `as_of`.
    fn price(&self, symbol: &Symbol, as_of: NaiveDate) -> Result<Decimal, PriceSourceError>;
}

impl<F> PriceSource for F
where
    F: Fn(&Symbol, NaiveDate) -> Result<Decimal, PriceSourceError>,
{
    fn price(&self, symbol: &Symbol, as_of: NaiveDate) -> Result<Decimal, PriceSourceError> {
        self(symbol, as_of)
    }
}

/// Fixed in-memory prices, independent of date.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<Symbol, Decimal>,
}

impl StaticPriceSource {
    /// Create an empty price source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price for a symbol.
    #[must_use]
    pub fn with_price(mut self, symbol: Symbol, price: Decimal) -> Self {
        self.prices.insert(symbol, price);
        self
    }

    /// Set the price for a symbol in place.
    pub fn set_price(&mut self, symbol: Symbol, price: Decimal) {
        self.prices.insert(symbol, price);
    }
}

impl PriceSource for StaticPriceSource {
    fn price(&self, symbol: &Symbol, _as_of: NaiveDate) -> Result<Decimal, PriceSourceError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| PriceSourceError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn static_source_returns_configured_price() {
        let source = StaticPriceSource::new().with_price(Symbol::parse("aapl").unwrap(), dec!(187.5));
        let price = source.price(&Symbol::parse("AAPL").unwrap(), date()).unwrap();
        assert_eq!(price, dec!(187.5));
    }

    #[test]
    fn static_source_set_price_overwrites() {
        let aapl = Symbol::parse("AAPL").unwrap();
        let mut source = StaticPriceSource::new().with_price(aapl.clone(), dec!(187.5));
        source.set_price(aapl.clone(), dec!(190));
        assert_eq!(source.price(&aapl, date()).unwrap(), dec!(190));
    }

    #[test]
    fn static_source_unknown_symbol() {
        let source = StaticPriceSource::new();
        let err = source
            .price(&Symbol::parse("MSFT").unwrap(), date())
            .unwrap_err();
        assert_eq!(
            err,
            PriceSourceError::SymbolNotFound {
                symbol: "MSFT".to_string()
            }
        );
    }

    #[test]
    fn closure_is_a_price_source() {
        let source = |symbol: &Symbol, as_of: NaiveDate| {
            if symbol.as_str() == "SPY" {
                Ok(dec!(500))
            } else {
                Err(PriceSourceError::DataUnavailable {
                    symbol: symbol.to_string(),
                    date: as_of,
                })
            }
        };
        assert_eq!(
            source.price(&Symbol::parse("spy").unwrap(), date()).unwrap(),
            dec!(500)
        );
        let err = source
            .price(&Symbol::parse("QQQ").unwrap(), date())
            .unwrap_err();
        assert!(err.to_string().contains("2024-03-15"));
    }
}

//! Session logging and advisory diagnostics.
//!
//! Structured `tracing` events for every trade, close and summary, plus a
//! side channel for advisory conditions that callers may want to capture
//! without installing a subscriber.
//!
//! # Log Levels
//!
//! - **INFO**: Position closes, summaries
//! - **WARN**: Open positions at summary time, failed price lookups
//! - **DEBUG**: Individual trades

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{Symbol, TradeKind};
use crate::metrics::{SummaryStatistics, format_ratio};

// ============================================
// Diagnostics
// ============================================

/// Advisory condition raised by a session. Never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "diagnostic", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Statistics were requested while positions were still open, so
    /// unrealized profit is excluded.
    OpenPositions {
        /// Securities with non-zero shares.
        symbols: Vec<Symbol>,
    },
    /// A price lookup failed while closing all positions.
    PriceLookupFailed {
        /// Security that stayed open.
        symbol: Symbol,
        /// Requested closing date.
        date: NaiveDate,
        /// Failure description.
        reason: String,
    },
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticSink {
    /// Handle one diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Logs diagnostics as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::OpenPositions { symbols } => {
                let symbols: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
                warn!(
                    open_positions = ?symbols,
                    "For most accurate performance results, close out all holdings; unrealized profit is excluded"
                );
            }
            Diagnostic::PriceLookupFailed {
                symbol,
                date,
                reason,
            } => {
                warn!(
                    symbol = %symbol,
                    date = %date,
                    reason = %reason,
                    "Closing price unavailable, position left open"
                );
            }
        }
    }
}

/// Keeps diagnostics in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics received so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Check if nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

// ============================================
// Logging Functions
// ============================================

/// Log a recorded trade.
pub fn log_trade_recorded(
    symbol: &Symbol,
    shares: Decimal,
    share_price: Decimal,
    profit: Option<Decimal>,
    kind: TradeKind,
) {
    debug!(
        symbol = %symbol,
        shares = %shares,
        share_price = %share_price,
        profit = %format_ratio(profit),
        kind = kind.as_str(),
        "Trade recorded"
    );
}

/// Log a position closed out at a price.
pub fn log_position_closed(symbol: &Symbol, shares: Decimal, price: Decimal, profit: Option<Decimal>) {
    info!(
        symbol = %symbol,
        shares = %shares,
        price = %price,
        profit = %format_ratio(profit),
        "Position closed"
    );
}

/// Log a computed summary.
pub fn log_summary(summary: &SummaryStatistics) {
    info!(
        num_trades = summary.num_trades,
        net_profit = %summary.net_profit,
        max_drawdown = %summary.max_drawdown,
        win_ratio = %format_ratio(summary.win_ratio),
        kelly_criterion = %format_ratio(summary.kelly_criterion),
        "Summary statistics calculated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        assert!(sink.is_empty());
        sink.emit(Diagnostic::OpenPositions {
            symbols: vec![Symbol::parse("AAPL").unwrap()],
        });
        sink.emit(Diagnostic::PriceLookupFailed {
            symbol: Symbol::parse("MSFT").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            reason: "Symbol not found: MSFT".to_string(),
        });
        assert_eq!(sink.diagnostics().len(), 2);
        assert!(matches!(sink.diagnostics()[0], Diagnostic::OpenPositions { .. }));
    }

    #[test]
    fn tracing_sink_does_not_panic_without_subscriber() {
        let mut sink = TracingSink;
        sink.emit(Diagnostic::OpenPositions { symbols: vec![] });
    }

    #[test]
    fn diagnostic_serializes_with_tag() {
        let d = Diagnostic::OpenPositions {
            symbols: vec![Symbol::parse("spy").unwrap()],
        };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"diagnostic":"open_positions","symbols":["SPY"]}"#);
    }
}

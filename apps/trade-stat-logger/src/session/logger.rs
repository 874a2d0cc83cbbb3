//! Single-threaded trade logging session.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::closing::{ClosedPosition, ClosingReport, closure_timestamp, parse_closure_date};
use super::diagnostics::{
    Diagnostic, DiagnosticSink, TracingSink, log_position_closed, log_summary, log_trade_recorded,
};
use crate::config::{Config, SessionConfig, StatisticsConfig};
use crate::domain::{Position, PositionSnapshot, Symbol, TradeHistory, TradeKind};
use crate::error::LedgerError;
use crate::metrics::{StatisticsCalculator, SummaryStatistics};
use crate::ports::PriceSource;

/// Serializable session state: raw ledgers plus the ordered history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Ledger per security.
    pub positions: BTreeMap<Symbol, Position>,
    /// Every logged trade, in order.
    pub history: TradeHistory,
}

/// Trade logging session.
///
/// Owns one [`Position`] per security and the [`TradeHistory`] the summary
/// statistics are computed from.
///
/// # Example
///
/// ```rust,ignore
/// let mut logger = TradeLogger::default();
/// logger.log("AAPL", dec!(10), dec!(4), None)?;
/// let profit = logger.log("AAPL", dec!(-10), dec!(5), None)?;
/// assert_eq!(profit, Some(dec!(10)));
/// println!("{}", logger.summary_statistics().report());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TradeLogger {
    session: SessionConfig,
    statistics: StatisticsConfig,
    positions: HashMap<Symbol, Position>,
    history: TradeHistory,
}

impl TradeLogger {
    /// Create a session from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            session: config.session.clone(),
            statistics: config.statistics.clone(),
            positions: HashMap::new(),
            history: TradeHistory::new(),
        }
    }

    /// Stamp untimed trades with the current UTC time.
    #[must_use]
    pub fn with_time_support(mut self, enabled: bool) -> Self {
        self.session.time_support = enabled;
        self
    }

    /// Rebuild a session from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any ledger has inconsistent shares and basis.
    pub fn restore(config: &Config, snapshot: SessionSnapshot) -> Result<Self, LedgerError> {
        let mut positions = HashMap::with_capacity(snapshot.positions.len());
        for (symbol, position) in snapshot.positions {
            let position = Position::from_parts(position.shares(), position.cost_basis())?;
            positions.insert(symbol, position);
        }
        Ok(Self {
            positions,
            history: snapshot.history,
            ..Self::new(config)
        })
    }

    /// Record a trade of signed `shares` at `share_price`.
    ///
    /// Negative shares sell, positive shares buy. Returns the realized profit,
    /// or `None` when the trade closed no exposure.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol or non-positive price.
    /// Nothing is recorded on error.
    pub fn log(
        &mut self,
        security: impl AsRef<str>,
        shares: Decimal,
        share_price: Decimal,
        time: Option<DateTime<Utc>>,
    ) -> Result<Option<Decimal>, LedgerError> {
        let symbol = Symbol::parse(security)?;

        let (profit, kind) = if let Some(position) = self.positions.get_mut(&symbol) {
            (position.trade(shares, share_price)?, TradeKind::Trade)
        } else {
            let position = Position::open(shares, share_price)?;
            self.positions.insert(symbol.clone(), position);
            (None, TradeKind::Open)
        };

        log_trade_recorded(&symbol, shares, share_price, profit, kind);
        let time = self.stamp(time);
        self.history
            .append(symbol, shares, share_price, time, profit, kind);
        Ok(profit)
    }

    /// Close the whole position in `security` at `share_price`.
    ///
    /// Unknown or flat securities are left alone and yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol or non-positive price.
    pub fn log_clear_position(
        &mut self,
        security: impl AsRef<str>,
        share_price: Decimal,
        time: Option<DateTime<Utc>>,
    ) -> Result<Option<Decimal>, LedgerError> {
        let symbol = Symbol::parse(security)?;
        let Some(position) = self.positions.get_mut(&symbol) else {
            return Ok(None);
        };
        if !position.is_open() {
            return Ok(None);
        }

        let shares = -position.shares();
        let profit = position.close(share_price)?;

        log_position_closed(&symbol, shares, share_price, profit);
        let time = self.stamp(time);
        self.history
            .append(symbol, shares, share_price, time, profit, TradeKind::Close);
        Ok(profit)
    }

    /// Close every open position at the price `source` quotes for
    /// `closure_date`, logging failures as warnings.
    pub fn close_all_positions(
        &mut self,
        source: &dyn PriceSource,
        closure_date: NaiveDate,
    ) -> ClosingReport {
        self.close_all_positions_with(source, closure_date, &mut TracingSink)
    }

    /// Close every open position, sending failures to `sink`.
    ///
    /// Securities that cannot be priced stay open and are listed in
    /// [`ClosingReport::failed`]. Closes are stamped with the closing date.
    pub fn close_all_positions_with(
        &mut self,
        source: &dyn PriceSource,
        closure_date: NaiveDate,
        sink: &mut dyn DiagnosticSink,
    ) -> ClosingReport {
        let mut report = ClosingReport::default();
        let time = Some(closure_timestamp(closure_date));

        for symbol in self.open_symbols() {
            let result = source
                .price(&symbol, closure_date)
                .map_err(|source| LedgerError::PriceUnavailable {
                    symbol: symbol.to_string(),
                    source,
                })
                .and_then(|price| {
                    let shares = self.position(&symbol).map_or(Decimal::ZERO, |p| -p.shares);
                    self.log_clear_position(&symbol, price, time)
                        .map(|profit| (shares, price, profit))
                });

            match result {
                Ok((shares, price, profit)) => report.closed.push(ClosedPosition {
                    symbol,
                    shares,
                    price,
                    profit,
                }),
                Err(err) => {
                    sink.emit(Diagnostic::PriceLookupFailed {
                        symbol: symbol.clone(),
                        date: closure_date,
                        reason: err.to_string(),
                    });
                    report.failed.push((symbol, err));
                }
            }
        }

        info!(
            closed = report.closed.len(),
            failed = report.failed.len(),
            date = %closure_date,
            "Closed all positions"
        );
        report
    }

    /// Close every open position as of a textual date.
    ///
    /// `closure_date` accepts `DD/MM/YYYY` or `YYYY-MM-DD` and defaults to
    /// today (UTC).
    ///
    /// # Errors
    ///
    /// Returns `InvalidClosureDate` before touching any position if the date
    /// cannot be parsed.
    pub fn close_all_positions_on(
        &mut self,
        source: &dyn PriceSource,
        closure_date: Option<&str>,
    ) -> Result<ClosingReport, LedgerError> {
        let date = match closure_date {
            Some(value) => parse_closure_date(value)?,
            None => Utc::now().date_naive(),
        };
        Ok(self.close_all_positions(source, date))
    }

    /// Shares and average price per security, sorted by symbol.
    #[must_use]
    pub fn positions(&self) -> BTreeMap<Symbol, PositionSnapshot> {
        self.positions
            .iter()
            .map(|(symbol, position)| (symbol.clone(), position.snapshot()))
            .collect()
    }

    /// Shares and average price for one security.
    #[must_use]
    pub fn position(&self, security: &Symbol) -> Option<PositionSnapshot> {
        self.positions.get(security).map(Position::snapshot)
    }

    /// Securities with non-zero shares, sorted.
    #[must_use]
    pub fn open_symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self
            .positions
            .iter()
            .filter(|(_, position)| position.is_open())
            .map(|(symbol, _)| symbol.clone())
            .collect();
        symbols.sort();
        symbols
    }

    /// Check if any security still has shares.
    #[must_use]
    pub fn has_open_positions(&self) -> bool {
        self.positions.values().any(Position::is_open)
    }

    /// The ordered trade log.
    #[must_use]
    pub const fn history(&self) -> &TradeHistory {
        &self.history
    }

    /// Summary statistics over realized profits, warning through `tracing`
    /// when positions are still open.
    #[must_use]
    pub fn summary_statistics(&self) -> SummaryStatistics {
        self.summary_statistics_with(&mut TracingSink)
    }

    /// Summary statistics over realized profits, sending advisories to `sink`.
    ///
    /// Unrealized profit of open positions is never included.
    pub fn summary_statistics_with(&self, sink: &mut dyn DiagnosticSink) -> SummaryStatistics {
        let open = self.open_symbols();
        if !open.is_empty() {
            sink.emit(Diagnostic::OpenPositions { symbols: open });
        }

        let summary = StatisticsCalculator::from_series(self.history.realized_series())
            .with_null_win_probability(self.statistics.null_win_probability)
            .calculate();
        log_summary(&summary);
        summary
    }

    /// Copy the session state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            positions: self
                .positions
                .iter()
                .map(|(symbol, position)| (symbol.clone(), *position))
                .collect(),
            history: self.history.clone(),
        }
    }

    /// End the session, dropping every position and trade.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.history.clear();
    }

    fn stamp(&self, time: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        if self.session.time_support {
            time.or_else(|| Some(Utc::now()))
        } else {
            time
        }
    }
}

//! Thread-safe trade logging session.
//!
//! Each security has its own mutex, so trades in different securities never
//! wait on each other. The history has a separate mutex that is only taken
//! while a position mutex is held, never the other way around.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::diagnostics::{
    Diagnostic, DiagnosticSink, TracingSink, log_position_closed, log_summary, log_trade_recorded,
};
use crate::config::{Config, SessionConfig, StatisticsConfig};
use crate::domain::{Position, PositionSnapshot, Symbol, TradeHistory, TradeKind};
use crate::error::LedgerError;
use crate::metrics::{StatisticsCalculator, SummaryStatistics};

/// `None` until the first valid trade opens the ledger.
type Slot = Arc<Mutex<Option<Position>>>;

/// Trade logging session shared across threads.
#[derive(Debug, Default)]
pub struct SharedTradeLogger {
    session: SessionConfig,
    statistics: StatisticsConfig,
    positions: RwLock<HashMap<Symbol, Slot>>,
    history: Mutex<TradeHistory>,
}

impl SharedTradeLogger {
    /// Create a session from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            session: config.session.clone(),
            statistics: config.statistics.clone(),
            positions: RwLock::new(HashMap::new()),
            history: Mutex::new(TradeHistory::new()),
        }
    }

    /// Record a trade of signed `shares` at `share_price`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol or non-positive price.
    pub fn log(
        &self,
        security: impl AsRef<str>,
        shares: Decimal,
        share_price: Decimal,
        time: Option<DateTime<Utc>>,
    ) -> Result<Option<Decimal>, LedgerError> {
        let symbol = Symbol::parse(security)?;
        let slot = self.slot(&symbol);
        let mut ledger = lock(&slot);

        let (profit, kind) = match ledger.as_mut() {
            Some(position) => (position.trade(shares, share_price)?, TradeKind::Trade),
            None => {
                *ledger = Some(Position::open(shares, share_price)?);
                (None, TradeKind::Open)
            }
        };

        log_trade_recorded(&symbol, shares, share_price, profit, kind);
        let time = self.stamp(time);
        lock(&self.history).append(symbol, shares, share_price, time, profit, kind);
        Ok(profit)
    }

    /// Close the whole position in `security` at `share_price`.
    ///
    /// Unknown or flat securities yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol or non-positive price.
    pub fn log_clear_position(
        &self,
        security: impl AsRef<str>,
        share_price: Decimal,
        time: Option<DateTime<Utc>>,
    ) -> Result<Option<Decimal>, LedgerError> {
        let symbol = Symbol::parse(security)?;
        let Some(slot) = self.existing_slot(&symbol) else {
            return Ok(None);
        };
        let mut ledger = lock(&slot);
        let Some(position) = ledger.as_mut().filter(|p| p.is_open()) else {
            return Ok(None);
        };

        let shares = -position.shares();
        let profit = position.close(share_price)?;

        log_position_closed(&symbol, shares, share_price, profit);
        let time = self.stamp(time);
        lock(&self.history).append(symbol, shares, share_price, time, profit, TradeKind::Close);
        Ok(profit)
    }

    /// Shares and average price per security, sorted by symbol.
    #[must_use]
    pub fn positions(&self) -> BTreeMap<Symbol, PositionSnapshot> {
        let slots = self.positions.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter_map(|(symbol, slot)| {
                lock(slot)
                    .as_ref()
                    .map(|position| (symbol.clone(), position.snapshot()))
            })
            .collect()
    }

    /// Securities with non-zero shares, sorted.
    #[must_use]
    pub fn open_symbols(&self) -> Vec<Symbol> {
        self.positions()
            .into_iter()
            .filter(|(_, snapshot)| !snapshot.is_flat())
            .map(|(symbol, _)| symbol)
            .collect()
    }

    /// Copy of the ordered trade log.
    #[must_use]
    pub fn history(&self) -> TradeHistory {
        lock(&self.history).clone()
    }

    /// Summary statistics over realized profits, warning through `tracing`
    /// when positions are still open.
    #[must_use]
    pub fn summary_statistics(&self) -> SummaryStatistics {
        self.summary_statistics_with(&mut TracingSink)
    }

    /// Summary statistics over realized profits, sending advisories to `sink`.
    pub fn summary_statistics_with(&self, sink: &mut dyn DiagnosticSink) -> SummaryStatistics {
        let open = self.open_symbols();
        if !open.is_empty() {
            sink.emit(Diagnostic::OpenPositions { symbols: open });
        }

        let series = lock(&self.history).realized_series();
        let summary = StatisticsCalculator::from_series(series)
            .with_null_win_probability(self.statistics.null_win_probability)
            .calculate();
        log_summary(&summary);
        summary
    }

    fn existing_slot(&self, symbol: &Symbol) -> Option<Slot> {
        self.positions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(symbol)
            .cloned()
    }

    fn slot(&self, symbol: &Symbol) -> Slot {
        if let Some(slot) = self.existing_slot(symbol) {
            return slot;
        }
        let mut slots = self.positions.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(symbol.clone()).or_default())
    }

    fn stamp(&self, time: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
        if self.session.time_support {
            time.or_else(|| Some(Utc::now()))
        } else {
            time
        }
    }
}

/// Lock, recovering from poisoning. Ledger mutations validate before writing.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

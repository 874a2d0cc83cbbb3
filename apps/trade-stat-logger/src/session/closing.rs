//! Closing-date parsing and the close-all report.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::domain::Symbol;
use crate::error::LedgerError;

/// Accepted closing date formats, tried in order.
const CLOSURE_DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// Parse a closing date given as `DD/MM/YYYY` or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns `InvalidClosureDate` for any other input.
pub fn parse_closure_date(value: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = value.trim();
    CLOSURE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| LedgerError::InvalidClosureDate {
            value: value.to_string(),
        })
}

/// Midnight UTC of the closing date, used as the close trade time.
pub(crate) fn closure_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// A position closed by a close-all pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedPosition {
    /// Security closed.
    pub symbol: Symbol,
    /// Signed quantity traded to flatten it.
    pub shares: Decimal,
    /// Closing price.
    pub price: Decimal,
    /// Realized profit of the close.
    pub profit: Option<Decimal>,
}

/// Outcome of closing all open positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosingReport {
    /// Positions flattened.
    pub closed: Vec<ClosedPosition>,
    /// Positions left open, with the reason.
    pub failed: Vec<(Symbol, LedgerError)>,
}

impl ClosingReport {
    /// Check if every open position was closed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Sum of realized profit from the closes.
    #[must_use]
    pub fn realized_profit(&self) -> Decimal {
        self.closed.iter().filter_map(|c| c.profit).sum()
    }
}

//! Trade records and the ordered trade history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

const CSV_HEADER: [&str; 7] = [
    "sequence",
    "time",
    "security",
    "shares",
    "share_price",
    "profit",
    "kind",
];

/// How a trade entered the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeKind {
    /// First trade for a security, opened its ledger.
    Open,
    /// Regular buy or sell.
    Trade,
    /// Forced close of the whole position.
    Close,
}

impl TradeKind {
    /// Lowercase label used in exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Trade => "trade",
            Self::Close => "close",
        }
    }
}

/// One logged trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Position in the history, starting at 0.
    pub sequence: u64,
    /// Optional trade time.
    pub timestamp: Option<DateTime<Utc>>,
    /// Security traded.
    pub security: Symbol,
    /// Signed quantity (positive = buy, negative = sell).
    pub shares: Decimal,
    /// Trade price.
    pub share_price: Decimal,
    /// Realized profit, `None` when the trade closed no exposure.
    pub profit: Option<Decimal>,
    /// How the trade entered the log.
    pub kind: TradeKind,
}

impl TradeRecord {
    /// Check if this trade realized a gain.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.profit.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Check if this trade realized a loss.
    #[must_use]
    pub fn is_loser(&self) -> bool {
        self.profit.is_some_and(|p| p < Decimal::ZERO)
    }

    /// Check if this trade closed any exposure.
    #[must_use]
    pub const fn is_closing(&self) -> bool {
        self.profit.is_some()
    }
}

/// Realized profit with the time it was booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedPoint {
    /// Sequence number of the closing trade.
    pub sequence: u64,
    /// Trade time, if recorded.
    pub timestamp: Option<DateTime<Utc>>,
    /// Realized profit.
    pub profit: Decimal,
}

/// Append-only, ordered trade log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeHistory {
    records: Vec<TradeRecord>,
}

impl TradeHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade and return its sequence number.
    pub fn append(
        &mut self,
        security: Symbol,
        shares: Decimal,
        share_price: Decimal,
        timestamp: Option<DateTime<Utc>>,
        profit: Option<Decimal>,
        kind: TradeKind,
    ) -> u64 {
        let sequence = self.records.len() as u64;
        self.records.push(TradeRecord {
            sequence,
            timestamp,
            security,
            shares,
            share_price,
            profit,
            kind,
        });
        sequence
    }

    /// All records in log order.
    #[must_use]
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Number of logged trades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Defined realized profits in log order.
    #[must_use]
    pub fn realized_profits(&self) -> Vec<Decimal> {
        self.records.iter().filter_map(|r| r.profit).collect()
    }

    /// Defined realized profits with their timestamps, in log order.
    #[must_use]
    pub fn realized_series(&self) -> Vec<RealizedPoint> {
        self.records
            .iter()
            .filter_map(|r| {
                r.profit.map(|profit| RealizedPoint {
                    sequence: r.sequence,
                    timestamp: r.timestamp,
                    profit,
                })
            })
            .collect()
    }

    /// Records for one security, in log order.
    pub fn for_security<'a>(&'a self, security: &'a Symbol) -> impl Iterator<Item = &'a TradeRecord> {
        self.records.iter().filter(move |r| &r.security == security)
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Export the log to CSV format.
    ///
    /// Fields containing delimiters or quotes are quoted. Undefined profits
    /// are written as empty cells.
    ///
    /// # Errors
    ///
    /// Returns the writer error if a record cannot be encoded.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        wtr.write_record(CSV_HEADER)?;

        for record in &self.records {
            wtr.write_record([
                record.sequence.to_string(),
                record.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default(),
                record.security.to_string(),
                record.shares.to_string(),
                record.share_price.to_string(),
                record.profit.map(|p| p.to_string()).unwrap_or_default(),
                record.kind.as_str().to_string(),
            ])?;
        }

        wtr.flush()?;
        let bytes = wtr
            .into_inner()
            .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

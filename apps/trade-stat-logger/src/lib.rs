// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Stat Logger
//!
//! Logs trades per security, keeps an average-cost ledger for each one and
//! computes performance statistics over the realized profit of closed
//! exposure.
//!
//! # Layout
//!
//! - **Domain**: position ledger and trade history
//!   - `position`: signed shares and cost basis, realized profit on reductions
//!   - `trade`: ordered trade records, realized-profit series, CSV export
//! - **Metrics**: drawdown, dispersion, win ratio, Kelly criterion, p-value
//! - **Session**: `TradeLogger` and the thread-safe `SharedTradeLogger`
//! - **Ports**: `PriceSource` for closing out open positions
//! - **Config / Telemetry**: YAML configuration and `tracing` setup
//!
//! # Example
//!
//! ```rust,ignore
//! use rust_decimal_macros::dec;
//! use trade_stat_logger::TradeLogger;
//!
//! let mut logger = TradeLogger::default();
//! logger.log("AAPL", dec!(10), dec!(4), None)?;
//! logger.log("AAPL", dec!(-10), dec!(5), None)?;
//! let summary = logger.summary_statistics();
//! assert_eq!(summary.net_profit, dec!(10));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Position ledger and trade history.
pub mod domain;

/// Error types.
pub mod error;

/// Summary statistics.
pub mod metrics;

/// Ports for external collaborators.
pub mod ports;

/// Trade logging sessions.
pub mod session;

/// Tracing subscriber setup.
pub mod telemetry;

pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use domain::{Position, PositionSnapshot, Symbol, TradeHistory, TradeKind, TradeRecord};
pub use error::LedgerError;
pub use metrics::{StatisticsCalculator, SummaryStatistics};
pub use ports::{PriceSource, PriceSourceError, StaticPriceSource};
pub use session::{
    ClosingReport, CollectingSink, Diagnostic, DiagnosticSink, SessionSnapshot, SharedTradeLogger,
    TradeLogger, parse_closure_date,
};

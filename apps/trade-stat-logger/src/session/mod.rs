//! Trade logging sessions.
//!
//! - [`TradeLogger`]: single-threaded session owning every ledger
//! - [`SharedTradeLogger`]: the same operations behind per-security locks
//! - [`diagnostics`]: advisory events and structured trade logging

mod closing;
pub mod diagnostics;
mod logger;
pub mod shared;

pub use closing::{ClosedPosition, ClosingReport, parse_closure_date};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use logger::{SessionSnapshot, TradeLogger};
pub use shared::SharedTradeLogger;

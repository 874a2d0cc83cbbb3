//! Domain Layer
//!
//! Position accounting with no infrastructure dependencies:
//!
//! - [`Symbol`]: normalized security identifier
//! - [`Position`]: average-cost ledger for one security
//! - [`TradeHistory`]: ordered log of [`TradeRecord`]s

pub mod position;
pub mod symbol;
pub mod trade;

pub use position::{Position, PositionDirection, PositionSnapshot};
pub use symbol::Symbol;
pub use trade::{RealizedPoint, TradeHistory, TradeKind, TradeRecord};

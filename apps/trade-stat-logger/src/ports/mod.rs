//! Ports for external collaborators.
//!
//! - [`PriceSource`]: closing prices for open positions

mod price_source;

pub use price_source::{PriceSource, PriceSourceError, StaticPriceSource};

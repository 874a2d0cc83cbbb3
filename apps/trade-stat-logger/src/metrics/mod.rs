//! Summary statistics over the realized-profit series.
//!
//! Implements the trade log performance metrics:
//! - Maximum drawdown (peak-to-trough decline of cumulative profit)
//! - Net profit, profit per trade
//! - Standard deviation, skew, excess kurtosis
//! - Win ratio, average win/loss, payoff ratio, profit factor
//! - Kelly criterion and win ratio significance (one-sided z-test)

mod calculator;
mod constants;
mod format;
mod math;
mod significance;
mod types;

pub use calculator::StatisticsCalculator;
pub use constants::DEFAULT_NULL_WIN_PROBABILITY;
pub use format::{format_decimal, format_float, format_pct, format_ratio};
pub use significance::{ProportionTest, win_ratio_test};
pub use types::{DrawdownPoint, EquityPoint, SummaryStatistics};

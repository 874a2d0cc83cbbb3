//! Core types for summary statistics.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::format::{format_decimal, format_float, format_pct, format_ratio};

/// Cumulative realized profit after one closing trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Sequence number of the closing trade.
    pub sequence: u64,
    /// Trade time, if recorded.
    pub timestamp: Option<DateTime<Utc>>,
    /// Cumulative realized profit.
    pub cumulative: Decimal,
}

/// Drawdown tracking point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Sequence number of the closing trade.
    pub sequence: u64,
    /// Cumulative realized profit.
    pub cumulative: Decimal,
    /// Highest cumulative profit so far.
    pub high: Decimal,
    /// `high - cumulative`, never negative.
    pub drawdown: Decimal,
}

/// Summary statistics over the realized-profit series.
///
/// Metrics that have no meaningful value for the data (empty subsets,
/// division by zero) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    // Profit
    /// Sum of realized profits.
    pub net_profit: Decimal,
    /// Number of closing trades.
    pub num_trades: u64,
    /// Net profit divided by trade count.
    pub profit_per_trade: Option<Decimal>,

    // Risk
    /// Largest decline from a cumulative high, in trade order.
    pub max_drawdown: Decimal,
    /// Sample standard deviation of profits.
    pub std_dev: Option<Decimal>,
    /// Sample skewness of profits.
    pub skew: Option<f64>,
    /// Excess kurtosis of profits (normal = 0).
    pub fisher_kurtosis: Option<f64>,

    // Win / loss
    /// Trades with positive profit.
    pub num_gains: u64,
    /// Trades with negative profit.
    pub num_losses: u64,
    /// Mean winning profit.
    pub avg_win: Option<Decimal>,
    /// Mean losing profit (negative).
    pub avg_loss: Option<Decimal>,
    /// Gains over all closing trades.
    pub win_ratio: Option<Decimal>,
    /// Kelly sizing estimate, zero for a losing strategy.
    pub kelly_criterion: Option<Decimal>,
    /// One-sided p-value that the win ratio beats chance.
    pub win_ratio_pvalue: Option<f64>,

    // Additional stats
    /// Sum of winning profits.
    pub gross_profit: Decimal,
    /// Sum of losing profits (positive value).
    pub gross_loss: Decimal,
    /// Average win over average loss magnitude.
    pub payoff_ratio: Option<Decimal>,
    /// Gross profit over gross loss.
    pub profit_factor: Option<Decimal>,
    /// Longest run of winning trades.
    pub max_consecutive_wins: u64,
    /// Longest run of losing trades.
    pub max_consecutive_losses: u64,
}

impl Default for SummaryStatistics {
    fn default() -> Self {
        Self {
            net_profit: Decimal::ZERO,
            num_trades: 0,
            profit_per_trade: None,
            max_drawdown: Decimal::ZERO,
            std_dev: None,
            skew: None,
            fisher_kurtosis: None,
            num_gains: 0,
            num_losses: 0,
            avg_win: None,
            avg_loss: None,
            win_ratio: None,
            kelly_criterion: Some(Decimal::ZERO),
            win_ratio_pvalue: None,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            payoff_ratio: None,
            profit_factor: None,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
        }
    }
}

impl SummaryStatistics {
    /// Human-readable multi-line report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "profit:             {}", format_decimal(self.net_profit));
        let _ = writeln!(out, "trades:             {}", self.num_trades);
        let _ = writeln!(out, "profit per trade:   {}", format_ratio(self.profit_per_trade));
        let _ = writeln!(out, "max drawdown:       {}", format_decimal(self.max_drawdown));
        let _ = writeln!(out, "std dev:            {}", format_ratio(self.std_dev));
        let _ = writeln!(out, "skew:               {}", format_float(self.skew, 4));
        let _ = writeln!(out, "kurtosis:           {}", format_float(self.fisher_kurtosis, 4));
        let _ = writeln!(
            out,
            "win ratio:          {}",
            self.win_ratio.map_or_else(|| "N/A".to_string(), format_pct)
        );
        let _ = writeln!(out, "win ratio p-value:  {}", format_float(self.win_ratio_pvalue, 4));
        let _ = writeln!(out, "average win:        {}", format_ratio(self.avg_win));
        let _ = writeln!(out, "average loss:       {}", format_ratio(self.avg_loss));
        let _ = writeln!(out, "kelly criterion:    {}", format_ratio(self.kelly_criterion));
        out
    }
}

//! Summary statistics calculator for realized-profit series.

use rust_decimal::Decimal;

use super::constants::DEFAULT_NULL_WIN_PROBABILITY;
use super::math::{excess_kurtosis, mean, skewness, std_dev};
use super::significance::win_ratio_test;
use super::types::{DrawdownPoint, EquityPoint, SummaryStatistics};
use crate::domain::RealizedPoint;

/// Calculates [`SummaryStatistics`] from realized profits in trade order.
///
/// The series is never re-sorted; drawdown depends on the order trades were
/// closed. Running sums saturate at the `Decimal` bounds.
#[derive(Debug, Clone)]
pub struct StatisticsCalculator {
    points: Vec<RealizedPoint>,
    null_win_probability: f64,
}

impl Default for StatisticsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsCalculator {
    /// Create an empty calculator testing win ratio against a coin flip.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            null_win_probability: DEFAULT_NULL_WIN_PROBABILITY,
        }
    }

    /// Build a calculator over plain profits.
    #[must_use]
    pub fn from_profits(profits: impl IntoIterator<Item = Decimal>) -> Self {
        let mut calc = Self::new();
        for profit in profits {
            calc.add_profit(profit);
        }
        calc
    }

    /// Build a calculator over a timestamped realized series.
    #[must_use]
    pub fn from_series(points: Vec<RealizedPoint>) -> Self {
        Self {
            points,
            null_win_probability: DEFAULT_NULL_WIN_PROBABILITY,
        }
    }

    /// Set the win probability the win ratio test is run against.
    #[must_use]
    pub fn with_null_win_probability(mut self, probability: f64) -> Self {
        self.null_win_probability = probability;
        self
    }

    /// Append a realized profit.
    pub fn add_profit(&mut self, profit: Decimal) {
        self.points.push(RealizedPoint {
            sequence: self.points.len() as u64,
            timestamp: None,
            profit,
        });
    }

    /// Realized profits in order.
    #[must_use]
    pub fn profits(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.profit).collect()
    }

    /// Cumulative realized profit after each closing trade.
    #[must_use]
    pub fn equity_curve(&self) -> Vec<EquityPoint> {
        let mut cumulative = Decimal::ZERO;
        self.points
            .iter()
            .map(|p| {
                cumulative = cumulative.saturating_add(p.profit);
                EquityPoint {
                    sequence: p.sequence,
                    timestamp: p.timestamp,
                    cumulative,
                }
            })
            .collect()
    }

    /// Running high and drawdown after each closing trade.
    ///
    /// The running high starts at the first cumulative value, not at zero.
    #[must_use]
    pub fn drawdown_series(&self) -> Vec<DrawdownPoint> {
        let mut high: Option<Decimal> = None;
        self.equity_curve()
            .into_iter()
            .map(|point| {
                let peak = high.map_or(point.cumulative, |h| h.max(point.cumulative));
                high = Some(peak);
                DrawdownPoint {
                    sequence: point.sequence,
                    cumulative: point.cumulative,
                    high: peak,
                    drawdown: peak.saturating_sub(point.cumulative),
                }
            })
            .collect()
    }

    /// Calculate all summary metrics.
    #[must_use]
    pub fn calculate(&self) -> SummaryStatistics {
        if self.points.is_empty() {
            return SummaryStatistics::default();
        }

        let profits = self.profits();
        let num_trades = profits.len() as u64;
        let net_profit = profits
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.saturating_add(*p));

        let (gross_profit, gross_loss, num_gains, num_losses) = Self::calculate_trade_stats(&profits);
        let (max_consecutive_wins, max_consecutive_losses) =
            Self::calculate_consecutive_streaks(&profits);

        let max_drawdown = self
            .drawdown_series()
            .iter()
            .map(|p| p.drawdown)
            .max()
            .unwrap_or(Decimal::ZERO);

        let avg_win = ratio(gross_profit, num_gains);
        let avg_loss = ratio(-gross_loss, num_losses);
        let win_ratio = ratio(Decimal::from(num_gains), num_trades);

        let payoff_ratio = match (avg_win, avg_loss) {
            (Some(win), Some(loss)) => win.checked_div(loss.abs()),
            _ => None,
        };
        let profit_factor = if gross_loss > Decimal::ZERO {
            gross_profit.checked_div(gross_loss)
        } else {
            None
        };

        let kelly_criterion = Self::calculate_kelly(net_profit, win_ratio, num_gains, num_losses);
        let win_ratio_pvalue =
            win_ratio_test(num_gains, num_trades, self.null_win_probability).map(|t| t.p_value);

        SummaryStatistics {
            net_profit,
            num_trades,
            profit_per_trade: mean(&profits),
            max_drawdown,
            std_dev: std_dev(&profits),
            skew: skewness(&profits),
            fisher_kurtosis: excess_kurtosis(&profits),
            num_gains,
            num_losses,
            avg_win,
            avg_loss,
            win_ratio,
            kelly_criterion,
            win_ratio_pvalue,
            gross_profit,
            gross_loss,
            payoff_ratio,
            profit_factor,
            max_consecutive_wins,
            max_consecutive_losses,
        }
    }

    fn calculate_trade_stats(profits: &[Decimal]) -> (Decimal, Decimal, u64, u64) {
        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut winning = 0u64;
        let mut losing = 0u64;

        for profit in profits {
            if *profit > Decimal::ZERO {
                gross_profit = gross_profit.saturating_add(*profit);
                winning += 1;
            } else if *profit < Decimal::ZERO {
                gross_loss = gross_loss.saturating_add(profit.abs());
                losing += 1;
            }
        }

        (gross_profit, gross_loss, winning, losing)
    }

    fn calculate_consecutive_streaks(profits: &[Decimal]) -> (u64, u64) {
        let mut max_wins = 0u64;
        let mut max_losses = 0u64;
        let mut current_wins = 0u64;
        let mut current_losses = 0u64;

        for profit in profits {
            if *profit > Decimal::ZERO {
                current_wins += 1;
                current_losses = 0;
                max_wins = max_wins.max(current_wins);
            } else if *profit < Decimal::ZERO {
                current_losses += 1;
                current_wins = 0;
                max_losses = max_losses.max(current_losses);
            }
        }

        (max_wins, max_losses)
    }

    /// Kelly = W - (1 - W) / (gains / losses) for a profitable series.
    ///
    /// A series that made no money is not sized up: zero. Undefined when a
    /// profitable series has no losses to divide by.
    fn calculate_kelly(
        net_profit: Decimal,
        win_ratio: Option<Decimal>,
        num_gains: u64,
        num_losses: u64,
    ) -> Option<Decimal> {
        if net_profit <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }
        let win_ratio = win_ratio?;
        let gain_loss_ratio = ratio(Decimal::from(num_gains), num_losses)?;
        if gain_loss_ratio.is_zero() {
            return None;
        }
        Some(win_ratio - (Decimal::ONE - win_ratio) / gain_loss_ratio)
    }

    /// Export summary to JSON.
    #[must_use]
    pub fn summary_to_json(&self) -> String {
        serde_json::to_string_pretty(&self.calculate()).unwrap_or_default()
    }
}

/// `numerator / count`, `None` when count is zero.
fn ratio(numerator: Decimal, count: u64) -> Option<Decimal> {
    if count == 0 {
        None
    } else {
        Some(numerator / Decimal::from(count))
    }
}

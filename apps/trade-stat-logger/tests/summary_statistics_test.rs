//! Integration tests for summary statistics over logged sessions.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_stat_logger::{
    CollectingSink, Config, Diagnostic, SessionSnapshot, StaticPriceSource, StatisticsCalculator,
    Symbol, TradeLogger, load_config_from_string,
};

fn sym(s: &str) -> Symbol {
    Symbol::parse(s).unwrap()
}

/// Log a buy then a sell per profit so each pair realizes exactly `profit`.
fn session_with_profits(profits: &[Decimal]) -> TradeLogger {
    let mut logger = TradeLogger::default();
    for profit in profits {
        logger.log("XYZ", dec!(1), dec!(100), None).unwrap();
        logger.log("XYZ", dec!(-1), dec!(100) + profit, None).unwrap();
    }
    logger
}

#[test]
fn test_empty_session() {
    let logger = TradeLogger::default();
    let summary = logger.summary_statistics();

    assert_eq!(summary.num_trades, 0);
    assert_eq!(summary.net_profit, Decimal::ZERO);
    assert_eq!(summary.max_drawdown, Decimal::ZERO);
    assert_eq!(summary.win_ratio, None);
    assert_eq!(summary.kelly_criterion, Some(Decimal::ZERO));
    assert_eq!(summary.win_ratio_pvalue, None);
    assert_eq!(summary.std_dev, None);
}

#[test]
fn test_mixed_session() {
    let logger = session_with_profits(&[dec!(10), dec!(-5), dec!(20), dec!(-15), dec!(5), dec!(-10)]);
    let summary = logger.summary_statistics();

    assert_eq!(summary.num_trades, 6);
    assert_eq!(summary.net_profit, dec!(5));
    assert_eq!(summary.num_gains, 3);
    assert_eq!(summary.num_losses, 3);
    assert_eq!(summary.avg_win, Some(dec!(35) / dec!(3)));
    assert_eq!(summary.avg_loss, Some(dec!(-10)));
    assert_eq!(summary.win_ratio, Some(dec!(0.5)));
    // cumulative 10, 5, 25, 10, 15, 5 -> high 25, trough 5
    assert_eq!(summary.max_drawdown, dec!(20));
    // 0.5 - 0.5 / (3 / 3)
    assert_eq!(summary.kelly_criterion, Some(Decimal::ZERO));
    assert_eq!(summary.max_consecutive_wins, 1);

    let Some(pvalue) = summary.win_ratio_pvalue else {
        panic!("p-value should be defined for a non-empty session");
    };
    assert!((pvalue - 0.5).abs() < 1e-12);
}

#[test]
fn test_large_profits_summarize_without_overflow() {
    let shares = dec!(10_000_000);
    let mut logger = TradeLogger::default();
    logger.log("XYZ", shares, dec!(100_000_000), None).unwrap();
    logger.log("XYZ", -shares, dec!(200_000_000), None).unwrap();
    logger.log("XYZ", shares, dec!(200_000_000), None).unwrap();
    logger.log("XYZ", -shares, dec!(100_000_000), None).unwrap();

    let big = dec!(1_000_000_000_000_000);
    assert_eq!(logger.history().realized_profits(), vec![big, -big]);

    let summary = logger.summary_statistics();
    assert_eq!(summary.net_profit, Decimal::ZERO);
    assert_eq!(summary.max_drawdown, big);
    assert!(summary.std_dev.is_some_and(|sd| sd > big));
}

#[test]
fn test_losing_session_has_zero_kelly() {
    let logger = session_with_profits(&[dec!(-10), dec!(3)]);
    let summary = logger.summary_statistics();
    assert_eq!(summary.net_profit, dec!(-7));
    assert_eq!(summary.kelly_criterion, Some(Decimal::ZERO));
}

#[test]
fn test_winning_session_without_losses_has_undefined_kelly() {
    let logger = session_with_profits(&[dec!(10), dec!(3)]);
    let summary = logger.summary_statistics();
    assert_eq!(summary.kelly_criterion, None);
    assert_eq!(summary.avg_loss, None);
    assert_eq!(summary.max_drawdown, Decimal::ZERO);
    assert!(summary.win_ratio_pvalue.is_some_and(f64::is_finite));
}

#[test]
fn test_open_positions_are_reported_but_excluded() {
    let mut logger = session_with_profits(&[dec!(10)]);
    logger.log("ABC", dec!(5), dec!(20), None).unwrap();

    let mut sink = CollectingSink::new();
    let summary = logger.summary_statistics_with(&mut sink);

    assert_eq!(summary.net_profit, dec!(10));
    assert_eq!(
        sink.diagnostics(),
        &[Diagnostic::OpenPositions {
            symbols: vec![sym("ABC")],
        }]
    );
}

#[test]
fn test_close_all_then_summarize() {
    let mut logger = TradeLogger::default();
    logger.log("AAA", dec!(10), dec!(5), None).unwrap();
    logger.log("BBB", dec!(-4), dec!(25), None).unwrap();

    let source = StaticPriceSource::new()
        .with_price(sym("AAA"), dec!(7))
        .with_price(sym("BBB"), dec!(20));
    let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    let report = logger.close_all_positions(&source, date);
    assert!(report.is_complete());

    let mut sink = CollectingSink::new();
    let summary = logger.summary_statistics_with(&mut sink);
    assert!(sink.is_empty());
    assert_eq!(summary.num_trades, 2);
    assert_eq!(summary.net_profit, dec!(40));
    assert_eq!(summary.gross_profit, dec!(40));
}

#[test]
fn test_configured_null_probability_changes_pvalue() {
    let config = load_config_from_string("statistics:\n  null_win_probability: 0.8\n").unwrap();
    let mut logger = TradeLogger::new(&config);
    for _ in 0..3 {
        logger.log("XYZ", dec!(1), dec!(10), None).unwrap();
        logger.log("XYZ", dec!(-1), dec!(11), None).unwrap();
    }
    logger.log("XYZ", dec!(1), dec!(10), None).unwrap();
    logger.log("XYZ", dec!(-1), dec!(9), None).unwrap();

    let coin_flip = session_with_profits(&[dec!(1), dec!(1), dec!(1), dec!(-1)]).summary_statistics();
    let demanding = logger.summary_statistics();

    // win ratio 0.75 beats 0.5 but not 0.8
    let (Some(easy), Some(hard)) = (coin_flip.win_ratio_pvalue, demanding.win_ratio_pvalue) else {
        panic!("p-values should be defined");
    };
    assert!(easy < 0.5);
    assert!(hard > 0.5);
}

#[test]
fn test_snapshot_roundtrip_preserves_statistics() {
    let logger = session_with_profits(&[dec!(10), dec!(-5), dec!(7)]);
    let json = serde_json::to_string(&logger.snapshot()).unwrap();
    let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
    let restored = TradeLogger::restore(&Config::default(), snapshot).unwrap();

    assert_eq!(restored.summary_statistics(), logger.summary_statistics());
}

#[test]
fn test_equity_and_drawdown_series_follow_trade_order() {
    let logger = session_with_profits(&[dec!(5), dec!(-8), dec!(4)]);
    let calc = StatisticsCalculator::from_series(logger.history().realized_series());

    let equity: Vec<Decimal> = calc.equity_curve().iter().map(|p| p.cumulative).collect();
    assert_eq!(equity, vec![dec!(5), dec!(-3), dec!(1)]);

    let drawdowns: Vec<Decimal> = calc.drawdown_series().iter().map(|p| p.drawdown).collect();
    assert_eq!(drawdowns, vec![dec!(0), dec!(8), dec!(4)]);

    // sequence numbers point at the closing trades
    let sequences: Vec<u64> = calc.equity_curve().iter().map(|p| p.sequence).collect();
    assert_eq!(sequences, vec![1, 3, 5]);
}

proptest! {
    #[test]
    fn prop_max_drawdown_is_non_negative(profits in prop::collection::vec(-1_000i64..=1_000, 0..60)) {
        let summary = StatisticsCalculator::from_profits(profits.into_iter().map(Decimal::from)).calculate();
        prop_assert!(summary.max_drawdown >= Decimal::ZERO);
    }

    #[test]
    fn prop_no_drawdown_without_losses(profits in prop::collection::vec(0i64..=1_000, 0..60)) {
        let summary = StatisticsCalculator::from_profits(profits.into_iter().map(Decimal::from)).calculate();
        prop_assert_eq!(summary.max_drawdown, Decimal::ZERO);
    }

    #[test]
    fn prop_gains_and_losses_partition_trades(profits in prop::collection::vec(-100i64..=100, 0..60)) {
        let zeros = profits.iter().filter(|p| **p == 0).count() as u64;
        let summary = StatisticsCalculator::from_profits(profits.into_iter().map(Decimal::from)).calculate();
        prop_assert_eq!(summary.num_gains + summary.num_losses + zeros, summary.num_trades);
    }
}

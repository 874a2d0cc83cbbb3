//! Integration tests for the position ledger through a logging session.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trade_stat_logger::{LedgerError, Symbol, TradeKind, TradeLogger};

fn sym(s: &str) -> Symbol {
    Symbol::parse(s).unwrap()
}

#[test]
fn test_long_sold_at_loss() {
    let mut logger = TradeLogger::default();
    logger.log("XYZ", dec!(10), dec!(5), None).unwrap();
    let profit = logger.log("XYZ", dec!(-10), dec!(4), None).unwrap();

    assert_eq!(profit, Some(dec!(-10)));
    let Some(snapshot) = logger.position(&sym("XYZ")) else {
        panic!("XYZ should still be tracked");
    };
    assert_eq!(snapshot.shares, Decimal::ZERO);
    assert_eq!(snapshot.average_price, Decimal::ZERO);
}

#[test]
fn test_four_trade_round_trip_nets_zero() {
    let mut logger = TradeLogger::default();
    let trades = [
        (dec!(10), dec!(4)),
        (dec!(-10), dec!(5)),
        (dec!(10), dec!(5)),
        (dec!(-10), dec!(4)),
    ];
    let profits: Vec<Option<Decimal>> = trades
        .iter()
        .map(|(shares, price)| logger.log("XYZ", *shares, *price, None).unwrap())
        .collect();

    assert_eq!(profits, vec![None, Some(dec!(10)), None, Some(dec!(-10))]);
    assert_eq!(logger.history().realized_profits().iter().sum::<Decimal>(), Decimal::ZERO);
}

#[test]
fn test_short_cover_flips_to_long() {
    let mut logger = TradeLogger::default();
    logger.log("XYZ", dec!(-5), dec!(10), None).unwrap();
    let profit = logger.log("XYZ", dec!(8), dec!(8), None).unwrap();

    // covered 5 short at 10 for 8 each
    assert_eq!(profit, Some(dec!(10)));
    let Some(snapshot) = logger.position(&sym("XYZ")) else {
        panic!("XYZ should still be tracked");
    };
    assert_eq!(snapshot.shares, dec!(3));
    assert_eq!(snapshot.average_price, dec!(8));
}

#[test]
fn test_opening_and_extending_realize_nothing() {
    let mut logger = TradeLogger::default();
    assert_eq!(logger.log("XYZ", dec!(-5), dec!(10), None).unwrap(), None);
    assert_eq!(logger.log("XYZ", dec!(-5), dec!(12), None).unwrap(), None);
    assert_eq!(logger.position(&sym("XYZ")).unwrap().average_price, dec!(11));
    assert!(logger.history().realized_profits().is_empty());
}

#[test]
fn test_invalid_inputs_leave_snapshot_unchanged() {
    let mut logger = TradeLogger::default();
    logger.log("XYZ", dec!(10), dec!(5), None).unwrap();
    let before = logger.snapshot();

    let errors = [
        logger.log("XYZ", dec!(5), dec!(0), None).unwrap_err(),
        logger.log("XYZ", dec!(-5), dec!(-2), None).unwrap_err(),
        logger.log("", dec!(5), dec!(2), None).unwrap_err(),
        logger.log_clear_position("XYZ", dec!(0), None).unwrap_err(),
    ];

    for err in &errors {
        assert!(matches!(err, LedgerError::InvalidInput { .. }), "unexpected error: {err}");
    }
    assert_eq!(logger.snapshot(), before);
}

#[test]
fn test_securities_are_independent() {
    let mut logger = TradeLogger::default();
    logger.log("AAA", dec!(10), dec!(5), None).unwrap();
    logger.log("BBB", dec!(-10), dec!(5), None).unwrap();
    assert_eq!(logger.log("AAA", dec!(-10), dec!(6), None).unwrap(), Some(dec!(10)));
    assert_eq!(logger.log("BBB", dec!(10), dec!(6), None).unwrap(), Some(dec!(-10)));
    assert_eq!(logger.open_symbols(), Vec::<Symbol>::new());
}

#[test]
fn test_history_csv_lists_every_trade() {
    let mut logger = TradeLogger::default();
    logger.log("XYZ", dec!(10), dec!(5), None).unwrap();
    logger.log_clear_position("XYZ", dec!(6), None).unwrap();

    let csv = logger.history().to_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "0,,XYZ,10,5,,open");
    assert_eq!(lines[2], "1,,XYZ,-10,6,10,close");
    assert_eq!(logger.history().records()[1].kind, TradeKind::Close);
}

#[test]
fn test_history_csv_keeps_column_count_for_odd_symbols() {
    let mut logger = TradeLogger::default();
    logger.log("BRK,B", dec!(1), dec!(5), None).unwrap();
    logger.log("BRK,B", dec!(-1), dec!(6), None).unwrap();

    let csv = logger.history().to_csv().unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let columns = reader.headers().unwrap().len();
    assert_eq!(columns, 7);
    for row in reader.records() {
        let row = row.unwrap();
        assert_eq!(row.len(), columns, "row {row:?}");
        assert_eq!(&row[2], "BRK,B");
    }
}

fn arb_trades() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((-50i64..=50, 1i64..=500), 1..40)
}

proptest! {
    #[test]
    fn prop_shares_equal_net_signed_quantity(trades in arb_trades()) {
        let mut logger = TradeLogger::default();
        for (shares, price) in &trades {
            logger.log("XYZ", Decimal::from(*shares), Decimal::from(*price), None).unwrap();
        }
        let net: i64 = trades.iter().map(|(shares, _)| shares).sum();
        let snapshot = logger.position(&sym("XYZ")).unwrap();
        prop_assert_eq!(snapshot.shares, Decimal::from(net));
    }

    #[test]
    fn prop_realized_profit_matches_cash_flow_after_close(
        trades in arb_trades(),
        close_price in 1i64..=500,
    ) {
        let mut logger = TradeLogger::default();
        let mut cash = Decimal::ZERO;
        for (shares, price) in &trades {
            let (shares, price) = (Decimal::from(*shares), Decimal::from(*price));
            logger.log("XYZ", shares, price, None).unwrap();
            cash -= shares * price;
        }
        let close_price = Decimal::from(close_price);
        let open_shares = logger.position(&sym("XYZ")).unwrap().shares;
        logger.log_clear_position("XYZ", close_price, None).unwrap();
        cash += open_shares * close_price;

        let realized: Decimal = logger.history().realized_profits().iter().sum();
        prop_assert!((realized - cash).abs() < dec!(0.000001), "realized {} != cash {}", realized, cash);
        prop_assert!(!logger.has_open_positions());
    }
}

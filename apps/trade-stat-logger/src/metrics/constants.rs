//! Constants for summary statistic calculations.

use rust_decimal::Decimal;

pub const TWO: Decimal = Decimal::TWO;
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12); // 0.000000000001

/// Win probability under the null hypothesis of a coin-flip strategy.
pub const DEFAULT_NULL_WIN_PROBABILITY: f64 = 0.5;

//! Statistical math utilities for summary metric calculations.
//!
//! Sums and means stay in `Decimal`. Third and fourth moments are computed in
//! `f64`, where large profits cannot overflow the decimal mantissa. The
//! standard deviation falls back to `f64` when squared deviations leave the
//! decimal range.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use super::constants::{TOLERANCE, TWO};

/// Calculate mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))?;
    Some(sum / Decimal::from(values.len() as u64))
}

/// Calculate sample standard deviation (n - 1) of a slice of decimals.
pub fn std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let Some(avg) = mean(values) else {
        return std_dev_f64(values);
    };
    let denom = Decimal::from((values.len() - 1) as u64);
    let variance = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| {
            let d = v.checked_sub(avg)?;
            acc.checked_add(d.checked_mul(d)?)
        })
        .map(|sum| sum / denom);

    match variance {
        Some(variance) => sqrt_decimal(variance),
        None => std_dev_f64(values),
    }
}

/// Sample standard deviation in `f64`, for squared deviations beyond the
/// decimal range.
fn std_dev_f64(values: &[Decimal]) -> Option<Decimal> {
    let xs = to_f64(values)?;
    let n = xs.len() as f64;
    let avg = xs.iter().sum::<f64>() / n;
    let sum_sq = xs.iter().fold(0.0, |acc, x| (x - avg).mul_add(x - avg, acc));
    Decimal::from_f64((sum_sq / (n - 1.0)).sqrt())
}

/// Approximate square root using Newton's method.
pub fn sqrt_decimal(value: Decimal) -> Option<Decimal> {
    if value < Decimal::ZERO {
        return None;
    }
    if value == Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let mut guess = value / TWO;

    for _ in 0..100 {
        let next = (guess + value / guess) / TWO;
        if (next - guess).abs() < TOLERANCE {
            return Some(next);
        }
        guess = next;
    }

    Some(guess)
}

/// Adjusted Fisher-Pearson sample skewness (G1).
///
/// `None` for fewer than 3 values or a constant series.
pub fn skewness(values: &[Decimal]) -> Option<f64> {
    if values.len() < 3 || is_constant(values) {
        return None;
    }
    let xs = to_f64(values)?;
    let n = xs.len() as f64;
    let avg = xs.iter().sum::<f64>() / n;

    let (m2, m3) = xs.iter().fold((0.0, 0.0), |(m2, m3), x| {
        let d = x - avg;
        (d.mul_add(d, m2), (d * d).mul_add(d, m3))
    });
    let m2 = m2 / n;
    let m3 = m3 / n;

    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
}

/// Bias-corrected excess kurtosis (G2); a normal sample gives about 0.
///
/// `None` for fewer than 4 values or a constant series.
pub fn excess_kurtosis(values: &[Decimal]) -> Option<f64> {
    if values.len() < 4 || is_constant(values) {
        return None;
    }
    let xs = to_f64(values)?;
    let n = xs.len() as f64;
    let avg = xs.iter().sum::<f64>() / n;

    let (m2, m4) = xs.iter().fold((0.0, 0.0), |(m2, m4), x| {
        let d = x - avg;
        let d2 = d * d;
        (m2 + d2, d2.mul_add(d2, m4))
    });

    let denom = (n - 2.0) * (n - 3.0);
    let adj = 3.0 * (n - 1.0) * (n - 1.0) / denom;
    Some((n + 1.0) * n * (n - 1.0) * m4 / (denom * m2 * m2) - adj)
}

fn is_constant(values: &[Decimal]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn to_f64(values: &[Decimal]) -> Option<Vec<f64>> {
    values.iter().map(ToPrimitive::to_f64).collect()
}

//! One-sample proportion z-test for the win ratio.
//!
//! H0: the true win probability equals `null_probability`.
//! H1: it is greater. The standard error uses the null probability, so the
//! statistic stays finite when every trade won or every trade lost.

use std::f64::consts::SQRT_2;

/// Result of the win ratio test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionTest {
    /// Standardized difference between observed and null proportion.
    pub z_score: f64,
    /// One-sided upper-tail p-value.
    pub p_value: f64,
}

/// Test `successes` out of `trials` against `null_probability`.
///
/// `None` when there are no trials or the null probability is outside (0, 1).
pub fn win_ratio_test(successes: u64, trials: u64, null_probability: f64) -> Option<ProportionTest> {
    if trials == 0 || !(null_probability > 0.0 && null_probability < 1.0) {
        return None;
    }
    let n = trials as f64;
    let observed = successes as f64 / n;
    let std_err = (null_probability * (1.0 - null_probability) / n).sqrt();
    let z_score = (observed - null_probability) / std_err;

    Some(ProportionTest {
        z_score,
        p_value: norm_sf(z_score),
    })
}

/// Standard normal survival function, 1 - CDF.
fn norm_sf(x: f64) -> f64 {
    0.5 * libm::erfc(x / SQRT_2)
}

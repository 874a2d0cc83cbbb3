//! Session and statistics configuration.

use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_NULL_WIN_PROBABILITY;

/// Trade logging session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Stamp trades logged without a time with the current UTC time.
    #[serde(default)]
    pub time_support: bool,
}

/// Summary statistics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    /// Win probability the win ratio p-value is tested against.
    #[serde(default = "default_null_win_probability")]
    pub null_win_probability: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            null_win_probability: default_null_win_probability(),
        }
    }
}

const fn default_null_win_probability() -> f64 {
    DEFAULT_NULL_WIN_PROBABILITY
}

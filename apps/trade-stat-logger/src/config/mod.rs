//! Session, statistics and logging settings.
//!
//! | Key | Default | Effect |
//! |-----|---------|--------|
//! | `session.time_support` | `false` | Stamp trades logged without a time with the current UTC time |
//! | `statistics.null_win_probability` | `0.5` | Win probability the win ratio p-value is tested against; must lie strictly inside (0, 1) |
//! | `observability.logging.level` | `info` | Filter directive, overridden by `RUST_LOG` |
//! | `observability.logging.format` | `text` | `text` or `json` |
//!
//! Values may reference the environment as `${VAR}` or `${VAR:-default}`.
//! A strategy expected to win 60% of the time, for instance, is judged
//! against that rate rather than a coin flip:
//!
//! ```yaml
//! session:
//!   time_support: true
//! statistics:
//!   null_win_probability: ${NULL_WIN_PROBABILITY:-0.6}
//! observability:
//!   logging:
//!     level: ${LOG_LEVEL:-info}
//!     format: json
//! ```
//!
//! ```rust,ignore
//! let config = trade_stat_logger::config::load_config(Some("trade-stat-logger.yaml"))?;
//! let logger = trade_stat_logger::TradeLogger::new(&config);
//! ```

mod observability;
mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LoggingConfig, ObservabilityConfig};
pub use session::{SessionConfig, StatisticsConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "trade-stat-logger.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Statistics configuration.
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to
///   [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = &cap[1];
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let p = config.statistics.null_win_probability;
    if !(p > 0.0 && p < 1.0) {
        return Err(ConfigError::ValidationError(
            "statistics.null_win_probability must be strictly between 0.0 and 1.0".to_string(),
        ));
    }

    let valid_formats = ["text", "json"];
    let format = config.observability.logging.format.to_ascii_lowercase();
    if !valid_formats.contains(&format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level cannot be empty".to_string(),
        ));
    }

    Ok(())
}

//! Scan configuration.
//!
//! Everything a run needs travels in one explicit struct — no module-level
//! state. Loadable from TOML with per-field defaults, so a config file only
//! has to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration for one scan/backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScanConfig {
    /// Currency units added on each contribution day.
    pub contribution: f64,

    /// Years of history to download. Must cover the 200-session SMA warm-up
    /// with room to spare.
    pub lookback_years: u32,

    /// Length of the simulated window, counted back from the last date.
    pub backtest_years: u32,

    /// Gate all signals by the market proxy's own trend.
    pub market_filter: bool,

    /// Broad-market proxy symbol for the regime filter.
    pub market_proxy: String,

    /// Tradable universe.
    pub tickers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            contribution: 200.0,
            lookback_years: 7,
            backtest_years: 5,
            market_filter: true,
            market_proxy: "SPY".to_string(),
            tickers: default_universe(),
        }
    }
}

/// US mega caps commonly available on retail platforms.
fn default_universe() -> Vec<String> {
    [
        "AAPL", "MSFT", "NVDA", "AMZN", "GOOGL", "META", "BRK-B", "LLY", "AVGO", "TSM",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl ScanConfig {
    /// Load from a TOML file, filling unset fields from defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string, filling unset fields from defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contribution <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "contribution must be positive, got {}",
                self.contribution
            )));
        }
        if self.lookback_years < 1 {
            return Err(ConfigError::Invalid(
                "lookback_years must cover the 200-session SMA warm-up (>= 1)".into(),
            ));
        }
        if self.backtest_years < 1 {
            return Err(ConfigError::Invalid("backtest_years must be >= 1".into()));
        }
        if self.lookback_years < self.backtest_years {
            return Err(ConfigError::Invalid(format!(
                "lookback_years ({}) must be >= backtest_years ({})",
                self.lookback_years, self.backtest_years
            )));
        }
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("tickers must not be empty".into()));
        }
        if self.market_filter && self.market_proxy.is_empty() {
            return Err(ConfigError::Invalid(
                "market_proxy is required when market_filter is on".into(),
            ));
        }
        Ok(())
    }

    /// Deterministic content hash of this config. Two identical configs
    /// share a run id, which names the artifact directory.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("ScanConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

//! Serializable backtest configuration, loaded from TOML.
//!
//! ```toml
//! [backtest]
//! symbol = "SPY"
//! start_date = "2023-01-01"
//! end_date = "2023-12-31"
//! initial_capital = 100000.0
//! commission_rate = 0.001
//! slippage_rate = 0.001
//!
//! [data]
//! source = "synthetic"
//! seed = 42
//!
//! [[strategies]]
//! type = "ma_crossover"
//! [strategies.params]
//! short_window = 20
//! long_window = 50
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use barlab_core::engine::EngineConfig;
use barlab_core::fingerprint::ComponentConfig;

/// Errors that can occur while loading or validating a config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {field} '{value}': expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("start_date {start} is after end_date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("config lists no strategies")]
    NoStrategies,

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub strategies: Vec<ComponentConfig>,
}

/// `[backtest]`: symbol, range, and cost model shared by every strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
    #[serde(default = "default_rate")]
    pub commission_rate: f64,
    #[serde(default = "default_rate")]
    pub slippage_rate: f64,
}

fn default_initial_capital() -> f64 {
    EngineConfig::default().initial_capital
}

fn default_rate() -> f64 {
    0.001
}

fn default_seed() -> u64 {
    42
}

/// `[data]`: where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSection {
    /// A directory of `<SYMBOL>.csv` files, or one `<SYMBOL>.csv` file.
    Csv { path: PathBuf },
    /// Seeded geometric random walk.
    Synthetic {
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

impl Default for DataSection {
    fn default() -> Self {
        DataSection::Synthetic {
            seed: default_seed(),
        }
    }
}

impl BacktestConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: BacktestConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        let start = self.start_date()?;
        let end = self.end_date()?;
        if start > end {
            return Err(ConfigError::InvalidRange { start, end });
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        self.engine_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn start_date(&self) -> Result<NaiveDate, ConfigError> {
        parse_date("start_date", &self.backtest.start_date)
    }

    pub fn end_date(&self) -> Result<NaiveDate, ConfigError> {
        parse_date("end_date", &self.backtest.end_date)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            self.backtest.initial_capital,
            self.backtest.commission_rate,
            self.backtest.slippage_rate,
        )
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

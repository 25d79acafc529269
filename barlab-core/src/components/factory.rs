//! Factory — converts a `ComponentConfig` into a runtime signal generator.

use crate::fingerprint::ComponentConfig;

use super::signal::{
    BollingerBands, Macd, MaCrossover, ParamError, RsiReversion, SignalGenerator,
    VolumeMaCrossover,
};

/// Every strategy type the factory knows how to build.
pub const SIGNAL_TYPES: &[&str] = &[
    "ma_crossover",
    "rsi",
    "macd",
    "bollinger",
    "volume_ma_crossover",
];

/// Errors that can occur during component construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactoryError {
    #[error("unknown signal type: {0}")]
    UnknownSignal(String),
    #[error("parameter '{name}' must be a non-negative integer, got {value}")]
    NotAnInteger { name: String, value: f64 },
    #[error(transparent)]
    InvalidParams(#[from] ParamError),
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Extract a named f64 parameter from a `ComponentConfig`, falling back to `default`.
fn param(config: &ComponentConfig, name: &str, default: f64) -> f64 {
    config.params.get(name).copied().unwrap_or(default)
}

/// Extract a named window-length parameter, falling back to `default`.
///
/// Rejects fractional or negative values instead of silently truncating them.
fn param_usize(config: &ComponentConfig, name: &str, default: usize) -> Result<usize, FactoryError> {
    match config.params.get(name).copied() {
        None => Ok(default),
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v.is_finite() => Ok(v as usize),
        Some(value) => Err(FactoryError::NotAnInteger {
            name: name.to_string(),
            value,
        }),
    }
}

// ─── Signal factory ──────────────────────────────────────────────────

/// Create a signal generator from a `ComponentConfig`.
///
/// Missing parameters take the conventional defaults (MA 20/50, RSI 14/30/70,
/// MACD 12/26/9, Bollinger 20/2, volume-confirmed MA 10/30/20).
pub fn create_signal(config: &ComponentConfig) -> Result<Box<dyn SignalGenerator>, FactoryError> {
    match config.component_type.as_str() {
        "ma_crossover" => {
            let short_window = param_usize(config, "short_window", 20)?;
            let long_window = param_usize(config, "long_window", 50)?;
            Ok(Box::new(MaCrossover::new(short_window, long_window)?))
        }
        "rsi" => {
            let period = param_usize(config, "period", 14)?;
            let oversold = param(config, "oversold", 30.0);
            let overbought = param(config, "overbought", 70.0);
            Ok(Box::new(RsiReversion::new(period, oversold, overbought)?))
        }
        "macd" => {
            let fast_span = param_usize(config, "fast_span", 12)?;
            let slow_span = param_usize(config, "slow_span", 26)?;
            let signal_span = param_usize(config, "signal_span", 9)?;
            Ok(Box::new(Macd::new(fast_span, slow_span, signal_span)?))
        }
        "bollinger" => {
            let window = param_usize(config, "window", 20)?;
            let num_std = param(config, "num_std", 2.0);
            Ok(Box::new(BollingerBands::new(window, num_std)?))
        }
        "volume_ma_crossover" => {
            let short_window = param_usize(config, "short_window", 10)?;
            let long_window = param_usize(config, "long_window", 30)?;
            let volume_window = param_usize(config, "volume_window", 20)?;
            Ok(Box::new(VolumeMaCrossover::new(
                short_window,
                long_window,
                volume_window,
            )?))
        }
        other => Err(FactoryError::UnknownSignal(other.to_string())),
    }
}

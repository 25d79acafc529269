//! Signal generation — pure transforms from a bar sequence to per-bar signals.
//!
//! Signals are portfolio-agnostic: they receive the bar history only, never
//! capital or position state. Each generator is a small immutable value that
//! holds its own parameters and nothing else, so the same generator can be
//! shared across threads and evaluated any number of times.

pub mod bollinger;
pub mod ma_crossover;
pub mod macd;
pub mod rsi;
pub mod volume_ma;

pub use bollinger::BollingerBands;
pub use ma_crossover::MaCrossover;
pub use macd::Macd;
pub use rsi::RsiReversion;
pub use volume_ma::VolumeMaCrossover;

use thiserror::Error;

use crate::domain::{Bar, Signal};

/// Trait for signal generators.
///
/// # Contract
/// `generate` is deterministic and returns exactly one signal per input bar.
/// The signal at index `t` depends only on `bars[..=t]`. Bars whose indicators
/// lack lookback produce `Signal::Hold`.
pub trait SignalGenerator: Send + Sync {
    /// Display name including parameters (e.g., "MA_Cross_20_50").
    fn name(&self) -> &str;

    /// Bars of history needed before the generator's output is meaningful.
    ///
    /// The data loader requests this much history ahead of the nominal start.
    fn warmup_bars(&self) -> usize;

    fn generate(&self, bars: &[Bar]) -> Vec<Signal>;
}

/// Invalid constructor parameters for a signal generator.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameters for {generator}: {reason}")]
pub struct ParamError {
    pub generator: &'static str,
    pub reason: String,
}

impl ParamError {
    pub(crate) fn new(generator: &'static str, reason: impl Into<String>) -> Self {
        Self {
            generator,
            reason: reason.into(),
        }
    }
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub(crate) fn require_window(
    generator: &'static str,
    name: &str,
    value: usize,
) -> Result<(), ParamError> {
    if value == 0 {
        return Err(ParamError::new(generator, format!("{name} must be >= 1")));
    }
    Ok(())
}

/// Compare two optional series bar by bar. Undefined on either side is neutral.
pub(crate) fn compare_series(lhs: &[Option<f64>], rhs: &[Option<f64>]) -> Vec<Signal> {
    lhs.iter()
        .zip(rhs)
        .map(|(l, r)| match (l, r) {
            (Some(l), Some(r)) => Signal::from_comparison(*l, *r),
            _ => Signal::Hold,
        })
        .collect()
}

/// Create synthetic bars from close prices for testing.
#[cfg(test)]
pub(crate) fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

//! Bollinger Bands mean-reversion signal.
//!
//! Center = SMA(close, window); half-width = num_std * sample stdev(close, window).
//! Buy when close < lower band, Sell when close > upper band.

use crate::domain::{Bar, Signal};
use crate::indicators::{rolling_mean, rolling_std};

use super::{closes, ParamError, SignalGenerator};

#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub window: usize,
    pub num_std: f64,
    name: String,
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Result<Self, ParamError> {
        if window < 2 {
            return Err(ParamError::new(
                "bollinger",
                format!("window must be >= 2 for a sample deviation, got {window}"),
            ));
        }
        if !(num_std.is_finite() && num_std > 0.0) {
            return Err(ParamError::new(
                "bollinger",
                format!("num_std must be positive and finite, got {num_std}"),
            ));
        }
        Ok(Self {
            window,
            num_std,
            name: format!("BB_{window}_{num_std}"),
        })
    }

    /// Lower and upper band per bar; `None` during warmup.
    pub fn bands(&self, bars: &[Bar]) -> Vec<Option<(f64, f64)>> {
        let closes = closes(bars);
        let center = rolling_mean(&closes, self.window);
        let stdev = rolling_std(&closes, self.window);
        center
            .into_iter()
            .zip(stdev)
            .map(|(c, s)| {
                let (c, s) = (c?, s?);
                Some((c - self.num_std * s, c + self.num_std * s))
            })
            .collect()
    }
}

impl SignalGenerator for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.window - 1
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        self.bands(bars)
            .into_iter()
            .zip(bars)
            .map(|(band, bar)| match band {
                Some((lower, _)) if bar.close < lower => Signal::Buy,
                Some((_, upper)) if bar.close > upper => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect()
    }
}

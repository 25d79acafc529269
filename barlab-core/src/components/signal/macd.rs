//! MACD signal — MACD line versus its signal line.
//!
//! MACD line = EMA(close, fast) - EMA(close, slow)
//! Signal line = EMA(MACD line, signal)
//! Buy while the MACD line is above the signal line, Sell while below.

use crate::domain::{Bar, Signal};
use crate::indicators::ewm_mean;

use super::{closes, require_window, ParamError, SignalGenerator};

#[derive(Debug, Clone)]
pub struct Macd {
    pub fast_span: usize,
    pub slow_span: usize,
    pub signal_span: usize,
    name: String,
}

impl Macd {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Result<Self, ParamError> {
        require_window("macd", "fast_span", fast_span)?;
        require_window("macd", "signal_span", signal_span)?;
        if slow_span <= fast_span {
            return Err(ParamError::new(
                "macd",
                format!("slow_span ({slow_span}) must be > fast_span ({fast_span})"),
            ));
        }
        Ok(Self {
            fast_span,
            slow_span,
            signal_span,
            name: format!("MACD_{fast_span}_{slow_span}_{signal_span}"),
        })
    }

    /// MACD line and signal line, one value per bar.
    pub fn lines(&self, bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
        let closes = closes(bars);
        let fast = ewm_mean(&closes, self.fast_span);
        let slow = ewm_mean(&closes, self.slow_span);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ewm_mean(&macd, self.signal_span);
        (macd, signal)
    }
}

impl SignalGenerator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    /// The exponential averages are defined from the first bar, but they only
    /// settle once the slow and signal spans have been filled.
    fn warmup_bars(&self) -> usize {
        self.slow_span + self.signal_span
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let (macd, signal) = self.lines(bars);
        macd.iter()
            .zip(&signal)
            .map(|(m, s)| Signal::from_comparison(*m, *s))
            .collect()
    }
}

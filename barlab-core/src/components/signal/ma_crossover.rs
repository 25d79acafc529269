//! Moving average cross signal — short SMA versus long SMA, bar by bar.
//!
//! Emits Buy on every bar where the short average is above the long average
//! and Sell on every bar where it is below. This is a level signal, not an
//! edge detector: the simulator ignores repeated Buys while already long.

use crate::domain::{Bar, Signal};
use crate::indicators::rolling_mean;

use super::{closes, compare_series, require_window, ParamError, SignalGenerator};

/// Dual simple-moving-average signal generator.
///
/// Equal averages are neutral. They do not carry the previous signal forward.
#[derive(Debug, Clone)]
pub struct MaCrossover {
    pub short_window: usize,
    pub long_window: usize,
    name: String,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, ParamError> {
        require_window("ma_crossover", "short_window", short_window)?;
        if long_window <= short_window {
            return Err(ParamError::new(
                "ma_crossover",
                format!("long_window ({long_window}) must be > short_window ({short_window})"),
            ));
        }
        Ok(Self {
            short_window,
            long_window,
            name: format!("MA_Cross_{short_window}_{long_window}"),
        })
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            name: "MA_Cross_20_50".into(),
        }
    }
}

impl SignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.long_window - 1
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = closes(bars);
        let short = rolling_mean(&closes, self.short_window);
        let long = rolling_mean(&closes, self.long_window);
        compare_series(&short, &long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signal::make_bars;

    #[test]
    fn rejects_inverted_windows() {
        assert!(MaCrossover::new(5, 5).is_err());
        assert!(MaCrossover::new(10, 5).is_err());
        assert!(MaCrossover::new(0, 5).is_err());
    }

    #[test]
    fn name_includes_windows() {
        assert_eq!(MaCrossover::new(20, 50).unwrap().name(), "MA_Cross_20_50");
        assert_eq!(MaCrossover::default().name(), "MA_Cross_20_50");
    }

    #[test]
    fn rising_series_buys_once_defined() {
        let signals = MaCrossover::new(2, 3)
            .unwrap()
            .generate(&make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]));
        assert_eq!(
            signals,
            vec![Signal::Hold, Signal::Hold, Signal::Buy, Signal::Buy, Signal::Buy]
        );
    }

    #[test]
    fn falling_series_sells() {
        let signals = MaCrossover::new(2, 3)
            .unwrap()
            .generate(&make_bars(&[14.0, 13.0, 12.0, 11.0]));
        assert_eq!(signals[2], Signal::Sell);
        assert_eq!(signals[3], Signal::Sell);
    }

    #[test]
    fn equal_averages_are_neutral_not_carried() {
        // Index 3: short mean(12,12)=12 > long mean(11,12,12) → Buy
        // Index 4 onward: both averages are 12 → Hold
        let signals = MaCrossover::new(2, 3)
            .unwrap()
            .generate(&make_bars(&[10.0, 11.0, 12.0, 12.0, 12.0, 12.0]));
        assert_eq!(signals[3], Signal::Buy);
        assert_eq!(signals[4], Signal::Hold);
        assert_eq!(signals[5], Signal::Hold);
    }

    #[test]
    fn warmup_is_long_window_minus_one() {
        assert_eq!(MaCrossover::new(20, 50).unwrap().warmup_bars(), 49);
    }
}

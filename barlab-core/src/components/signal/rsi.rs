//! RSI mean-reversion signal — buy oversold, sell overbought.

use crate::domain::{Bar, Signal};
use crate::indicators::rolling_rsi;

use super::{closes, require_window, ParamError, SignalGenerator};

/// RSI threshold signal generator.
///
/// Buy when RSI < `oversold`, Sell when RSI > `overbought`, Hold otherwise.
/// Bars where the RSI is undefined (incomplete window, or no losses in the
/// window) are neutral.
#[derive(Debug, Clone)]
pub struct RsiReversion {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    name: String,
}

impl RsiReversion {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, ParamError> {
        require_window("rsi", "period", period)?;
        if !(0.0..=100.0).contains(&oversold)
            || !(0.0..=100.0).contains(&overbought)
            || oversold >= overbought
        {
            return Err(ParamError::new(
                "rsi",
                format!(
                    "thresholds must satisfy 0 <= oversold < overbought <= 100, got {oversold} / {overbought}"
                ),
            ));
        }
        Ok(Self {
            period,
            oversold,
            overbought,
            name: format!("RSI_{period}_{oversold}_{overbought}"),
        })
    }
}

impl SignalGenerator for RsiReversion {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.period
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        rolling_rsi(&closes(bars), self.period)
            .into_iter()
            .map(|rsi| match rsi {
                Some(v) if v < self.oversold => Signal::Buy,
                Some(v) if v > self.overbought => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signal::make_bars;

    #[test]
    fn name_formats_thresholds() {
        assert_eq!(RsiReversion::new(14, 30.0, 70.0).unwrap().name(), "RSI_14_30_70");
    }

    #[test]
    fn rejects_crossed_thresholds() {
        assert!(RsiReversion::new(14, 70.0, 30.0).is_err());
        assert!(RsiReversion::new(0, 30.0, 70.0).is_err());
        assert!(RsiReversion::new(14, -1.0, 70.0).is_err());
    }

    #[test]
    fn steady_decline_is_oversold() {
        let signals = RsiReversion::new(3, 30.0, 70.0)
            .unwrap()
            .generate(&make_bars(&[10.0, 9.0, 8.0, 7.0, 6.0]));
        assert_eq!(&signals[..3], &[Signal::Hold; 3]);
        assert_eq!(signals[3], Signal::Buy);
        assert_eq!(signals[4], Signal::Buy);
    }

    #[test]
    fn pure_gains_are_neutral() {
        // No losses in the window → RSI undefined → Hold
        let signals = RsiReversion::new(3, 30.0, 70.0)
            .unwrap()
            .generate(&make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]));
        assert!(signals.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn strong_rally_with_small_dip_is_overbought() {
        // Changes: +5, +5, -1 → gain 10/3, loss 1/3 → RSI = 100 - 100/11 ≈ 90.9
        let signals = RsiReversion::new(3, 30.0, 70.0)
            .unwrap()
            .generate(&make_bars(&[10.0, 15.0, 20.0, 19.0]));
        assert_eq!(signals[3], Signal::Sell);
    }
}

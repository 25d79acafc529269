//! Volume-confirmed moving average cross.
//!
//! Entry needs two conditions at once: short SMA above long SMA AND volume
//! above its own rolling mean. Exit needs only the short SMA below the long.

use crate::domain::{Bar, Signal};
use crate::indicators::rolling_mean;

use super::{closes, require_window, ParamError, SignalGenerator};

#[derive(Debug, Clone)]
pub struct VolumeMaCrossover {
    pub short_window: usize,
    pub long_window: usize,
    pub volume_window: usize,
    name: String,
}

impl VolumeMaCrossover {
    pub fn new(
        short_window: usize,
        long_window: usize,
        volume_window: usize,
    ) -> Result<Self, ParamError> {
        require_window("volume_ma_crossover", "short_window", short_window)?;
        require_window("volume_ma_crossover", "volume_window", volume_window)?;
        if long_window <= short_window {
            return Err(ParamError::new(
                "volume_ma_crossover",
                format!("long_window ({long_window}) must be > short_window ({short_window})"),
            ));
        }
        Ok(Self {
            short_window,
            long_window,
            volume_window,
            name: format!("DualMA_Vol_{short_window}_{long_window}"),
        })
    }
}

impl SignalGenerator for VolumeMaCrossover {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_bars(&self) -> usize {
        self.long_window.max(self.volume_window) - 1
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = closes(bars);
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let short = rolling_mean(&closes, self.short_window);
        let long = rolling_mean(&closes, self.long_window);
        let volume_mean = rolling_mean(&volumes, self.volume_window);

        (0..bars.len())
            .map(|i| {
                let (Some(s), Some(l)) = (short[i], long[i]) else {
                    return Signal::Hold;
                };
                let volume_confirms = volume_mean[i].is_some_and(|avg| volumes[i] > avg);
                if s > l && volume_confirms {
                    Signal::Buy
                } else if s < l {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::signal::make_bars;

    fn with_volumes(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
        let mut bars = make_bars(closes);
        for (bar, v) in bars.iter_mut().zip(volumes) {
            bar.volume = *v;
        }
        bars
    }

    #[test]
    fn rally_without_volume_is_neutral() {
        let bars = with_volumes(&[10.0, 11.0, 12.0, 13.0], &[1000, 1000, 1000, 1000]);
        let signals = VolumeMaCrossover::new(2, 3, 2).unwrap().generate(&bars);
        assert!(signals.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn rally_on_rising_volume_buys() {
        let bars = with_volumes(&[10.0, 11.0, 12.0, 13.0], &[1000, 1000, 2000, 1000]);
        let signals = VolumeMaCrossover::new(2, 3, 2).unwrap().generate(&bars);
        assert_eq!(signals[2], Signal::Buy);
        assert_eq!(signals[3], Signal::Hold);
    }

    #[test]
    fn decline_sells_regardless_of_volume() {
        let bars = with_volumes(&[13.0, 12.0, 11.0], &[1000, 1000, 10]);
        let signals = VolumeMaCrossover::new(2, 3, 2).unwrap().generate(&bars);
        assert_eq!(signals[2], Signal::Sell);
    }

    #[test]
    fn name_and_warmup() {
        let generator = VolumeMaCrossover::new(10, 30, 40).unwrap();
        assert_eq!(generator.name(), "DualMA_Vol_10_30");
        assert_eq!(generator.warmup_bars(), 39);
    }
}

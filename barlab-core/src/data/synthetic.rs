//! Synthetic market data — a seeded geometric random walk for offline runs.
//!
//! Every calendar day in the range gets a bar. The path for a given
//! `(seed, symbol)` is fixed: the walk always starts at `start_date` of the
//! generator, so requesting a sub-range returns a slice of the same path.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::provider::{finalize_bars, DataError, DataProvider};
use crate::domain::Bar;

/// Parameters of the random walk.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProvider {
    pub seed: u64,
    /// Mean daily log-return.
    pub drift: f64,
    /// Standard deviation of the daily log-return.
    pub volatility: f64,
    pub start_price: f64,
    /// First day of the path. Requests before it are clipped.
    pub origin: NaiveDate,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            drift: 0.001,
            volatility: 0.02,
            start_price: 100.0,
            origin: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        }
    }

    pub fn with_origin(mut self, origin: NaiveDate) -> Self {
        self.origin = origin;
        self
    }

    /// Deterministic RNG seed from the provider seed and the symbol name.
    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Generate the path from `origin` through `end` inclusive.
    pub fn generate(&self, symbol: &str, end: NaiveDate) -> Result<Vec<Bar>, DataError> {
        let returns = Normal::new(self.drift, self.volatility)
            .map_err(|e| DataError::MalformedInput(format!("synthetic volatility: {e}")))?;
        let open_noise = Normal::<f64>::new(0.0, 0.001)
            .map_err(|e| DataError::MalformedInput(e.to_string()))?;
        let range_noise = Normal::<f64>::new(0.0, 0.01)
            .map_err(|e| DataError::MalformedInput(e.to_string()))?;

        let mut rng = self.rng_for(symbol);
        let mut bars = Vec::new();
        let mut log_price = self.start_price.ln();
        let mut current = self.origin;

        while current <= end {
            log_price += returns.sample(&mut rng);
            let close = log_price.exp();
            let open = close * (1.0 + open_noise.sample(&mut rng));
            let high = close.max(open) * (1.0 + range_noise.sample(&mut rng).abs());
            let low = close.min(open) * (1.0 - range_noise.sample(&mut rng).abs());
            let volume = rng.gen_range(1_000_000..10_000_000u64);

            bars.push(Bar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });
            current += chrono::Duration::days(1);
        }
        Ok(bars)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        if end < self.origin {
            return Err(DataError::unavailable(
                symbol,
                format!("synthetic data starts at {}", self.origin),
            ));
        }
        tracing::warn!(symbol, seed = self.seed, "using synthetic market data");
        let bars = self.generate(symbol, end)?;
        finalize_bars(symbol, bars, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_seed_same_path() {
        let a = SyntheticProvider::new(42).fetch("SPY", d(2023, 1, 1), d(2023, 3, 1)).unwrap();
        let b = SyntheticProvider::new(42).fetch("SPY", d(2023, 1, 1), d(2023, 3, 1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_and_symbol_change_path() {
        let provider = SyntheticProvider::new(42);
        let spy = provider.fetch("SPY", d(2023, 1, 1), d(2023, 1, 31)).unwrap();
        let qqq = provider.fetch("QQQ", d(2023, 1, 1), d(2023, 1, 31)).unwrap();
        let other = SyntheticProvider::new(7).fetch("SPY", d(2023, 1, 1), d(2023, 1, 31)).unwrap();
        assert_ne!(spy, qqq);
        assert_ne!(spy, other);
    }

    #[test]
    fn every_calendar_day_is_present() {
        let bars = SyntheticProvider::new(1).fetch("X", d(2024, 2, 1), d(2024, 2, 29)).unwrap();
        assert_eq!(bars.len(), 29);
        assert!(bars.windows(2).all(|w| w[1].date - w[0].date == chrono::Duration::days(1)));
    }

    #[test]
    fn sub_range_is_slice_of_full_path() {
        let provider = SyntheticProvider::new(3);
        let full = provider.fetch("X", d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        let part = provider.fetch("X", d(2024, 1, 10), d(2024, 1, 20)).unwrap();
        assert_eq!(part.as_slice(), &full[9..20]);
    }

    #[test]
    fn bars_are_sane() {
        let bars = SyntheticProvider::new(9).fetch("X", d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        for bar in &bars {
            assert!(bar.is_sane(), "{bar:?}");
            assert!((1_000_000..10_000_000).contains(&bar.volume));
        }
    }

    #[test]
    fn range_before_origin_is_unavailable() {
        let provider = SyntheticProvider::new(1).with_origin(d(2024, 1, 1));
        let err = provider.fetch("X", d(2023, 1, 1), d(2023, 6, 1)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }
}

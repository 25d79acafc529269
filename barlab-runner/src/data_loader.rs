//! Data loading with lookback extension.
//!
//! A strategy needs `warmup_bars` bars of history before its first meaningful
//! signal. The loader requests that history (converted to calendar days) ahead
//! of the nominal start, so indicator windows are already filled on the first
//! simulated bar.
//!
//! The returned bars still include the history; `first_in_range` marks the
//! first bar the simulator should see.

use chrono::NaiveDate;

use barlab_core::data::{CsvProvider, DataError, DataProvider, SyntheticProvider};
use barlab_core::domain::{validate_series, Bar};
use barlab_core::fingerprint::dataset_hash;

use crate::config::DataSection;

/// Bars covering `[start - lookback, end]` for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBars {
    pub symbol: String,
    pub bars: Vec<Bar>,
    /// Index of the first bar dated on or after the requested start.
    pub first_in_range: usize,
    /// BLAKE3 over every loaded bar, history included.
    pub dataset_hash: String,
}

impl LoadedBars {
    /// Wrap bars that were obtained elsewhere, splitting at `start`.
    ///
    /// Bars are sorted by date and bars after `end` are dropped. Returns
    /// `MalformedInput` for duplicate dates or a non-positive close, and
    /// `DataUnavailable` when no bar falls inside `[start, end]`.
    pub fn from_bars(
        symbol: &str,
        mut bars: Vec<Bar>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, DataError> {
        bars.retain(|b| b.date <= end);
        bars.sort_by_key(|b| b.date);
        validate_series(&bars).map_err(|e| DataError::MalformedInput(format!("{symbol}: {e}")))?;
        let first_in_range = bars.partition_point(|b| b.date < start);
        if first_in_range == bars.len() {
            return Err(DataError::unavailable(
                symbol,
                format!("no bars between {start} and {end}"),
            ));
        }
        let dataset_hash = dataset_hash(&bars);
        Ok(Self {
            symbol: symbol.to_string(),
            bars,
            first_in_range,
            dataset_hash,
        })
    }

    /// Bars inside the requested range.
    pub fn in_range(&self) -> &[Bar] {
        &self.bars[self.first_in_range..]
    }

    /// History bars loaded ahead of the requested start.
    pub fn history_len(&self) -> usize {
        self.first_in_range
    }
}

/// Calendar days of history to request for `warmup_bars` trading bars.
///
/// Daily equity data has roughly 252 sessions per 365 days, plus holidays.
/// The factor 1.5 and the extra week cover both.
pub fn lookback_calendar_days(warmup_bars: usize) -> i64 {
    if warmup_bars == 0 {
        return 0;
    }
    (warmup_bars as f64 * 1.5).ceil() as i64 + 7
}

/// Fetch `[start, end]` plus enough earlier history for `warmup_bars`.
pub fn load_with_lookback(
    provider: &dyn DataProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    warmup_bars: usize,
) -> Result<LoadedBars, DataError> {
    let extended_start = start - chrono::Duration::days(lookback_calendar_days(warmup_bars));
    tracing::debug!(
        provider = provider.name(),
        symbol,
        %extended_start,
        %end,
        warmup_bars,
        "fetching bars"
    );
    let bars = provider.fetch(symbol, extended_start, end)?;
    let loaded = LoadedBars::from_bars(symbol, bars, start, end)?;
    if loaded.history_len() < warmup_bars {
        tracing::warn!(
            symbol,
            history = loaded.history_len(),
            warmup_bars,
            "less history than the strategy's lookback; early signals stay neutral"
        );
    }
    Ok(loaded)
}

/// Build the provider a `[data]` section describes.
pub fn provider_for(section: &DataSection) -> Box<dyn DataProvider> {
    match section {
        DataSection::Csv { path } => Box::new(CsvProvider::new(path.clone())),
        DataSection::Synthetic { seed } => Box::new(SyntheticProvider::new(*seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::data::MemoryProvider;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn daily_bars(from: NaiveDate, n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| Bar {
                date: from + chrono::Duration::days(i as i64),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0 + i as f64,
                volume: 10,
            })
            .collect()
    }

    #[test]
    fn lookback_days_cover_warmup() {
        assert_eq!(lookback_calendar_days(0), 0);
        assert_eq!(lookback_calendar_days(49), 81);
        assert!(lookback_calendar_days(200) as usize >= 200);
    }

    #[test]
    fn loads_history_before_start() {
        let provider = MemoryProvider::new().with_series("SPY", daily_bars(d(2023, 1, 1), 365));
        let loaded = load_with_lookback(&provider, "SPY", d(2023, 6, 1), d(2023, 6, 30), 10).unwrap();
        assert_eq!(loaded.history_len(), 22);
        assert_eq!(loaded.in_range().len(), 30);
        assert_eq!(loaded.in_range()[0].date, d(2023, 6, 1));
        assert_eq!(loaded.bars.last().unwrap().date, d(2023, 6, 30));
    }

    #[test]
    fn short_history_still_loads() {
        let provider = MemoryProvider::new().with_series("SPY", daily_bars(d(2023, 6, 1), 30));
        let loaded = load_with_lookback(&provider, "SPY", d(2023, 6, 1), d(2023, 6, 30), 50).unwrap();
        assert_eq!(loaded.history_len(), 0);
        assert_eq!(loaded.in_range().len(), 30);
    }

    #[test]
    fn only_history_is_unavailable() {
        let bars = daily_bars(d(2023, 1, 1), 10);
        let err = LoadedBars::from_bars("SPY", bars, d(2023, 2, 1), d(2023, 2, 28)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn unsorted_bars_are_sorted_before_splitting() {
        let mut bars = daily_bars(d(2023, 1, 1), 10);
        bars.reverse();
        let loaded = LoadedBars::from_bars("SPY", bars, d(2023, 1, 6), d(2023, 1, 10)).unwrap();
        assert_eq!(loaded.history_len(), 5);
        assert_eq!(loaded.in_range().len(), 5);
        assert_eq!(loaded.in_range()[0].date, d(2023, 1, 6));
        assert!(loaded.bars.windows(2).all(|w| w[0].date < w[1].date));
        let sorted =
            LoadedBars::from_bars("SPY", daily_bars(d(2023, 1, 1), 10), d(2023, 1, 6), d(2023, 1, 10))
                .unwrap();
        assert_eq!(loaded.dataset_hash, sorted.dataset_hash);
    }

    #[test]
    fn duplicate_dates_are_malformed() {
        let mut bars = daily_bars(d(2023, 1, 1), 5);
        bars.push(bars[2].clone());
        let err = LoadedBars::from_bars("SPY", bars, d(2023, 1, 1), d(2023, 1, 5)).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput(_)));
    }

    #[test]
    fn bad_close_in_history_is_malformed() {
        let mut bars = daily_bars(d(2023, 1, 1), 10);
        bars[1].close = 0.0;
        let err = LoadedBars::from_bars("SPY", bars, d(2023, 1, 6), d(2023, 1, 10)).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput(_)));
    }

    #[test]
    fn provider_for_matches_section() {
        assert_eq!(provider_for(&DataSection::default()).name(), "synthetic");
        let csv = DataSection::Csv {
            path: "prices.csv".into(),
        };
        assert_eq!(provider_for(&csv).name(), "csv");
    }
}

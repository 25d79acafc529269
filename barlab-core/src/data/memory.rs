//! In-memory provider for caller-supplied bars.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{finalize_bars, DataError, DataProvider};
use crate::domain::Bar;

/// Serves bars that were loaded or built elsewhere, keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    series: HashMap<String, Vec<Bar>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of one symbol's bars.
    pub fn with_series(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.insert(symbol, bars);
        self
    }

    pub fn insert(&mut self, symbol: impl Into<String>, bars: Vec<Bar>) {
        self.series.insert(symbol.into(), bars);
    }
}

impl DataProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let bars = self
            .series
            .get(symbol)
            .ok_or_else(|| DataError::unavailable(symbol, "unknown symbol"))?;
        finalize_bars(symbol, bars.clone(), start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn bars() -> Vec<Bar> {
        (1..=5)
            .map(|day| Bar {
                date: d(day),
                open: 10.0,
                high: 10.0,
                low: 10.0,
                close: 10.0 + day as f64,
                volume: 100,
            })
            .collect()
    }

    #[test]
    fn fetch_returns_requested_slice() {
        let provider = MemoryProvider::new().with_series("ABC", bars());
        let out = provider.fetch("ABC", d(2), d(4)).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].date, d(2));
    }

    #[test]
    fn unknown_symbol_is_unavailable() {
        let provider = MemoryProvider::new().with_series("ABC", bars());
        let err = provider.fetch("XYZ", d(1), d(5)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }
}

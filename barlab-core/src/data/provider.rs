//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (CSV import, in-memory
//! bars, synthetic random walks) so runs can swap implementations and tests can
//! stay offline.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{validate_series, Bar};

/// Structured error types for data operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The provider has nothing for this symbol and range. Not retried.
    #[error("no data available for '{symbol}': {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Custom input is missing a required field or cannot be parsed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl DataError {
    pub fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        DataError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// Trait for market data providers.
///
/// `fetch` returns bars dated within `[start, end]` inclusive, ordered strictly
/// by date. An empty result is `DataError::DataUnavailable`, never `Ok(vec![])`.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Bar>, DataError>;
}

/// Keep bars inside `[start, end]`, sort them, and check the series invariants.
///
/// Shared tail of every provider's `fetch`.
pub(crate) fn finalize_bars(
    symbol: &str,
    mut bars: Vec<Bar>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Bar>, DataError> {
    bars.retain(|b| b.date >= start && b.date <= end);
    if bars.is_empty() {
        return Err(DataError::unavailable(
            symbol,
            format!("no bars between {start} and {end}"),
        ));
    }
    bars.sort_by_key(|b| b.date);
    validate_series(&bars).map_err(|e| DataError::MalformedInput(format!("{symbol}: {e}")))?;
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn finalize_filters_and_sorts() {
        let bars = vec![bar(5, 3.0), bar(2, 1.0), bar(3, 2.0), bar(9, 4.0)];
        let out = finalize_bars("SPY", bars, d(2), d(5)).unwrap();
        let dates: Vec<NaiveDate> = out.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2), d(3), d(5)]);
    }

    #[test]
    fn finalize_empty_range_is_unavailable() {
        let err = finalize_bars("SPY", vec![bar(2, 1.0)], d(10), d(20)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
        assert!(err.to_string().contains("SPY"));
    }

    #[test]
    fn finalize_duplicate_dates_are_malformed() {
        let err = finalize_bars("SPY", vec![bar(2, 1.0), bar(2, 1.5)], d(1), d(3)).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput(_)));
    }
}

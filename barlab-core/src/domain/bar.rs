//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single trading period.
///
/// Bars are loaded once and treated as read-only. A bar sequence handed to the
/// engine is ordered strictly by date with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any price field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Structural problems in a bar sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {index} ({date}) has a non-finite or non-positive close: {close}")]
    InvalidClose {
        index: usize,
        date: NaiveDate,
        close: f64,
    },

    #[error("bar {index} ({date}) is not after the previous bar ({previous})")]
    OutOfOrder {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Check the ordering and price invariants the engine relies on.
///
/// Only the close is required to be valid: it is the only price the engine
/// executes at and marks to market with.
pub fn validate_series(bars: &[Bar]) -> Result<(), BarError> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(BarError::InvalidClose {
                index,
                date: bar.date,
                close: bar.close,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].date;
            if bar.date <= previous {
                return Err(BarError::OutOfOrder {
                    index,
                    date: bar.date,
                    previous,
                });
            }
        }
    }
    Ok(())
}

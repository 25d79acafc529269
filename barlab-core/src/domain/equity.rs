//! Mark-to-market equity observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Equity at the close of one bar: cash plus open shares valued at the close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Extract the equity values from a curve, dropping the dates.
pub fn equity_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.equity).collect()
}

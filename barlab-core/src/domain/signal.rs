//! Per-bar trading signal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Trading instruction for one bar: sell (−1), hold (0) or buy (+1).
///
/// Serialized as the bare integer so signal streams stay compact in JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Sell,
    #[default]
    Hold,
    Buy,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }

    /// Buy when `lhs > rhs`, sell when `lhs < rhs`, hold on ties or NaN.
    pub fn from_comparison(lhs: f64, rhs: f64) -> Self {
        match lhs.partial_cmp(&rhs) {
            Some(Ordering::Greater) => Signal::Buy,
            Some(Ordering::Less) => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(format!("signal must be -1, 0 or 1, got {other}")),
        }
    }
}

//! Trade — one BUY or SELL execution in the trade log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeKind {
    Buy,
    Sell,
}

/// A single execution, appended to the trade log in bar order and never mutated.
///
/// `amount` is the total cash out for a BUY (notional plus commission) and the
/// net cash in for a SELL (notional minus commission). `pnl` and `pnl_pct` are
/// only present on SELL trades and are measured against the BUY that opened
/// the lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub kind: TradeKind,
    /// Execution price after slippage.
    pub price: f64,
    pub shares: u64,
    pub amount: f64,
    pub commission: f64,
    pub capital_after: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl_pct: Option<f64>,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.kind == TradeKind::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.kind == TradeKind::Sell
    }

    /// Total cash paid, for BUY trades.
    pub fn cost(&self) -> Option<f64> {
        self.is_buy().then_some(self.amount)
    }

    /// Net cash received, for SELL trades.
    pub fn revenue(&self) -> Option<f64> {
        self.is_sell().then_some(self.amount)
    }

    /// A completed round-trip that made money. BUY trades are never winners.
    pub fn is_winner(&self) -> bool {
        self.pnl.is_some_and(|pnl| pnl > 0.0)
    }
}

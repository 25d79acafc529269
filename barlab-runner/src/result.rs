//! Backtest result — the terminal snapshot of one strategy run.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use barlab_core::domain::{EquityPoint, Trade};

/// Current schema version for persisted results.
pub const SCHEMA_VERSION: u32 = 1;

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of a single backtest run. Built once, never mutated.
///
/// Ratios are stored as fractions (0.05 = 5%). They are only turned into
/// percentages when a report is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// BLAKE3 over strategy, settings and dataset.
    pub run_id: String,
    pub dataset_hash: String,
    pub strategy_name: String,
    pub symbol: String,
    /// Requested range. Lookback history before `start_date` is not included.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub trade_count: usize,
    pub win_rate: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

/// Scalar fields of a `BacktestResult`, without the curve and trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub strategy_name: String,
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub trade_count: usize,
    pub win_rate: f64,
}

impl BacktestResult {
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            strategy_name: self.strategy_name.clone(),
            symbol: self.symbol.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            initial_capital: self.initial_capital,
            final_capital: self.final_capital,
            total_return: self.total_return,
            annualized_return: self.annualized_return,
            max_drawdown: self.max_drawdown,
            sharpe_ratio: self.sharpe_ratio,
            trade_count: self.trade_count,
            win_rate: self.win_rate,
        }
    }

    /// A lot is still open after the last bar.
    pub fn has_open_position(&self) -> bool {
        self.trades.last().is_some_and(|t| t.is_buy())
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Backtest: {} on {} ===", self.strategy_name, self.symbol)?;
        writeln!(f, "Period:            {} to {}", self.start_date, self.end_date)?;
        writeln!(f, "Initial Capital:   ${:.2}", self.initial_capital)?;
        writeln!(f, "Final Capital:     ${:.2}", self.final_capital)?;
        writeln!(f, "Total Return:      {:.2}%", self.total_return * 100.0)?;
        writeln!(f, "Annualized Return: {:.2}%", self.annualized_return * 100.0)?;
        writeln!(f, "Max Drawdown:      {:.2}%", self.max_drawdown * 100.0)?;
        writeln!(f, "Sharpe Ratio:      {:.3}", self.sharpe_ratio)?;
        writeln!(f, "Trades:            {}", self.trade_count)?;
        write!(f, "Win Rate:          {:.1}%", self.win_rate * 100.0)
    }
}

impl fmt::Display for BacktestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        if self.has_open_position() {
            write!(f, "\n(position still open, valued at last close)")?;
        }
        Ok(())
    }
}

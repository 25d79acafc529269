//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade log in, scalar out.
//! Degenerate inputs (no trades, a single bar, zero-length runs, zero-variance
//! returns) resolve to 0.0 instead of NaN or infinity.

use serde::{Deserialize, Serialize};
use barlab_core::domain::{equity_values, EquityPoint, Trade};

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calendar days per year used to convert a date span into years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Annual risk-free rate subtracted in the Sharpe ratio.
pub const RISK_FREE_RATE: f64 = 0.02;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub final_capital: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub trade_count: usize,
    pub win_rate: f64,
}

impl PerformanceMetrics {
    /// Compute all metrics from an equity curve and trade log.
    ///
    /// An empty curve means nothing was simulated: final capital is the
    /// initial capital and every ratio is 0.
    pub fn compute(equity_curve: &[EquityPoint], trades: &[Trade], initial_capital: f64) -> Self {
        let values = equity_values(equity_curve);
        let final_capital = values.last().copied().unwrap_or(initial_capital);
        let total = total_return(final_capital, initial_capital);
        Self {
            final_capital,
            total_return: total,
            annualized_return: annualized_return(total, elapsed_years(equity_curve)),
            max_drawdown: max_drawdown(&values),
            sharpe_ratio: sharpe_ratio(&values, RISK_FREE_RATE),
            trade_count: trade_count(trades),
            win_rate: win_rate(trades),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(final_equity: f64, initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_equity - initial_capital) / initial_capital
}

/// Calendar span between the first and last equity point, in years.
pub fn elapsed_years(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days() as f64 / DAYS_PER_YEAR,
        _ => 0.0,
    }
}

/// Compound annual return: (1 + total)^(1/years) - 1.
///
/// Returns 0.0 for a zero-length run.
pub fn annualized_return(total_return: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    let growth = 1.0 + total_return;
    if growth < 0.0 {
        return -1.0;
    }
    growth.powf(1.0 / years) - 1.0
}

/// Drawdown from the running peak at every point (all values ≤ 0).
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity_curve
        .iter()
        .map(|&eq| {
            if eq > peak {
                peak = eq;
            }
            if peak > 0.0 {
                (eq - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

/// Maximum drawdown as a negative fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity is constant or monotonically increasing.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    drawdown_series(equity_curve)
        .into_iter()
        .fold(0.0_f64, f64::min)
}

/// Annualized Sharpe ratio from daily returns.
///
/// Sharpe = sqrt(252) * mean(daily returns - rf/252) / std(daily returns),
/// with the sample standard deviation. Returns 0.0 if there are fewer than 2
/// daily returns or their variance is zero.
pub fn sharpe_ratio(equity_curve: &[f64], risk_free_rate: f64) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    TRADING_DAYS_PER_YEAR.sqrt() * mean_f64(&excess) / std
}

/// Completed round-trips: the number of SELL trades.
pub fn trade_count(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.is_sell()).count()
}

/// Fraction of completed round-trips with positive PnL.
pub fn win_rate(trades: &[Trade]) -> f64 {
    let completed = trade_count(trades);
    if completed == 0 {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / completed as f64
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Compute daily returns from an equity curve. The first point is dropped.
pub fn daily_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                w[1] / w[0] - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

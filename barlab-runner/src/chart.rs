//! Chart series — the data a price/equity/drawdown chart needs, nothing rendered.
//!
//! Rendering is left to whatever consumes the JSON. A result is complete and
//! valid without ever building these series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use barlab_core::domain::{equity_values, Bar, Trade};

use crate::metrics::drawdown_series;
use crate::result::BacktestResult;

/// One dated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything needed to draw the three standard panels of a backtest chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    /// Close prices over the simulated range.
    pub prices: Vec<SeriesPoint>,
    /// Trade markers.
    pub trades: Vec<Trade>,
    pub equity: Vec<SeriesPoint>,
    /// Drawdown from the running equity peak, as a fraction (≤ 0).
    pub drawdown: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Build the series from a result and the bars it was simulated on.
    ///
    /// Bars outside the result's date range are skipped, so the loader's
    /// history bars can be passed in unchanged.
    pub fn from_result(result: &BacktestResult, bars: &[Bar]) -> Self {
        let prices = bars
            .iter()
            .filter(|b| b.date >= result.start_date && b.date <= result.end_date)
            .map(|b| SeriesPoint {
                date: b.date,
                value: b.close,
            })
            .collect();

        let drawdown = result
            .equity_curve
            .iter()
            .zip(drawdown_series(&equity_values(&result.equity_curve)))
            .map(|(p, dd)| SeriesPoint {
                date: p.date,
                value: dd,
            })
            .collect();

        Self {
            title: format!("{} - {}", result.symbol, result.strategy_name),
            prices,
            trades: result.trades.clone(),
            equity: result
                .equity_curve
                .iter()
                .map(|p| SeriesPoint {
                    date: p.date,
                    value: p.equity,
                })
                .collect(),
            drawdown,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

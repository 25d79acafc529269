//! Backtest runner — wires together data loading, signals, engine, and metrics.
//!
//! Entry points:
//! - `run_strategy()`: config → generator → `run_backtest()`. Used by the CLI and comparator.
//! - `run_backtest()`: loads data with lookback from a provider, then runs.
//! - `run_backtest_on_bars()`: takes caller-supplied bars, no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use barlab_core::components::{create_signal, FactoryError, SignalGenerator};
use barlab_core::data::{DataError, DataProvider};
use barlab_core::domain::Bar;
use barlab_core::engine::{run_simulation, EngineConfig, EngineError};
use barlab_core::fingerprint::{run_id, ComponentConfig};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_with_lookback, LoadedBars};
use crate::metrics::PerformanceMetrics;
use crate::result::{BacktestResult, SCHEMA_VERSION};

/// Errors from the runner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("strategy error: {0}")]
    Factory(#[from] FactoryError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Everything a run needs apart from the strategy and the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub engine: EngineConfig,
}

impl BacktestRequest {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate, engine: EngineConfig) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
            engine,
        }
    }

    pub fn from_config(config: &BacktestConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.backtest.symbol.clone(),
            config.start_date()?,
            config.end_date()?,
            config.engine_config(),
        ))
    }

    /// Canonical JSON of the request, fed into the run id.
    pub fn settings_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Build a generator from `strategy` and run it.
pub fn run_strategy(
    request: &BacktestRequest,
    strategy: &ComponentConfig,
    provider: &dyn DataProvider,
) -> Result<BacktestResult, RunError> {
    let generator = create_signal(strategy)?;
    run_backtest(request, generator.as_ref(), provider)
}

/// Load bars (with the generator's lookback) and run one backtest.
pub fn run_backtest(
    request: &BacktestRequest,
    generator: &dyn SignalGenerator,
    provider: &dyn DataProvider,
) -> Result<BacktestResult, RunError> {
    let loaded = load_with_lookback(
        provider,
        &request.symbol,
        request.start,
        request.end,
        generator.warmup_bars(),
    )?;
    run_loaded(request, generator, &loaded)
}

/// Run one backtest on caller-supplied bars without any I/O.
///
/// Bars dated before `request.start` are used as indicator history only.
/// Bars after `request.end` are ignored.
pub fn run_backtest_on_bars(
    request: &BacktestRequest,
    generator: &dyn SignalGenerator,
    bars: Vec<Bar>,
) -> Result<BacktestResult, RunError> {
    let loaded = LoadedBars::from_bars(&request.symbol, bars, request.start, request.end)?;
    run_loaded(request, generator, &loaded)
}

fn run_loaded(
    request: &BacktestRequest,
    generator: &dyn SignalGenerator,
    loaded: &LoadedBars,
) -> Result<BacktestResult, RunError> {
    let strategy_name = generator.name().to_string();
    tracing::info!(
        strategy = %strategy_name,
        symbol = %request.symbol,
        bars = loaded.in_range().len(),
        history = loaded.history_len(),
        "running backtest"
    );

    // Signals see the full history; the simulator only the requested range
    let signals = generator.generate(&loaded.bars);
    let in_range = loaded.in_range();
    let sim = run_simulation(in_range, &signals[loaded.first_in_range..], &request.engine)?;

    let metrics = PerformanceMetrics::compute(
        &sim.equity_curve,
        &sim.trades,
        request.engine.initial_capital,
    );

    tracing::info!(
        strategy = %strategy_name,
        total_return = metrics.total_return,
        trades = metrics.trade_count,
        "backtest finished"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: run_id(&strategy_name, &request.settings_key(), &loaded.dataset_hash),
        dataset_hash: loaded.dataset_hash.clone(),
        strategy_name,
        symbol: request.symbol.clone(),
        start_date: request.start,
        end_date: request.end,
        initial_capital: request.engine.initial_capital,
        final_capital: metrics.final_capital,
        total_return: metrics.total_return,
        annualized_return: metrics.annualized_return,
        max_drawdown: metrics.max_drawdown,
        sharpe_ratio: metrics.sharpe_ratio,
        trade_count: metrics.trade_count,
        win_rate: metrics.win_rate,
        equity_curve: sim.equity_curve,
        trades: sim.trades,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::components::signal::MaCrossover;
    use barlab_core::data::{MemoryProvider, SyntheticProvider};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rising_bars(from: NaiveDate, n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    date: from + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    #[test]
    fn history_fills_windows_before_start() {
        // 10 history bars, then the requested range
        let bars = rising_bars(d(2024, 1, 1), 30);
        let request = BacktestRequest::new("X", d(2024, 1, 11), d(2024, 1, 30), EngineConfig::default());
        let generator = MaCrossover::new(2, 3).unwrap();
        let result = run_backtest_on_bars(&request, &generator, bars).unwrap();

        assert_eq!(result.equity_curve.len(), 20);
        assert_eq!(result.equity_curve[0].date, d(2024, 1, 11));
        // Averages are already defined on the first simulated bar
        assert_eq!(result.trades[0].date, d(2024, 1, 11));
        assert_eq!(result.start_date, d(2024, 1, 11));
        assert_eq!(result.end_date, d(2024, 1, 30));
    }

    #[test]
    fn run_strategy_through_provider() {
        let provider = MemoryProvider::new().with_series("X", rising_bars(d(2024, 1, 1), 60));
        let request = BacktestRequest::new("X", d(2024, 2, 1), d(2024, 2, 29), EngineConfig::default());
        let strategy = ComponentConfig::new("ma_crossover")
            .with_param("short_window", 3.0)
            .with_param("long_window", 10.0);

        let result = run_strategy(&request, &strategy, &provider).unwrap();
        assert_eq!(result.strategy_name, "MA_Cross_3_10");
        assert_eq!(result.trade_count, 0);
        assert!(result.has_open_position());
        assert!(result.total_return > 0.0);
    }

    #[test]
    fn unknown_strategy_is_factory_error() {
        let provider = SyntheticProvider::new(1);
        let request = BacktestRequest::new("X", d(2024, 1, 1), d(2024, 3, 1), EngineConfig::default());
        let err = run_strategy(&request, &ComponentConfig::new("nope"), &provider).unwrap_err();
        assert!(matches!(err, RunError::Factory(_)));
    }

    #[test]
    fn missing_symbol_is_data_error() {
        let provider = MemoryProvider::new();
        let request = BacktestRequest::new("X", d(2024, 1, 1), d(2024, 3, 1), EngineConfig::default());
        let err = run_backtest(&request, &MaCrossover::default(), &provider).unwrap_err();
        assert!(matches!(err, RunError::Data(DataError::DataUnavailable { .. })));
    }

    #[test]
    fn run_id_is_deterministic_and_sensitive() {
        let provider = SyntheticProvider::new(7);
        let request = BacktestRequest::new("X", d(2024, 1, 1), d(2024, 6, 1), EngineConfig::default());
        let a = run_backtest(&request, &MaCrossover::new(5, 20).unwrap(), &provider).unwrap();
        let b = run_backtest(&request, &MaCrossover::new(5, 20).unwrap(), &provider).unwrap();
        let c = run_backtest(&request, &MaCrossover::new(5, 21).unwrap(), &provider).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.run_id, c.run_id);
    }

    #[test]
    fn invalid_engine_config_is_engine_error() {
        let bars = rising_bars(d(2024, 1, 1), 10);
        let request = BacktestRequest::new("X", d(2024, 1, 1), d(2024, 1, 10), EngineConfig::new(-1.0, 0.0, 0.0));
        let err = run_backtest_on_bars(&request, &MaCrossover::new(2, 3).unwrap(), bars).unwrap_err();
        assert!(matches!(err, RunError::Engine(EngineError::InvalidConfig(_))));
    }
}

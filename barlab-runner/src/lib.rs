//! BarLab Runner — backtest orchestration, metrics, comparison, and reporting.
//!
//! This crate builds on `barlab-core` to provide:
//! - TOML configuration for a backtest and its strategies
//! - Data loading with lookback history ahead of the requested start
//! - Single-backtest runner producing a `BacktestResult`
//! - Performance metrics (return, drawdown, Sharpe, win rate)
//! - Multi-strategy comparison with per-strategy failure isolation
//! - JSON, CSV, and Markdown export, plus chart-ready series

pub mod chart;
pub mod comparator;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod result;
pub mod runner;

pub use chart::{ChartSeries, SeriesPoint};
pub use comparator::{compare_strategies, CompareRequest, Comparison, StrategyOutcome};
pub use config::{BacktestConfig, BacktestSection, ConfigError, DataSection};
pub use data_loader::{load_with_lookback, provider_for, LoadedBars};
pub use metrics::PerformanceMetrics;
pub use result::{BacktestResult, ResultSummary, SCHEMA_VERSION};
pub use runner::{run_backtest, run_backtest_on_bars, run_strategy, BacktestRequest, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn performance_metrics_is_send_sync() {
        assert_send::<PerformanceMetrics>();
        assert_sync::<PerformanceMetrics>();
    }

    #[test]
    fn backtest_result_is_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
    }

    #[test]
    fn comparison_types_are_send_sync() {
        assert_send::<Comparison>();
        assert_sync::<Comparison>();
        assert_send::<StrategyOutcome>();
        assert_sync::<StrategyOutcome>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
        assert_send::<BacktestRequest>();
        assert_sync::<BacktestRequest>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
    }
}

//! Strategy comparison — one backtest per strategy over identical settings.
//!
//! Each strategy run is independent: a failure (unknown type, bad parameters,
//! missing data) becomes a `Failed` entry and the other runs still complete.
//! Entries always come back in the order the strategies were given, whether
//! the runs were sequential or spread over the rayon pool.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use barlab_core::components::create_signal;
use barlab_core::data::DataProvider;
use barlab_core::engine::EngineConfig;
use barlab_core::fingerprint::ComponentConfig;

use crate::config::{BacktestConfig, ConfigError};
use crate::result::BacktestResult;
use crate::runner::{run_backtest, BacktestRequest, RunError};

/// Shared settings for every strategy in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub engine: EngineConfig,
    /// Run strategies concurrently on the rayon pool.
    pub parallel: bool,
}

impl CompareRequest {
    pub fn from_config(config: &BacktestConfig, parallel: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            symbol: config.backtest.symbol.clone(),
            start: config.start_date()?,
            end: config.end_date()?,
            engine: config.engine_config(),
            parallel,
        })
    }

    pub fn backtest_request(&self) -> BacktestRequest {
        BacktestRequest::new(self.symbol.clone(), self.start, self.end, self.engine)
    }
}

/// One row of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrategyOutcome {
    Completed(Box<BacktestResult>),
    Failed { strategy_name: String, cause: String },
}

impl StrategyOutcome {
    pub fn strategy_name(&self) -> &str {
        match self {
            StrategyOutcome::Completed(result) => &result.strategy_name,
            StrategyOutcome::Failed { strategy_name, .. } => strategy_name,
        }
    }

    pub fn result(&self) -> Option<&BacktestResult> {
        match self {
            StrategyOutcome::Completed(result) => Some(result),
            StrategyOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StrategyOutcome::Failed { .. })
    }
}

/// Ordered outcomes of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub initial_capital: f64,
    pub entries: Vec<StrategyOutcome>,
}

impl Comparison {
    /// Completed results, in input order.
    pub fn completed(&self) -> impl Iterator<Item = &BacktestResult> {
        self.entries.iter().filter_map(StrategyOutcome::result)
    }

    /// Failed entries, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &StrategyOutcome> {
        self.entries.iter().filter(|e| e.is_failed())
    }

    /// Index into `entries` of the completed run with the highest total
    /// return. The first one wins ties.
    pub fn best_index(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.result().map(|r| (i, r.total_return)))
            .fold(None, |best: Option<(usize, f64)>, (i, ret)| match best {
                Some((_, b)) if b >= ret => best,
                _ => Some((i, ret)),
            })
            .map(|(i, _)| i)
    }

    /// Highest total return among completed runs. The first one wins ties.
    pub fn best_by_total_return(&self) -> Option<&BacktestResult> {
        self.best_index()
            .and_then(|i| self.entries.get(i))
            .and_then(StrategyOutcome::result)
    }
}

/// Label for a strategy whose generator could not be built.
fn fallback_name(strategy: &ComponentConfig) -> String {
    if strategy.params.is_empty() {
        return strategy.component_type.clone();
    }
    let params: Vec<String> = strategy
        .params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    format!("{}({})", strategy.component_type, params.join(", "))
}

fn failed(strategy_name: String, error: RunError) -> StrategyOutcome {
    tracing::warn!(strategy = %strategy_name, error = %error, "strategy run failed; skipping");
    StrategyOutcome::Failed {
        strategy_name,
        cause: error.to_string(),
    }
}

fn run_one(
    request: &BacktestRequest,
    strategy: &ComponentConfig,
    provider: &dyn DataProvider,
) -> StrategyOutcome {
    let generator = match create_signal(strategy) {
        Ok(generator) => generator,
        Err(e) => return failed(fallback_name(strategy), e.into()),
    };
    match run_backtest(request, generator.as_ref(), provider) {
        Ok(result) => StrategyOutcome::Completed(Box::new(result)),
        Err(e) => failed(generator.name().to_string(), e),
    }
}

/// Run every strategy over the same symbol, range, and costs.
pub fn compare_strategies(
    request: &CompareRequest,
    strategies: &[ComponentConfig],
    provider: &dyn DataProvider,
) -> Comparison {
    let backtest = request.backtest_request();
    tracing::info!(
        symbol = %request.symbol,
        strategies = strategies.len(),
        parallel = request.parallel,
        "comparing strategies"
    );

    let entries: Vec<StrategyOutcome> = if request.parallel {
        strategies
            .par_iter()
            .map(|strategy| run_one(&backtest, strategy, provider))
            .collect()
    } else {
        strategies
            .iter()
            .map(|strategy| run_one(&backtest, strategy, provider))
            .collect()
    };

    let comparison = Comparison {
        symbol: request.symbol.clone(),
        start: request.start,
        end: request.end,
        initial_capital: request.engine.initial_capital,
        entries,
    };
    tracing::info!(
        completed = comparison.completed().count(),
        failed = comparison.failures().count(),
        "comparison finished"
    );
    comparison
}

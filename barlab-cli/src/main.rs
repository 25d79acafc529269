//! BarLab CLI — run one strategy or compare several from a TOML config.
//!
//! Commands:
//! - `run` — backtest one strategy from the config and save its artifacts
//! - `compare` — backtest every strategy in the config and rank them
//! - `strategies` — list the signal types the config may name
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use barlab_core::components::SIGNAL_TYPES;
use barlab_core::data::DataProvider;
use barlab_runner::chart::ChartSeries;
use barlab_runner::export::{export_json, generate_comparison_table, save_artifacts, save_comparison};
use barlab_runner::{
    compare_strategies, provider_for, run_strategy, BacktestConfig, BacktestRequest,
    BacktestResult, CompareRequest,
};

#[derive(Parser)]
#[command(
    name = "barlab",
    version,
    about = "BarLab CLI — single-asset, long-only daily-bar backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one strategy from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Index into the config's `[[strategies]]` list.
        #[arg(long, default_value_t = 0)]
        strategy: usize,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write chart.json (prices, trades, equity, drawdown).
        #[arg(long, default_value_t = false)]
        chart: bool,

        /// Print the full result as JSON instead of the summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Backtest every strategy in a TOML config file and compare them.
    Compare {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Run strategies concurrently.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Output directory for comparison.json and comparison.md.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// List the available signal types.
    Strategies,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            strategy,
            output_dir,
            chart,
            json,
        } => run_cmd(&config, strategy, &output_dir, chart, json),
        Commands::Compare {
            config,
            parallel,
            output_dir,
        } => compare_cmd(&config, parallel, &output_dir),
        Commands::Strategies => {
            for name in SIGNAL_TYPES {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<BacktestConfig> {
    let config = BacktestConfig::from_file(path)?;
    tracing::info!(
        path = %path.display(),
        symbol = %config.backtest.symbol,
        strategies = config.strategies.len(),
        "config loaded"
    );
    Ok(config)
}

fn run_cmd(
    config_path: &Path,
    index: usize,
    output_dir: &Path,
    chart: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let Some(strategy) = config.strategies.get(index) else {
        bail!(
            "--strategy {index} is out of range: the config lists {} strategies",
            config.strategies.len()
        );
    };

    let provider = provider_for(&config.data);
    let request = BacktestRequest::from_config(&config)?;
    let result = run_strategy(&request, strategy, provider.as_ref())?;

    if json {
        println!("{}", export_json(&result)?);
    } else {
        print_summary(&result, provider.name());
    }

    let run_dir = save_artifacts(&result, output_dir)?;
    if chart {
        write_chart(&result, provider.as_ref(), &run_dir)?;
    }
    eprintln!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn compare_cmd(config_path: &Path, parallel: bool, output_dir: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = provider_for(&config.data);
    let request = CompareRequest::from_config(&config, parallel)?;

    let comparison = compare_strategies(&request, &config.strategies, provider.as_ref());
    println!("{}", generate_comparison_table(&comparison));

    let out = save_comparison(&comparison, output_dir)?;
    eprintln!("Comparison saved to: {}", out.display());

    if comparison.completed().next().is_none() {
        bail!("every strategy failed");
    }
    Ok(())
}

fn write_chart(result: &BacktestResult, provider: &dyn DataProvider, run_dir: &Path) -> Result<()> {
    let bars = provider
        .fetch(&result.symbol, result.start_date, result.end_date)
        .context("failed to reload bars for the chart")?;
    let series = ChartSeries::from_result(result, &bars);
    std::fs::write(run_dir.join("chart.json"), series.to_json()?)
        .with_context(|| format!("failed to write chart.json in {}", run_dir.display()))?;
    Ok(())
}

fn print_summary(result: &BacktestResult, source: &str) {
    println!();
    println!("{result}");
    println!("Data Source:       {source}");
    if source == "synthetic" {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!("Run Id:            {}", result.run_id);
}

//! Reporting and export — JSON, CSV, and Markdown artifacts.
//!
//! Three formats:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade log and equity curve, floats written at full precision
//! - **Markdown**: a single-run report and a multi-strategy comparison table
//!
//! Persisted JSON carries `schema_version`; versions newer than this build
//! understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use barlab_core::domain::{EquityPoint, Trade};

use crate::comparator::{Comparison, StrategyOutcome};
use crate::result::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Export the trade log as CSV.
///
/// Columns: date, kind, price, shares, amount, commission, capital_after,
/// pnl, pnl_pct. `pnl` and `pnl_pct` are blank on BUY rows.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "date",
        "kind",
        "price",
        "shares",
        "amount",
        "commission",
        "capital_after",
        "pnl",
        "pnl_pct",
    ])?;

    for t in trades {
        let kind = if t.is_buy() { "BUY" } else { "SELL" };
        wtr.write_record([
            t.date.to_string(),
            kind.to_string(),
            t.price.to_string(),
            t.shares.to_string(),
            t.amount.to_string(),
            t.commission.to_string(),
            t.capital_after.to_string(),
            opt(t.pnl),
            opt(t.pnl_pct),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the equity curve as CSV with date and equity columns.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity"])?;
    for p in equity_curve {
        wtr.write_record([p.date.to_string(), p.equity.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Directory name for a run's artifacts: symbol, strategy, and run id prefix.
pub fn artifact_dir_name(result: &BacktestResult) -> String {
    let id = result.run_id.get(..12).unwrap_or(result.run_id.as_str());
    format!("{}_{}_{}", result.symbol, result.strategy_name, id)
}

/// Save the full artifact set for a single backtest run.
///
/// Creates `{symbol}_{strategy}_{run_id prefix}/` under `output_dir` with:
/// - `manifest.json`: the full `BacktestResult`
/// - `trades.csv`: the trade log
/// - `equity.csv`: per-bar equity
/// - `report.md`: the Markdown report
///
/// Identical runs land in the same directory. Returns its path.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(artifact_dir_name(result));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&result.equity_curve)?,
    )?;
    std::fs::write(run_dir.join("report.md"), generate_report(result))?;

    tracing::debug!(dir = %run_dir.display(), "artifacts written");
    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's manifest.json.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

/// Save a comparison as `comparison.json` and `comparison.md` under `output_dir`.
pub fn save_comparison(comparison: &Comparison, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let json = serde_json::to_string_pretty(comparison)
        .context("failed to serialize Comparison to JSON")?;
    std::fs::write(output_dir.join("comparison.json"), json)?;
    std::fs::write(
        output_dir.join("comparison.md"),
        generate_comparison_table(comparison),
    )?;
    Ok(output_dir.to_path_buf())
}

// ─── Markdown reports ───────────────────────────────────────────────

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

/// Generate a Markdown report for a single backtest run.
pub fn generate_report(result: &BacktestResult) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str(&format!("# Backtest Report: {}\n\n", result.strategy_name));

    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", result.symbol));
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        result.start_date, result.end_date
    ));
    md.push_str(&format!(
        "| Initial Capital | ${:.2} |\n",
        result.initial_capital
    ));
    md.push_str(&format!("| Bars | {} |\n", result.equity_curve.len()));
    md.push_str(&format!("| Run Id | {} |\n", result.run_id));
    md.push_str(&format!("| Dataset Hash | {} |\n", result.dataset_hash));
    md.push('\n');

    md.push_str("## Performance\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | ---: |\n");
    md.push_str(&format!("| Final Capital | ${:.2} |\n", result.final_capital));
    md.push_str(&format!("| Total Return | {} |\n", pct(result.total_return)));
    md.push_str(&format!(
        "| Annualized Return | {} |\n",
        pct(result.annualized_return)
    ));
    md.push_str(&format!("| Max Drawdown | {} |\n", pct(result.max_drawdown)));
    md.push_str(&format!("| Sharpe Ratio | {:.3} |\n", result.sharpe_ratio));
    md.push_str(&format!("| Trades | {} |\n", result.trade_count));
    md.push_str(&format!("| Win Rate | {:.1}% |\n", result.win_rate * 100.0));
    md.push('\n');

    md.push_str("## Trades\n\n");
    if result.trades.is_empty() {
        md.push_str("No trades.\n");
    } else {
        md.push_str("| Date | Side | Price | Shares | Amount | PnL |\n");
        md.push_str("| --- | --- | ---: | ---: | ---: | ---: |\n");
        for t in &result.trades {
            let side = if t.is_buy() { "BUY" } else { "SELL" };
            let pnl = t.pnl.map(|p| format!("{p:.2}")).unwrap_or_else(|| "-".into());
            md.push_str(&format!(
                "| {} | {} | {:.2} | {} | {:.2} | {} |\n",
                t.date, side, t.price, t.shares, t.amount, pnl
            ));
        }
        if result.has_open_position() {
            md.push_str("\nPosition still open at the end of the range, valued at the last close.\n");
        }
    }

    md
}

/// Generate a Markdown table with one row per strategy in a comparison.
///
/// Failed strategies are listed with their cause. The best completed run by
/// total return is marked.
pub fn generate_comparison_table(comparison: &Comparison) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Strategy Comparison\n\n");
    md.push_str(&format!(
        "{} from {} to {}, initial capital ${:.2}\n\n",
        comparison.symbol, comparison.start, comparison.end, comparison.initial_capital
    ));

    md.push_str("| Strategy | Final Capital | Total Return | Annualized | Max DD | Sharpe | Trades | Win Rate |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");

    let best = comparison.best_index();

    for (i, entry) in comparison.entries.iter().enumerate() {
        match entry {
            StrategyOutcome::Completed(r) => {
                let marker = if best == Some(i) {
                    " **(best)**"
                } else {
                    ""
                };
                md.push_str(&format!(
                    "| {}{} | ${:.2} | {} | {} | {} | {:.3} | {} | {:.1}% |\n",
                    r.strategy_name,
                    marker,
                    r.final_capital,
                    pct(r.total_return),
                    pct(r.annualized_return),
                    pct(r.max_drawdown),
                    r.sharpe_ratio,
                    r.trade_count,
                    r.win_rate * 100.0
                ));
            }
            StrategyOutcome::Failed {
                strategy_name,
                cause,
            } => {
                md.push_str(&format!(
                    "| {strategy_name} | FAILED: {cause} | - | - | - | - | - | - |\n"
                ));
            }
        }
    }

    md
}

//! Integration tests for the execution simulator.
//!
//! Tests:
//! 1. Single round-trip with commission and slippage
//! 2. Flat market: all-hold signals leave equity untouched
//! 3. Never-exit: an MA cross on a rising series opens one lot and keeps it
//! 4. Same-bar execution at the signal bar's close
//! 5. Unaffordable BUY is a silent no-op

use barlab_core::components::signal::{MaCrossover, SignalGenerator};
use barlab_core::domain::{Bar, Signal, TradeKind};
use barlab_core::engine::{run_simulation, EngineConfig, PositionState};
use chrono::NaiveDate;

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1_000_000,
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "actual={actual}, expected={expected}, diff={}",
        (actual - expected).abs()
    );
}

// ── 1. Single round-trip ─────────────────────────────────────────────

#[test]
fn single_round_trip_with_costs() {
    let bars = make_bars(&[100.0, 110.0]);
    let signals = [Signal::Buy, Signal::Sell];
    let config = EngineConfig::new(100_000.0, 0.001, 0.001);

    let result = run_simulation(&bars, &signals, &config).unwrap();
    assert_eq!(result.trades.len(), 2);

    let buy = &result.trades[0];
    assert_eq!(buy.kind, TradeKind::Buy);
    assert_close(buy.price, 100.1, 1e-9);
    assert_eq!(buy.shares, 998);
    let expected_cost = 998.0 * 100.1 * 1.001;
    assert_close(buy.amount, expected_cost, 1e-6);
    assert_close(buy.capital_after, 100_000.0 - expected_cost, 1e-6);
    assert!(buy.pnl.is_none());

    let sell = &result.trades[1];
    assert_eq!(sell.kind, TradeKind::Sell);
    assert_close(sell.price, 109.89, 1e-9);
    assert_eq!(sell.shares, 998);
    let expected_revenue = 998.0 * 109.89 * 0.999;
    assert_close(sell.amount, expected_revenue, 1e-6);
    let pnl = sell.pnl.unwrap();
    assert_close(pnl, expected_revenue - expected_cost, 1e-6);
    assert!(pnl > 0.0);
    assert_close(sell.pnl_pct.unwrap(), pnl / expected_cost, 1e-12);

    assert!(result.final_state.is_flat());
    assert_close(result.final_capital, 100_000.0 - expected_cost + expected_revenue, 1e-6);
    assert_close(result.final_equity().unwrap(), result.final_capital, 1e-9);
}

#[test]
fn equity_marks_open_lot_at_raw_close() {
    let bars = make_bars(&[100.0, 105.0, 110.0]);
    let signals = [Signal::Buy, Signal::Hold, Signal::Sell];
    let config = EngineConfig::default();

    let result = run_simulation(&bars, &signals, &config).unwrap();
    let cash = result.trades[0].capital_after;
    assert_close(result.equity_curve[0].equity, cash + 998.0 * 100.0, 1e-6);
    assert_close(result.equity_curve[1].equity, cash + 998.0 * 105.0, 1e-6);
}

// ── 2. Flat market ───────────────────────────────────────────────────

#[test]
fn all_hold_signals_keep_equity_constant() {
    let bars = make_bars(&[100.0, 95.0, 120.0, 80.0, 101.0]);
    let signals = vec![Signal::Hold; bars.len()];
    let result = run_simulation(&bars, &signals, &EngineConfig::default()).unwrap();

    assert!(result.trades.is_empty());
    assert_eq!(result.equity_curve.len(), bars.len());
    assert!(result.equity_curve.iter().all(|p| p.equity == 100_000.0));
    assert_eq!(result.final_state, PositionState::Flat);
}

// ── 3. Never-exit ────────────────────────────────────────────────────

#[test]
fn ma_cross_on_rising_series_never_exits() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let bars = make_bars(&closes);
    let signals = MaCrossover::new(2, 3).unwrap().generate(&bars);
    let config = EngineConfig::default();

    let result = run_simulation(&bars, &signals, &config).unwrap();
    assert_eq!(result.trades.len(), 1);
    let buy = &result.trades[0];
    assert_eq!(buy.kind, TradeKind::Buy);
    // First bar where both averages exist
    assert_eq!(buy.date, bars[2].date);

    match result.final_state {
        PositionState::Long { shares, entry_date, .. } => {
            assert_eq!(shares, buy.shares);
            assert_eq!(entry_date, bars[2].date);
        }
        PositionState::Flat => panic!("expected an open lot"),
    }

    // Mark-to-market, not a liquidation value
    let last_close = *closes.last().unwrap();
    assert_close(
        result.final_equity().unwrap(),
        result.final_capital + buy.shares as f64 * last_close,
        1e-6,
    );
}

// ── 4. Same-bar execution ────────────────────────────────────────────

#[test]
fn fills_use_the_signal_bar_close() {
    let bars = make_bars(&[50.0, 200.0, 80.0, 10.0]);
    let signals = [Signal::Hold, Signal::Buy, Signal::Sell, Signal::Hold];
    let config = EngineConfig::new(10_000.0, 0.0, 0.01);

    let result = run_simulation(&bars, &signals, &config).unwrap();
    assert_eq!(result.trades[0].date, bars[1].date);
    assert_close(result.trades[0].price, 202.0, 1e-9);
    assert_eq!(result.trades[1].date, bars[2].date);
    assert_close(result.trades[1].price, 79.2, 1e-9);
}

// ── 5. Unaffordable BUY ──────────────────────────────────────────────

#[test]
fn unaffordable_buy_is_silent_noop() {
    let bars = make_bars(&[5_000.0, 5_000.0]);
    let signals = [Signal::Buy, Signal::Buy];
    let config = EngineConfig::new(1_000.0, 0.001, 0.001);

    let result = run_simulation(&bars, &signals, &config).unwrap();
    assert!(result.trades.is_empty());
    assert!(result.final_state.is_flat());
    assert!(result.equity_curve.iter().all(|p| p.equity == 1_000.0));
}

#[test]
fn reentry_after_exit_opens_new_lot() {
    let bars = make_bars(&[100.0, 110.0, 90.0, 95.0]);
    let signals = [Signal::Buy, Signal::Sell, Signal::Buy, Signal::Sell];
    let result = run_simulation(&bars, &signals, &EngineConfig::default()).unwrap();

    let kinds: Vec<TradeKind> = result.trades.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TradeKind::Buy, TradeKind::Sell, TradeKind::Buy, TradeKind::Sell]
    );
    // Second SELL pairs with the second BUY
    let expected = result.trades[3].amount - result.trades[2].amount;
    assert_close(result.trades[3].pnl.unwrap(), expected, 1e-9);
}

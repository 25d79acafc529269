//! Bar-by-bar simulation loop.
//!
//! Per bar, in order:
//! 1. Read the bar's signal and the current position state
//! 2. FLAT + Buy: open an all-in lot at the slippage-adjusted close (if affordable)
//! 3. LONG + Sell: close the lot at the slippage-adjusted close
//! 4. Mark to market: cash plus open shares valued at the raw close
//!
//! Execution happens on the same bar whose close produced the signal.

use crate::domain::{validate_series, Bar, EquityPoint, Signal, Trade, TradeKind};

use super::accounting::{plan_buy, plan_sell};
use super::state::{EngineConfig, EngineError, PositionState, SimulationResult};

/// Run the position state machine over `bars` with one signal per bar.
///
/// Fails only on malformed input (mismatched lengths, invalid config, or a bar
/// sequence that is out of order or has an unusable close). An unaffordable BUY
/// is a silent no-op, not an error. A lot still open after the last bar stays
/// open and is valued at the final close.
pub fn run_simulation(
    bars: &[Bar],
    signals: &[Signal],
    config: &EngineConfig,
) -> Result<SimulationResult, EngineError> {
    if bars.len() != signals.len() {
        return Err(EngineError::LengthMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }
    config.validate()?;
    validate_series(bars)?;

    let mut capital = config.initial_capital;
    let mut state = PositionState::Flat;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (bar, &signal) in bars.iter().zip(signals) {
        match (state, signal) {
            (PositionState::Flat, Signal::Buy) => {
                if let Some(fill) = plan_buy(capital, bar.close, config) {
                    capital -= fill.total_cost;
                    state = PositionState::Long {
                        shares: fill.shares,
                        entry_cost: fill.total_cost,
                        entry_date: bar.date,
                    };
                    tracing::debug!(
                        date = %bar.date,
                        price = fill.price,
                        shares = fill.shares,
                        capital,
                        "BUY"
                    );
                    trades.push(Trade {
                        date: bar.date,
                        kind: TradeKind::Buy,
                        price: fill.price,
                        shares: fill.shares,
                        amount: fill.total_cost,
                        commission: fill.commission,
                        capital_after: capital,
                        pnl: None,
                        pnl_pct: None,
                    });
                } else {
                    tracing::trace!(date = %bar.date, capital, "buy signal skipped: cannot afford one share");
                }
            }
            (
                PositionState::Long {
                    shares, entry_cost, ..
                },
                Signal::Sell,
            ) => {
                let fill = plan_sell(shares, entry_cost, bar.close, config);
                capital += fill.net_revenue;
                state = PositionState::Flat;
                tracing::debug!(
                    date = %bar.date,
                    price = fill.price,
                    shares,
                    pnl = fill.pnl,
                    capital,
                    "SELL"
                );
                trades.push(Trade {
                    date: bar.date,
                    kind: TradeKind::Sell,
                    price: fill.price,
                    shares,
                    amount: fill.net_revenue,
                    commission: fill.commission,
                    capital_after: capital,
                    pnl: Some(fill.pnl),
                    pnl_pct: Some(fill.pnl_pct),
                });
            }
            _ => {}
        }

        equity_curve.push(EquityPoint {
            date: bar.date,
            equity: capital + state.shares() as f64 * bar.close,
        });
    }

    Ok(SimulationResult {
        trades,
        equity_curve,
        final_capital: capital,
        final_state: state,
    })
}

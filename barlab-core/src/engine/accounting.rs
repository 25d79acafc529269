//! Fill arithmetic — execution prices, lot sizing, fees, and realized PnL.
//!
//! Every function here is pure. The loop runner owns the cash balance and the
//! position state and applies the results.

use super::state::EngineConfig;

/// Cash flows of an affordable BUY.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyFill {
    pub price: f64,
    pub shares: u64,
    pub commission: f64,
    /// Notional plus commission.
    pub total_cost: f64,
}

/// Cash flows of closing the open lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellFill {
    pub price: f64,
    pub commission: f64,
    /// Notional minus commission.
    pub net_revenue: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// Close adjusted upward by slippage.
pub fn buy_price(close: f64, config: &EngineConfig) -> f64 {
    close * (1.0 + config.slippage_rate)
}

/// Close adjusted downward by slippage.
pub fn sell_price(close: f64, config: &EngineConfig) -> f64 {
    close * (1.0 - config.slippage_rate)
}

/// Size an all-in lot at `close`.
///
/// Returns `None` when not even one share is affordable after commission.
pub fn plan_buy(capital: f64, close: f64, config: &EngineConfig) -> Option<BuyFill> {
    let price = buy_price(close, config);
    if price <= 0.0 || capital <= 0.0 {
        return None;
    }
    let shares = (capital * (1.0 - config.commission_rate) / price).floor();
    if shares < 1.0 {
        return None;
    }
    let shares = shares as u64;
    let notional = shares as f64 * price;
    let commission = notional * config.commission_rate;
    let total_cost = notional + commission;
    if total_cost > capital {
        return None;
    }
    Some(BuyFill {
        price,
        shares,
        commission,
        total_cost,
    })
}

/// Close a lot of `shares` bought for `entry_cost` in total.
pub fn plan_sell(shares: u64, entry_cost: f64, close: f64, config: &EngineConfig) -> SellFill {
    let price = sell_price(close, config);
    let revenue = shares as f64 * price;
    let commission = revenue * config.commission_rate;
    let net_revenue = revenue - commission;
    let pnl = net_revenue - entry_cost;
    let pnl_pct = if entry_cost > 0.0 { pnl / entry_cost } else { 0.0 };
    SellFill {
        price,
        commission,
        net_revenue,
        pnl,
        pnl_pct,
    }
}

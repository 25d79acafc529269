//! Engine configuration, position state, and simulation result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BarError, EquityPoint, Trade};

/// Cost model and starting cash for a single simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Proportional fee on trade notional (0.001 = 0.1%).
    pub commission_rate: f64,
    /// Proportional price adjustment against the trader on every fill.
    pub slippage_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            commission_rate: 0.001,
            slippage_rate: 0.001,
        }
    }
}

impl EngineConfig {
    pub fn new(initial_capital: f64, commission_rate: f64, slippage_rate: f64) -> Self {
        Self {
            initial_capital,
            commission_rate,
            slippage_rate,
        }
    }

    /// Frictionless config: no commission, no slippage.
    pub fn frictionless(initial_capital: f64) -> Self {
        Self::new(initial_capital, 0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        if !(0.0..1.0).contains(&self.commission_rate) {
            return Err(EngineError::InvalidConfig(format!(
                "commission_rate must be in [0, 1), got {}",
                self.commission_rate
            )));
        }
        if !(0.0..1.0).contains(&self.slippage_rate) {
            return Err(EngineError::InvalidConfig(format!(
                "slippage_rate must be in [0, 1), got {}",
                self.slippage_rate
            )));
        }
        Ok(())
    }
}

/// Errors that stop a simulation before the first bar is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("signal count ({signals}) does not match bar count ({bars})")]
    LengthMismatch { bars: usize, signals: usize },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Bars(#[from] BarError),
}

/// The two-state position machine. At most one lot is ever open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionState {
    #[default]
    Flat,
    Long {
        shares: u64,
        /// Total cash paid for the open lot, commission included.
        entry_cost: f64,
        entry_date: NaiveDate,
    },
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn is_long(&self) -> bool {
        !self.is_flat()
    }

    pub fn shares(&self) -> u64 {
        match self {
            PositionState::Flat => 0,
            PositionState::Long { shares, .. } => *shares,
        }
    }
}

/// Output of one sequential pass over bars and signals.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// BUY and SELL executions in bar order.
    pub trades: Vec<Trade>,
    /// One mark-to-market point per input bar.
    pub equity_curve: Vec<EquityPoint>,
    /// Cash left after the last bar.
    pub final_capital: f64,
    /// Position held after the last bar. A lot may still be open.
    pub final_state: PositionState,
}

impl SimulationResult {
    /// Equity at the last bar, or `None` for an empty run.
    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().map(|p| p.equity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_conventional_costs() {
        let config = EngineConfig::default();
        assert_eq!(config.initial_capital, 100_000.0);
        assert_eq!(config.commission_rate, 0.001);
        assert_eq!(config.slippage_rate, 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(EngineConfig::new(0.0, 0.001, 0.001).validate().is_err());
        assert!(EngineConfig::new(f64::NAN, 0.001, 0.001).validate().is_err());
        assert!(EngineConfig::new(1000.0, -0.1, 0.001).validate().is_err());
        assert!(EngineConfig::new(1000.0, 0.001, 1.0).validate().is_err());
        assert!(EngineConfig::frictionless(1000.0).validate().is_ok());
    }

    #[test]
    fn position_state_accessors() {
        let flat = PositionState::default();
        assert!(flat.is_flat());
        assert_eq!(flat.shares(), 0);

        let long = PositionState::Long {
            shares: 10,
            entry_cost: 1001.0,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        assert!(long.is_long());
        assert_eq!(long.shares(), 10);
    }
}

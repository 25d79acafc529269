//! Execution simulator — single-asset, long-only, one lot at a time.
//!
//! The engine consumes a validated bar sequence and one precomputed signal per
//! bar, then walks the bars once in order. Each bar depends on the cash and
//! position left by the previous bar, so a run is strictly sequential.

pub mod accounting;
pub mod loop_runner;
pub mod state;

pub use accounting::{plan_buy, plan_sell, BuyFill, SellFill};
pub use loop_runner::run_simulation;
pub use state::{EngineConfig, EngineError, PositionState, SimulationResult};

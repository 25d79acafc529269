//! Domain types for barlab

pub mod bar;
pub mod equity;
pub mod signal;
pub mod trade;

pub use bar::{validate_series, Bar, BarError};
pub use equity::{equity_values, EquityPoint};
pub use signal::Signal;
pub use trade::{Trade, TradeKind};

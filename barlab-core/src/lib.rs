//! BarLab Core — domain types, indicators, signal generators, and the execution simulator.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, signals, trades, equity points)
//! - Windowed indicator functions (rolling mean/std, EWM, RSI)
//! - The `SignalGenerator` trait, its variants, and the config factory
//! - The single-asset, long-only execution simulator
//! - The market data boundary (provider trait, CSV import, synthetic data)

pub mod components;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;

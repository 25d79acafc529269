//! Run fingerprinting — deterministic identification of strategy configs and datasets.
//!
//! - `ComponentConfig`: a strategy type plus its numeric parameters.
//! - `dataset_hash()`: content hash over a bar sequence.
//! - `run_id()`: generator name, run settings and dataset hash in one id.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of a single strategy component.
///
/// Uses `BTreeMap` for deterministic key ordering during serialization → hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentConfig {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl ComponentConfig {
    pub fn new(component_type: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

/// Deterministic BLAKE3 hash over every bar's date and OHLCV values.
pub fn dataset_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(bar.date.to_string().as_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Deterministic run identifier from the parts that determine a run's output.
///
/// `settings` is any canonical text form of the remaining inputs (symbol,
/// range, capital, rates).
pub fn run_id(strategy_name: &str, settings: &str, dataset_hash: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(strategy_name.as_bytes());
    hasher.update(b"\0");
    hasher.update(settings.as_bytes());
    hasher.update(b"\0");
    hasher.update(dataset_hash.as_bytes());
    hasher.finalize().to_hex().to_string()
}

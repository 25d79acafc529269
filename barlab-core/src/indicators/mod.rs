//! Windowed indicator functions over an ordered numeric series.
//!
//! Every function is a pure transform from a slice to a series of the same
//! length. Positions without enough lookback are `None`, so callers decide
//! explicitly what an undefined value means (the signal generators map it to
//! a neutral signal). Nothing here ever peeks past index `t` when producing
//! the value at `t`.

pub mod ema;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use ema::ewm_mean;
pub use rsi::rolling_rsi;
pub use sma::rolling_mean;
pub use stddev::rolling_std;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Simple Moving Average (SMA).
//!
//! Rolling arithmetic mean over a lookback window.
//! First defined value at index `window - 1`.

/// Rolling mean of `values` over `window` observations.
///
/// Each window is summed directly rather than through a running sum, so two
/// averages over identical inputs compare exactly equal.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for (i, slot) in result.iter_mut().enumerate().skip(window - 1) {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        *slot = Some(sum / window as f64);
    }
    result
}

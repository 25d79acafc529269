//! Relative Strength Index (RSI) with simple rolling averages.
//!
//! avg_gain / avg_loss are the arithmetic means of the positive and negative
//! price changes over the last `period` changes.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! First defined value at index `period` (needs `period` changes).
//! avg_loss == 0 leaves the RSI undefined.

pub fn rolling_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n <= period {
        return result;
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, slot) in result.iter_mut().enumerate().skip(period) {
        // changes[i - 1] is the move into bar i
        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = -window.iter().filter(|c| **c < 0.0).sum::<f64>() / period as f64;
        if avg_loss > 0.0 {
            *slot = Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss));
        }
    }
    result
}

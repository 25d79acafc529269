//! Exponential moving average, span-parameterized and bias-adjusted.
//!
//! alpha = 2 / (span + 1). The value at `t` is the weighted mean of every
//! observation up to `t` with weights (1 - alpha)^k for the observation `k`
//! bars back. Because the weights are normalized, the average is defined from
//! the very first observation and needs no seed window.

pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let decay = 1.0 - alpha;

    // Incremental form of sum(w_k * x_k) / sum(w_k): a constant series stays
    // exactly constant.
    let mut mean = 0.0;
    let mut weight_total = 0.0;
    values
        .iter()
        .map(|&v| {
            weight_total = 1.0 + decay * weight_total;
            mean += (v - mean) / weight_total;
            mean
        })
        .collect()
}

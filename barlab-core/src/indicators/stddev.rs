//! Rolling sample standard deviation (n − 1 denominator).
//!
//! First defined value at index `window - 1`; a window of one observation has
//! no sample deviation and stays undefined.

pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return result;
    }

    for (i, slot) in result.iter_mut().enumerate().skip(window - 1) {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        *slot = Some(variance.sqrt());
    }
    result
}

use crate::domain::{NormalizedSeries, RawRecord};
use statrs::statistics::Statistics;

/// Rolling z-score of `close` against the `lookback` points strictly before
/// each index. The first `lookback` records have no full history and are
/// dropped, so the result is `lookback` shorter than the input (or empty).
///
/// A window with zero population standard deviation yields `z = 0`.
pub fn normalize(records: &[RawRecord], lookback: usize) -> NormalizedSeries {
    if lookback == 0 || lookback >= records.len() {
        return NormalizedSeries::default();
    }

    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let n = records.len() - lookback;
    let mut values = Vec::with_capacity(n);
    let mut timestamps = Vec::with_capacity(n);

    for i in lookback..records.len() {
        let window = &closes[i - lookback..i];
        values.push(zscore(closes[i], window));
        timestamps.push(records[i].timestamp.clone());
    }

    NormalizedSeries { values, timestamps }
}

/// z-score of `x` against a non-empty history window.
/// Variance is taken around the mean in a second pass so a window of
/// identical values has exactly zero spread.
pub fn zscore(x: f64, window: &[f64]) -> f64 {
    let mean = window.mean();
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / window.len() as f64;
    let std = variance.sqrt();
    if std == 0.0 {
        0.0
    } else {
        (x - mean) / std
    }
}

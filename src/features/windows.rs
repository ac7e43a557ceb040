use crate::domain::WindowSet;

/// Slide a `win`-wide window over `series`. Sample `i` takes
/// `series[i..i + win]` as input and `series[i + win + horizon - 1]` as target,
/// together with that target's timestamp. Produces
/// `len - win - horizon + 1` samples, or none when the series is too short.
pub fn build_windows(series: &[f64], timestamps: &[String], win: usize, horizon: usize) -> WindowSet {
    let len = series.len().min(timestamps.len());
    if win == 0 || horizon == 0 || win + horizon > len {
        return WindowSet::default();
    }

    let count = len - win - horizon + 1;
    let mut set = WindowSet {
        inputs: Vec::with_capacity(count),
        targets: Vec::with_capacity(count),
        target_timestamps: Vec::with_capacity(count),
    };

    for i in 0..count {
        let target_idx = i + win + horizon - 1;
        set.inputs.push(series[i..i + win].to_vec());
        set.targets.push(series[target_idx]);
        set.target_timestamps.push(timestamps[target_idx].clone());
    }

    set
}

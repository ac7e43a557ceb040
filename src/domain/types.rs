use serde::{Deserialize, Serialize};

/// One loaded row of the instrument's price history.
/// Only the fields the pipeline consumes are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: String,
    pub close: f64,
    /// Close exactly as it appeared in the source, re-emitted without rounding
    pub close_text: String,
}

impl RawRecord {
    pub fn new(timestamp: impl Into<String>, close: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            close,
            close_text: close.to_string(),
        }
    }
}

/// Rolling z-score series. `values[k]` belongs to `timestamps[k]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub values: Vec<f64>,
    pub timestamps: Vec<String>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Supervised samples, index-aligned: `inputs[k]`, `targets[k]` and
/// `target_timestamps[k]` all describe sample `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSet {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub target_timestamps: Vec<String>,
}

impl WindowSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Model output for one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub timestamp: String,
    pub value: f64,
}

/// One line of an emitted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub timestamp: String,
    pub value: f64,
    /// Rendered value as written to disk
    pub text: String,
}

impl OutputRow {
    pub fn line(&self) -> String {
        format!("{},{}", self.timestamp, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_new_renders_close() {
        let r = RawRecord::new("2020-01-01", 10.5);
        assert_eq!(r.close_text, "10.5");
        assert_eq!(r.timestamp, "2020-01-01");
    }

    #[test]
    fn test_empty_sets() {
        assert!(NormalizedSeries::default().is_empty());
        assert!(WindowSet::default().is_empty());
    }

    #[test]
    fn test_output_row_line() {
        let row = OutputRow {
            timestamp: "2024-03-01".into(),
            value: 1.25,
            text: "1.250000".into(),
        };
        assert_eq!(row.line(), "2024-03-01,1.250000");
    }
}

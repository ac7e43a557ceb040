use crate::domain::{OutputRow, RawRecord};
use std::collections::BTreeMap;

/// Which record a repeated timestamp resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    #[default]
    LastWriteWins,
    FirstWriteWins,
}

/// Timestamp -> close lookup with explicit overwrite semantics
#[derive(Debug, Clone, Default)]
pub struct CloseIndex<'a> {
    closes: BTreeMap<&'a str, &'a RawRecord>,
    duplicates: usize,
}

impl<'a> CloseIndex<'a> {
    pub fn build(records: &'a [RawRecord], policy: DuplicatePolicy) -> Self {
        let mut index = Self::default();
        for record in records {
            let key = record.timestamp.as_str();
            if index.closes.contains_key(key) {
                index.duplicates += 1;
                if policy == DuplicatePolicy::FirstWriteWins {
                    continue;
                }
            }
            index.closes.insert(key, record);
        }
        index
    }

    pub fn get(&self, timestamp: &str) -> Option<&'a RawRecord> {
        self.closes.get(timestamp).copied()
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Records shadowed by (or shadowing) an earlier one with the same timestamp
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Actual and predicted series over the same joined set of timestamps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    pub actual: Vec<OutputRow>,
    pub predicted: Vec<OutputRow>,
    /// Samples left unpaired: no raw close for the timestamp, or no
    /// prediction/timestamp counterpart when the two lengths differ
    pub dropped: usize,
    /// Raw rows whose timestamp was already indexed
    pub duplicates: usize,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

/// Join predictions to raw closes by timestamp (last write wins)
pub fn align(target_timestamps: &[String], predictions: &[f64], records: &[RawRecord]) -> AlignedSeries {
    align_with_policy(target_timestamps, predictions, records, DuplicatePolicy::default())
}

pub fn align_with_policy(
    target_timestamps: &[String],
    predictions: &[f64],
    records: &[RawRecord],
    policy: DuplicatePolicy,
) -> AlignedSeries {
    let index = CloseIndex::build(records, policy);
    let mut out = AlignedSeries {
        dropped: target_timestamps.len().abs_diff(predictions.len()),
        duplicates: index.duplicates(),
        ..Default::default()
    };

    for (timestamp, &prediction) in target_timestamps.iter().zip(predictions) {
        let Some(record) = index.get(timestamp) else {
            out.dropped += 1;
            continue;
        };
        out.actual.push(OutputRow {
            timestamp: timestamp.clone(),
            value: record.close,
            text: record.close_text.clone(),
        });
        out.predicted.push(OutputRow {
            timestamp: timestamp.clone(),
            value: prediction,
            text: format!("{:.6}", prediction),
        });
    }

    out
}

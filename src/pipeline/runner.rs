use super::align::{align, AlignedSeries};
use crate::config::PipelineConfig;
use crate::data::{load_series, write_series};
use crate::domain::{Prediction, RawRecord};
use crate::error::Result;
use crate::features::{build_windows, normalize};
use crate::model::{build_regressor, Regressor, TrainingReport};
use std::path::Path;
use tracing::{info, warn};

/// Everything one run produced, with the size of each stage
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw_rows: usize,
    pub normalized_len: usize,
    pub sample_count: usize,
    pub training: TrainingReport,
    pub predictions: Vec<Prediction>,
    pub aligned: AlignedSeries,
}

/// normalize -> windows -> train -> predict -> align
pub fn run_pipeline(
    records: &[RawRecord],
    config: &PipelineConfig,
    regressor: &mut dyn Regressor,
) -> Result<PipelineOutput> {
    config.validate()?;

    info!(lookback = config.lookback, "computing z-score normalization");
    let normalized = normalize(records, config.lookback);
    info!(len = normalized.len(), "normalized series");

    let windows = build_windows(
        &normalized.values,
        &normalized.timestamps,
        config.window,
        config.horizon,
    );
    info!(
        samples = windows.len(),
        win = config.window,
        horizon = config.horizon,
        "built windows"
    );
    if windows.is_empty() {
        warn!("not enough data for a single window, output will be empty");
    }

    let training = regressor.train(&windows.inputs, &windows.targets);
    let values = regressor.predict(&windows.inputs);
    if values.len() != windows.len() {
        warn!(
            expected = windows.len(),
            got = values.len(),
            model = regressor.name(),
            "regressor returned a different number of predictions"
        );
    }

    let predictions: Vec<Prediction> = windows
        .target_timestamps
        .iter()
        .zip(&values)
        .map(|(ts, &value)| Prediction {
            timestamp: ts.clone(),
            value,
        })
        .collect();

    let aligned = align(&windows.target_timestamps, &values, records);
    info!(
        rows = aligned.len(),
        dropped = aligned.dropped,
        duplicates = aligned.duplicates,
        "aligned predictions"
    );

    Ok(PipelineOutput {
        raw_rows: records.len(),
        normalized_len: normalized.len(),
        sample_count: windows.len(),
        training,
        predictions,
        aligned,
    })
}

/// Load `input`, run the pipeline with the configured model and write
/// `preds.txt` / `close.txt` into the output directory. Nothing is written if
/// loading fails.
pub fn run_from_path(input: &Path, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let loaded = load_series(input)?;

    let mut regressor = build_regressor(config.model, config.window, &config.training);
    let output = run_pipeline(&loaded.records, config, regressor.as_mut())?;

    write_series(&output.aligned.predicted, &config.predictions_path())?;
    write_series(&output.aligned.actual, &config.closes_path())?;
    Ok(output)
}

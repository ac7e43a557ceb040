use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which regressor backs the training stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Lstm,
    Linear,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Lstm => write!(f, "lstm"),
            ModelKind::Linear => write!(f, "linear"),
        }
    }
}

/// Optimizer and batching settings shared by every regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// LSTM hidden state width (ignored by the linear model)
    pub hidden_size: usize,
    /// Seeds weight init and batch shuffling
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 8,
            batch_size: 32,
            learning_rate: 1e-3,
            hidden_size: 48,
            seed: 42,
        }
    }
}

/// Full run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trailing points used for the rolling z-score
    pub lookback: usize,
    /// Input window length
    pub window: usize,
    /// Steps past the window end at which the target sits
    pub horizon: usize,
    pub model: ModelKind,
    pub training: TrainingConfig,
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            window: 20,
            horizon: 1,
            model: ModelKind::Lstm,
            training: TrainingConfig::default(),
            output_dir: PathBuf::from("data"),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookback == 0 {
            return Err(PipelineError::Config("lookback must be at least 1".into()));
        }
        if self.window == 0 {
            return Err(PipelineError::Config("win must be at least 1".into()));
        }
        if self.horizon == 0 {
            return Err(PipelineError::Config("horizon must be at least 1".into()));
        }
        if self.training.batch_size == 0 {
            return Err(PipelineError::Config("batch size must be at least 1".into()));
        }
        if self.training.hidden_size == 0 {
            return Err(PipelineError::Config("hidden size must be at least 1".into()));
        }
        let lr = self.training.learning_rate;
        if !lr.is_finite() || lr <= 0.0 {
            return Err(PipelineError::Config(format!(
                "learning rate must be a positive number, got {}",
                lr
            )));
        }
        Ok(())
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.output_dir.join("preds.txt")
    }

    pub fn closes_path(&self) -> PathBuf {
        self.output_dir.join("close.txt")
    }
}

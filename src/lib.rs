pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;

pub use config::{ModelKind, PipelineConfig, TrainingConfig};
pub use error::{PipelineError, Result};

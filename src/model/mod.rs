pub mod adam;
pub mod linear;
pub mod lstm;
pub mod trainer;

pub use linear::LinearRegressor;
pub use lstm::LstmRegressor;
pub use trainer::TrainingReport;

use crate::config::{ModelKind, TrainingConfig};

/// Trainable sequence regressor. `predict` returns one value per input
/// window, in input order.
pub trait Regressor {
    fn name(&self) -> &'static str;
    fn train(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> TrainingReport;
    fn predict(&self, inputs: &[Vec<f64>]) -> Vec<f64>;
}

pub fn build_regressor(kind: ModelKind, window: usize, config: &TrainingConfig) -> Box<dyn Regressor> {
    match kind {
        ModelKind::Lstm => Box::new(LstmRegressor::new(config.clone())),
        ModelKind::Linear => Box::new(LinearRegressor::new(window, config.clone())),
    }
}

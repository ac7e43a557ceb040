use super::adam::Adam;
use crate::config::TrainingConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What a training run did. Quality is reported, never acted on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Mean batch MSE per epoch
    pub epoch_losses: Vec<f64>,
    pub samples: usize,
    pub batches_per_epoch: usize,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// A model whose squared-error gradient can be computed per sample
pub(crate) trait Differentiable {
    fn parameters(&self) -> &[f64];
    fn parameters_mut(&mut self) -> &mut [f64];
    /// Add `scale * d(pred - target)^2 / dθ` into `grad`; returns the squared error
    fn accumulate_gradient(&self, input: &[f64], target: f64, scale: f64, grad: &mut [f64]) -> f64;
}

/// Shuffled mini-batch Adam. Runs exactly `config.epochs` passes.
pub(crate) fn fit<M: Differentiable>(
    model: &mut M,
    inputs: &[Vec<f64>],
    targets: &[f64],
    config: &TrainingConfig,
    rng: &mut StdRng,
    label: &str,
) -> TrainingReport {
    let n = inputs.len().min(targets.len());
    if n == 0 {
        warn!(model = label, "no training samples, skipping training");
        return TrainingReport::default();
    }

    let batch_size = config.batch_size.max(1);
    let n_params = model.parameters().len();
    let mut optimizer = Adam::new(n_params, config.learning_rate);
    let mut grad = vec![0.0; n_params];
    let mut order: Vec<usize> = (0..n).collect();

    let mut report = TrainingReport {
        epoch_losses: Vec::with_capacity(config.epochs),
        samples: n,
        batches_per_epoch: n.div_ceil(batch_size),
    };

    info!(
        model = label,
        epochs = config.epochs,
        batch = batch_size,
        lr = config.learning_rate,
        samples = n,
        "training"
    );

    for epoch in 0..config.epochs {
        order.shuffle(rng);
        let mut total = 0.0;
        let mut batches = 0usize;

        for batch in order.chunks(batch_size) {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let scale = 1.0 / batch.len() as f64;
            let mut squared = 0.0;
            for &i in batch {
                squared += model.accumulate_gradient(&inputs[i], targets[i], scale, &mut grad);
            }
            optimizer.step(model.parameters_mut(), &grad);
            total += squared * scale;
            batches += 1;
        }

        let loss = total / batches as f64;
        info!("epoch {}/{} loss={:.4}", epoch + 1, config.epochs, loss);
        report.epoch_losses.push(loss);
    }

    report
}

use super::trainer::{fit, Differentiable, TrainingReport};
use super::Regressor;
use crate::config::TrainingConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `y = w · x + b` over the window values. Starts from zero weights.
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    /// `window` weights followed by the bias
    params: Vec<f64>,
    config: TrainingConfig,
    rng: StdRng,
}

impl LinearRegressor {
    pub fn new(window: usize, config: TrainingConfig) -> Self {
        Self {
            params: vec![0.0; window + 1],
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.params[..self.params.len() - 1]
    }

    pub fn bias(&self) -> f64 {
        self.params[self.params.len() - 1]
    }

    fn forward(&self, input: &[f64]) -> f64 {
        self.weights()
            .iter()
            .zip(input)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias()
    }
}

impl Differentiable for LinearRegressor {
    fn parameters(&self) -> &[f64] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    fn accumulate_gradient(&self, input: &[f64], target: f64, scale: f64, grad: &mut [f64]) -> f64 {
        let err = self.forward(input) - target;
        let dy = 2.0 * err * scale;
        let n = self.params.len() - 1;
        for (g, x) in grad[..n].iter_mut().zip(input) {
            *g += dy * x;
        }
        grad[n] += dy;
        err * err
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn train(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> TrainingReport {
        let config = self.config.clone();
        let mut rng = self.rng.clone();
        let report = fit(self, inputs, targets, &config, &mut rng, "linear");
        self.rng = rng;
        report
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Vec<f64> {
        inputs.iter().map(|x| self.forward(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrained_predicts_zero() {
        let m = LinearRegressor::new(3, TrainingConfig::default());
        assert_eq!(m.predict(&[vec![1.0, 2.0, 3.0]]), vec![0.0]);
    }

    #[test]
    fn test_learns_window_mean() {
        let inputs: Vec<Vec<f64>> = (0..60)
            .map(|i| (0..3).map(|t| ((i * 3 + t) as f64 * 0.61).cos()).collect())
            .collect();
        let targets: Vec<f64> = inputs.iter().map(|x| x.iter().sum::<f64>() / 3.0).collect();
        let mut m = LinearRegressor::new(
            3,
            TrainingConfig {
                epochs: 300,
                batch_size: 10,
                learning_rate: 0.02,
                ..Default::default()
            },
        );
        let report = m.train(&inputs, &targets);
        assert_eq!(report.epoch_losses.len(), 300);
        assert!(report.final_loss().unwrap() < 1e-3);
        for w in m.weights() {
            assert!((w - 1.0 / 3.0).abs() < 0.05, "weight {}", w);
        }
    }

    #[test]
    fn test_empty_training_keeps_zero_model() {
        let mut m = LinearRegressor::new(2, TrainingConfig::default());
        let report = m.train(&[], &[]);
        assert!(report.epoch_losses.is_empty());
        assert_eq!(m.bias(), 0.0);
    }
}

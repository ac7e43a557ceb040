use super::trainer::{fit, Differentiable, TrainingReport};
use super::Regressor;
use crate::config::TrainingConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameter offsets inside the flat weight vector.
/// Gate blocks are ordered input, forget, candidate, output.
#[derive(Debug, Clone, Copy)]
struct Layout {
    hidden: usize,
}

impl Layout {
    fn gates(&self) -> usize {
        4 * self.hidden
    }
    /// Input -> gates, one weight per gate row (scalar input)
    fn w_x(&self) -> usize {
        0
    }
    /// Hidden -> gates, row-major `[4H, H]`
    fn w_h(&self) -> usize {
        self.gates()
    }
    fn bias(&self) -> usize {
        self.w_h() + self.gates() * self.hidden
    }
    fn w_out(&self) -> usize {
        self.bias() + self.gates()
    }
    fn b_out(&self) -> usize {
        self.w_out() + self.hidden
    }
    fn total(&self) -> usize {
        self.b_out() + 1
    }
}

/// Per-timestep activations kept for backpropagation
struct Step {
    x: f64,
    h_prev: Vec<f64>,
    c_prev: Vec<f64>,
    i: Vec<f64>,
    f: Vec<f64>,
    g: Vec<f64>,
    o: Vec<f64>,
    tanh_c: Vec<f64>,
}

/// Single-layer LSTM over a univariate window with a linear head on the
/// final hidden state. Trained with full backpropagation through time.
#[derive(Debug, Clone)]
pub struct LstmRegressor {
    layout: Layout,
    params: Vec<f64>,
    config: TrainingConfig,
    rng: StdRng,
}

impl LstmRegressor {
    pub fn new(config: TrainingConfig) -> Self {
        let layout = Layout {
            hidden: config.hidden_size.max(1),
        };
        let mut rng = StdRng::seed_from_u64(config.seed);
        let limit = 1.0 / (layout.hidden as f64).sqrt();
        let mut params: Vec<f64> = (0..layout.total())
            .map(|_| rng.gen_range(-limit..limit))
            .collect();

        // Forget gate starts open, other biases at zero
        let h = layout.hidden;
        for (k, b) in params[layout.bias()..layout.w_out()].iter_mut().enumerate() {
            *b = if (h..2 * h).contains(&k) { 1.0 } else { 0.0 };
        }
        params[layout.b_out()] = 0.0;

        Self {
            layout,
            params,
            config,
            rng,
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.layout.hidden
    }

    /// Run the sequence. When `trace` is given, every step's activations are
    /// recorded. Returns the prediction and the final hidden state.
    fn run(&self, input: &[f64], mut trace: Option<&mut Vec<Step>>) -> (f64, Vec<f64>) {
        let l = self.layout;
        let h = l.hidden;
        let p = &self.params;

        let mut h_state = vec![0.0; h];
        let mut c_state = vec![0.0; h];
        let mut z = vec![0.0; l.gates()];

        for &x in input {
            for (r, zr) in z.iter_mut().enumerate() {
                let row = &p[l.w_h() + r * h..l.w_h() + (r + 1) * h];
                *zr = p[l.w_x() + r] * x + p[l.bias() + r] + dot(row, &h_state);
            }

            let i: Vec<f64> = z[..h].iter().map(|&v| sigmoid(v)).collect();
            let f: Vec<f64> = z[h..2 * h].iter().map(|&v| sigmoid(v)).collect();
            let g: Vec<f64> = z[2 * h..3 * h].iter().map(|&v| v.tanh()).collect();
            let o: Vec<f64> = z[3 * h..].iter().map(|&v| sigmoid(v)).collect();

            let c_next: Vec<f64> = (0..h).map(|j| f[j] * c_state[j] + i[j] * g[j]).collect();
            let tanh_c: Vec<f64> = c_next.iter().map(|v| v.tanh()).collect();
            let h_next: Vec<f64> = (0..h).map(|j| o[j] * tanh_c[j]).collect();

            if let Some(t) = trace.as_mut() {
                t.push(Step {
                    x,
                    h_prev: std::mem::take(&mut h_state),
                    c_prev: std::mem::take(&mut c_state),
                    i,
                    f,
                    g,
                    o,
                    tanh_c,
                });
            }
            h_state = h_next;
            c_state = c_next;
        }

        let out = dot(&p[l.w_out()..l.b_out()], &h_state) + p[l.b_out()];
        (out, h_state)
    }
}

impl Differentiable for LstmRegressor {
    fn parameters(&self) -> &[f64] {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut [f64] {
        &mut self.params
    }

    fn accumulate_gradient(&self, input: &[f64], target: f64, scale: f64, grad: &mut [f64]) -> f64 {
        let l = self.layout;
        let h = l.hidden;
        let p = &self.params;

        let mut trace = Vec::with_capacity(input.len());
        let (pred, h_last) = self.run(input, Some(&mut trace));
        let err = pred - target;
        let dy = 2.0 * err * scale;

        grad[l.b_out()] += dy;
        for j in 0..h {
            grad[l.w_out() + j] += dy * h_last[j];
        }

        let mut dh: Vec<f64> = (0..h).map(|j| dy * p[l.w_out() + j]).collect();
        let mut dc = vec![0.0; h];
        let mut dz = vec![0.0; l.gates()];

        for step in trace.iter().rev() {
            for j in 0..h {
                let (i, f, g, o, tc) = (step.i[j], step.f[j], step.g[j], step.o[j], step.tanh_c[j]);
                dc[j] += dh[j] * o * (1.0 - tc * tc);
                dz[j] = dc[j] * g * i * (1.0 - i);
                dz[h + j] = dc[j] * step.c_prev[j] * f * (1.0 - f);
                dz[2 * h + j] = dc[j] * i * (1.0 - g * g);
                dz[3 * h + j] = dh[j] * tc * o * (1.0 - o);
                // carry to the previous step
                dc[j] *= f;
            }

            let mut dh_prev = vec![0.0; h];
            for (r, &d) in dz.iter().enumerate() {
                grad[l.w_x() + r] += d * step.x;
                grad[l.bias() + r] += d;
                let row = l.w_h() + r * h;
                for k in 0..h {
                    grad[row + k] += d * step.h_prev[k];
                    dh_prev[k] += p[row + k] * d;
                }
            }
            dh = dh_prev;
        }

        err * err
    }
}

impl Regressor for LstmRegressor {
    fn name(&self) -> &'static str {
        "lstm"
    }

    fn train(&mut self, inputs: &[Vec<f64>], targets: &[f64]) -> TrainingReport {
        let config = self.config.clone();
        let mut rng = self.rng.clone();
        let report = fit(self, inputs, targets, &config, &mut rng, "lstm");
        self.rng = rng;
        report
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Vec<f64> {
        inputs.iter().map(|x| self.run(x, None).0).collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

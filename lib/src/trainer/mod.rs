//! Stochastic dual coordinate ascent (SDCA) for linear classifiers.
//!
//! The trainer minimizes the regularized empirical risk
//!
//! ```text
//! P(w, b) = (1/n) Σ φ(y_i (w·x_i + b)) + (λ/2) (‖w‖² + b²)
//! ```
//!
//! by maximizing its dual one coefficient at a time. The bias is treated as the
//! weight of a constant feature equal to `1`, so it is regularized together with
//! the weights. Each epoch visits every example once, in an order drawn from a
//! seeded RNG, and ends with a duality-gap check: training stops as soon as the
//! gap falls below the configured tolerance or the epoch budget runs out.

use crate::config::SdcaConfig;
use crate::dataset::FeatureDataset;
use crate::error::{Result, SentimentError};
use crate::loss::{DualLoss, LogisticLoss};
use crate::model::linear::{LinearClassifier, LinearParams};
use crate::model::{Fitted, Unfitted};
use log::{debug, info, log_enabled, Level};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Fits a [`LinearClassifier`] by dual coordinate ascent.
///
/// Once built via [`TrainerBuilder`] it is immutable and can be reused for any
/// number of models. Training with the same settings on the same data always
/// produces bitwise-identical parameters.
#[derive(Debug, Clone)]
pub struct SdcaTrainer<L: DualLoss = LogisticLoss> {
    pub(crate) l2_regularization: f64,
    pub(crate) max_epochs: usize,
    pub(crate) convergence_tolerance: f64,
    pub(crate) seed: u64,
    pub(crate) shuffle: bool,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
}

/// Fluent builder for [`SdcaTrainer`].
///
/// Defaults match [`SdcaConfig::default`], with `verbose` off.
#[derive(Debug, Clone)]
pub struct TrainerBuilder<L: DualLoss = LogisticLoss> {
    l2_regularization: f64,
    max_epochs: usize,
    convergence_tolerance: f64,
    seed: u64,
    shuffle: bool,
    verbose: bool,
    loss_fn: L,
}

impl<L: DualLoss> TrainerBuilder<L> {
    pub fn new(loss_fn: L) -> Self {
        let defaults = SdcaConfig::default();
        Self {
            l2_regularization: defaults.l2_regularization,
            max_epochs: defaults.max_epochs,
            convergence_tolerance: defaults.convergence_tolerance,
            seed: defaults.seed,
            shuffle: defaults.shuffle,
            verbose: false,
            loss_fn,
        }
    }

    pub fn l2_regularization(mut self, lambda: f64) -> Self {
        self.l2_regularization = lambda;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Visit examples in a fresh random order each epoch. When `false`,
    /// examples are visited in dataset order.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Log the duality gap after every epoch at `debug` level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validates the hyperparameters and builds the trainer.
    ///
    /// # Errors
    /// [`SentimentError::InvalidInput`] if `λ` is not positive, `max_epochs` is
    /// zero or the tolerance is negative.
    pub fn build(self) -> Result<SdcaTrainer<L>> {
        let trainer = SdcaTrainer {
            l2_regularization: self.l2_regularization,
            max_epochs: self.max_epochs,
            convergence_tolerance: self.convergence_tolerance,
            seed: self.seed,
            shuffle: self.shuffle,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
        };
        trainer.config().validate()?;
        Ok(trainer)
    }
}

impl SdcaTrainer<LogisticLoss> {
    /// Starts a builder for logistic regression.
    pub fn builder() -> TrainerBuilder<LogisticLoss> {
        TrainerBuilder::new(LogisticLoss)
    }

    /// Builds a logistic-regression trainer from configuration.
    ///
    /// Per-epoch logging is switched on when the `debug` level is enabled.
    pub fn from_config(config: &SdcaConfig) -> Result<Self> {
        Self::builder()
            .verbose(log_enabled!(Level::Debug))
            .l2_regularization(config.l2_regularization)
            .max_epochs(config.max_epochs)
            .convergence_tolerance(config.convergence_tolerance)
            .seed(config.seed)
            .shuffle(config.shuffle)
            .build()
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    /// Number of completed passes over the data.
    pub epochs: usize,
    /// Duality gap after the last pass. Always non-negative up to rounding.
    pub duality_gap: f64,
    /// Whether the gap reached the tolerance before the epoch budget ran out.
    pub converged: bool,
}

/// Sparse copy of one training row, with its label as `±1`.
struct Row {
    entries: Vec<(usize, f64)>,
    y: f64,
    /// `‖x‖² + 1`, the squared norm including the constant bias feature.
    squared_norm: f64,
}

impl Row {
    fn dot(&self, weights: &[f64], bias: f64) -> f64 {
        self.entries.iter().map(|&(i, v)| v * weights[i]).sum::<f64>() + bias
    }
}

impl<L: DualLoss> SdcaTrainer<L> {
    /// Current hyperparameters as a config value.
    pub fn config(&self) -> SdcaConfig {
        SdcaConfig {
            l2_regularization: self.l2_regularization,
            max_epochs: self.max_epochs,
            convergence_tolerance: self.convergence_tolerance,
            seed: self.seed,
            shuffle: self.shuffle,
        }
    }

    /// Trains `model` on `data` and returns the fitted classifier.
    ///
    /// # Errors
    /// - [`SentimentError::InsufficientData`] if only one class is present.
    /// - [`SentimentError::InvalidInput`] if the model and the data disagree on
    ///   the number of features.
    pub fn fit(
        &self,
        model: LinearClassifier<Unfitted>,
        data: &FeatureDataset,
    ) -> Result<LinearClassifier<Fitted>> {
        self.fit_with_report(model, data).map(|(fitted, _)| fitted)
    }

    /// Like [`fit`](Self::fit) but also reports how optimization went.
    pub fn fit_with_report(
        &self,
        model: LinearClassifier<Unfitted>,
        data: &FeatureDataset,
    ) -> Result<(LinearClassifier<Fitted>, TrainingReport)> {
        let (positive, negative) = data.class_counts();
        if positive == 0 || negative == 0 {
            return Err(SentimentError::InsufficientData(format!(
                "training data must contain both classes ({} positive, {} negative)",
                positive, negative
            )));
        }
        if model.n_features() != data.n_features() {
            return Err(SentimentError::InvalidInput(format!(
                "model has {} features but data has {}",
                model.n_features(),
                data.n_features()
            )));
        }

        let rows: Vec<Row> = data
            .features()
            .iter()
            .zip(data.labels())
            .map(|(x, &label)| Row {
                entries: x.nonzero().collect(),
                y: if label { 1.0 } else { -1.0 },
                squared_norm: x.squared_norm() + 1.0,
            })
            .collect();

        let n = rows.len();
        let lambda_n = self.l2_regularization * n as f64;

        // w = (1 / λn) Σ α_i y_i x_i, kept in sync with the duals.
        let mut alphas = vec![self.loss_fn.initial_dual(); n];
        let mut weights = vec![0.0; model.n_features()];
        let mut bias = 0.0;
        for (row, &alpha) in rows.iter().zip(&alphas) {
            let scale = alpha * row.y / lambda_n;
            for &(i, v) in &row.entries {
                weights[i] += scale * v;
            }
            bias += scale;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n).collect();
        let mut report = TrainingReport {
            epochs: 0,
            duality_gap: f64::INFINITY,
            converged: false,
        };

        for epoch in 0..self.max_epochs {
            if self.shuffle {
                order.shuffle(&mut rng);
            }

            for &idx in &order {
                let row = &rows[idx];
                let margin = row.y * row.dot(&weights, bias);
                let curvature = row.squared_norm / lambda_n;
                let delta = self.loss_fn.dual_step(alphas[idx], margin, curvature);
                if delta == 0.0 {
                    continue;
                }
                alphas[idx] += delta;
                let scale = delta * row.y / lambda_n;
                for &(i, v) in &row.entries {
                    weights[i] += scale * v;
                }
                bias += scale;
            }

            let gap = self.duality_gap(&rows, &alphas, &weights, bias);
            report.epochs = epoch + 1;
            report.duality_gap = gap;
            if self.verbose {
                debug!("Epoch {}: duality gap = {:.6e}", epoch, gap);
            }
            if gap <= self.convergence_tolerance {
                report.converged = true;
                break;
            }
        }

        if report.converged {
            info!(
                "SDCA converged after {} epochs (duality gap {:.3e})",
                report.epochs, report.duality_gap
            );
        } else {
            info!(
                "SDCA stopped after {} epochs without reaching tolerance {:.1e} (duality gap {:.3e})",
                report.epochs, self.convergence_tolerance, report.duality_gap
            );
        }

        Ok((model.into_fitted(LinearParams { weights, bias }), report))
    }

    /// Primal objective minus dual objective at the current iterate.
    fn duality_gap(&self, rows: &[Row], alphas: &[f64], weights: &[f64], bias: f64) -> f64 {
        let n = rows.len() as f64;
        let mut loss_sum = 0.0;
        let mut dual_sum = 0.0;
        for (row, &alpha) in rows.iter().zip(alphas) {
            loss_sum += self.loss_fn.loss(row.y * row.dot(weights, bias));
            dual_sum += self.loss_fn.dual_value(alpha);
        }
        let squared_weights: f64 = weights.iter().map(|w| w * w).sum::<f64>() + bias * bias;
        // P - D = (1/n) Σ [φ(m_i) - H(α_i)] + λ ‖w‖²
        (loss_sum - dual_sum) / n + self.l2_regularization * squared_weights
    }
}

//! Linear binary classifier with a sigmoid-calibrated probability.
//!
//! The model tracks its training state at compile time:
//! - [`LinearClassifier<Unfitted>`]: zero-initialized, owned by the trainer.
//! - [`LinearClassifier<Fitted>`]: inference-only, serializable predictor.
//!
//! A fitted model carries no training hyperparameters; everything needed to
//! score an input is the weight vector and the bias.

use crate::error::{Result, SentimentError};
use crate::loss::sigmoid;
pub use crate::model::{Fitted, InferenceModel, Unfitted};
use crate::vector::FeatureVector;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and bias of a linear model.
///
/// Stored in `f64` so that a persisted model scores inputs exactly as the
/// model it was saved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Result of classifying one feature vector.
///
/// `probability` is `sigmoid(score)` and `predicted_label` is
/// `probability >= 0.5`, compared on the stored `f32` value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_label: bool,
    pub probability: f32,
    pub score: f32,
}

impl Prediction {
    /// Build a prediction from a raw linear score.
    pub fn from_score(score: f64) -> Self {
        let probability = sigmoid(score) as f32;
        Self {
            predicted_label: probability >= 0.5,
            probability,
            score: score as f32,
        }
    }
}

/// A linear classifier with state encoded at the type level.
///
/// `predict` is only available on `LinearClassifier<Fitted>`, so an untrained
/// model cannot be used for inference.
#[derive(Debug, Clone)]
pub struct LinearClassifier<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

impl LinearClassifier<Unfitted> {
    /// Creates a model with zero weights and zero bias.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: vec![0.0; n_features],
                bias: 0.0,
            },
            _state: PhantomData,
        }
    }

    /// Freezes learned parameters into an inference model.
    ///
    /// Called by the trainer once optimization has finished.
    pub fn into_fitted(self, params: LinearParams) -> LinearClassifier<Fitted> {
        LinearClassifier {
            params,
            _state: PhantomData,
        }
    }
}

impl LinearClassifier<Fitted> {
    /// Creates a fitted model from explicit parameters.
    pub fn from_weights(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            params: LinearParams { weights, bias },
            _state: PhantomData,
        }
    }

    /// Raw linear score `w·x + b`.
    pub fn decision_function(&self, input: &FeatureVector) -> Result<f64> {
        if input.len() != self.params.weights.len() {
            return Err(SentimentError::InvalidInput(format!(
                "feature vector has {} dimensions, model expects {}",
                input.len(),
                self.params.weights.len()
            )));
        }
        Ok(input.dot(&self.params.weights) + self.params.bias)
    }
}

impl<S> LinearClassifier<S> {
    pub fn weights(&self) -> &[f64] {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl InferenceModel for LinearClassifier<Fitted> {
    type Input = FeatureVector;
    type Output = Prediction;
    type ParamsRepr = LinearParams;

    fn predict(&self, input: &FeatureVector) -> Result<Prediction> {
        self.decision_function(input).map(Prediction::from_score)
    }

    fn extract_params(&self) -> LinearParams {
        self.params.clone()
    }

    fn from_params(params: LinearParams) -> Result<Self> {
        if !params.bias.is_finite() || params.weights.iter().any(|w| !w.is_finite()) {
            return Err(SentimentError::InvalidArtifact(
                "model parameters contain non-finite values".to_string(),
            ));
        }
        Ok(Self {
            params,
            _state: PhantomData,
        })
    }
}

//! # review-sentiment
//!
//! Binary sentiment classification of short product reviews, with strict
//! separation between training and inference.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: Models carry their training state in the type system
//!   (`Unfitted` vs `Fitted`), so an untrained classifier cannot be asked to predict.
//! - **Training/Inference Separation**: A fitted artifact holds only a vocabulary,
//!   weights and a bias; optimization lives in the [`trainer`] module.
//! - **Explicit Configuration**: Paths, featurizer and trainer options travel in
//!   plain structs ([`config`]); nothing is process-global.
//!
//! ## Quick Start
//!
//! ```rust
//! use review_sentiment::config::{FeaturizerConfig, TextSource};
//! use review_sentiment::dataset::{LabeledReview, UnlabeledReview};
//! use review_sentiment::pipeline::{InferencePipeline, TrainingPipeline};
//! use review_sentiment::trainer::SdcaTrainer;
//!
//! let reviews = vec![
//!     LabeledReview::new(true, "", "Great product"),
//!     LabeledReview::new(false, "", "Terrible service"),
//!     LabeledReview::new(true, "", "Loved it"),
//!     LabeledReview::new(false, "", "Awful experience"),
//! ];
//!
//! let trainer = SdcaTrainer::builder().build()?;
//! let artifact = TrainingPipeline::new(FeaturizerConfig::default(), trainer, TextSource::Body)
//!     .train(&reviews)?;
//!
//! let inference = InferencePipeline::new(artifact)?;
//! let prediction = inference.predict(&UnlabeledReview::from_body("Loved the product"))?;
//! assert!(prediction.predicted_label);
//! # Ok::<(), review_sentiment::error::SentimentError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: review records, CSV ingestion and featurized datasets
//! - `preprocessing`: text featurizer (bag of words, n-grams, TF / TF-IDF)
//! - `model`: linear classifier with stateful type parameters
//! - `loss`: logistic loss in primal and dual form
//! - `trainer`: SDCA training loop
//! - `pipeline`: model artifact, training and inference pipelines
//! - `metrics`: evaluation of binary predictions
//! - `serialization`: parameter persistence
//! - `app`: train-or-load workflow used by the binary

/// Train-or-load workflow and command-line arguments.
pub mod app;

/// Explicit configuration structs.
pub mod config;

/// Review records and data sources.
pub mod dataset;

/// Error type shared by the whole crate.
pub mod error;

/// Loss functions for dual coordinate ascent.
pub mod loss;

/// Evaluation metrics for binary classification.
pub mod metrics;

/// Classification models with compile-time state safety.
pub mod model;

/// Training and inference pipelines.
pub mod pipeline;

/// Text preprocessing transformers.
pub mod preprocessing;

/// Model persistence.
pub mod serialization;

/// SDCA training loop orchestration.
pub mod trainer;

/// Dense feature vectors.
pub mod vector;

pub use error::{Result, SentimentError};
pub use model::linear::{LinearClassifier, Prediction};
pub use pipeline::{InferencePipeline, ModelArtifact, TrainingPipeline};

//! Core traits for preprocessing transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; has hyperparameters and learns from a corpus.
//! - [`FittedTransformer`]: After fitting; ready for inference and serialization.

use crate::error::Result;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// A transformer learns parameters from training data and can then transform
/// new data using those learned parameters. This trait represents the
/// configurable, unfitted state.
///
/// # Example
/// ```
/// use review_sentiment::config::FeaturizerConfig;
/// use review_sentiment::preprocessing::{FittedTransformer, TextFeaturizer, Transformer};
///
/// let corpus = vec!["good food".to_string(), "bad food".to_string()];
/// let fitted = TextFeaturizer::new(FeaturizerConfig::default()).fit(&corpus)?;
/// let v = fitted.transform("good");
/// assert_eq!(v.len(), fitted.n_features_out());
/// # Ok::<(), review_sentiment::error::SentimentError>(())
/// ```
pub trait Transformer: Clone {
    /// Collection the transformer is fitted on.
    type Corpus: ?Sized;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Fit the transformer to the training corpus.
    ///
    /// # Errors
    /// Returns [`SentimentError`](crate::error::SentimentError) if the corpus is empty or the hyperparameters
    /// are invalid.
    fn fit(&self, corpus: &Self::Corpus) -> Result<Self::Fitted>;
}

/// Trait for fitted transformers ready for inference.
///
/// Fitted transformers are immutable, so `transform` may be called from any
/// number of threads at once.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` is pure: equal inputs give equal outputs.
pub trait FittedTransformer: Clone + Send + Sync {
    /// Input item type.
    type Input: ?Sized;
    /// Output of a transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform one item using learned parameters.
    fn transform(&self, input: &Self::Input) -> Self::Output;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    ///
    /// # Errors
    /// Returns [`SentimentError::InvalidArtifact`](crate::error::SentimentError::InvalidArtifact) if the parameters are not
    /// internally consistent.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        crate::serialization::write_params(&self.extract_params(), path)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let params: Self::Params = crate::serialization::read_params(path)?;
        Self::from_params(params)
    }

    /// Number of output dimensions.
    fn n_features_out(&self) -> usize;
}

//! Training and inference pipelines around a single model artifact.
//!
//! A [`ModelArtifact`] bundles everything needed to score a review: the fitted
//! text featurizer, the fitted classifier and the policy that decides which
//! review fields become feature text. It is produced by [`TrainingPipeline`] or
//! loaded from disk, and consumed by [`InferencePipeline`].
//!
//! The whole artifact is persisted as one file, so a saved model can be deployed
//! without re-fitting anything.

use std::path::Path;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, FeaturizerConfig, TextSource};
use crate::dataset::{FeatureDataset, LabeledReview, ReviewSource, UnlabeledReview};
use crate::error::{Result, SentimentError};
use crate::model::linear::{LinearClassifier, LinearParams, Prediction};
use crate::model::{Fitted, InferenceModel};
use crate::preprocessing::{
    FittedTextFeaturizer, FittedTransformer, TextFeaturizer, TextFeaturizerParams, Transformer,
};
use crate::serialization::{read_params, write_params};
use crate::trainer::SdcaTrainer;
use crate::vector::FeatureVector;

/// Version tag written into every persisted artifact.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serializable parameters of a [`ModelArtifact`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifactParams {
    pub format_version: u32,
    pub text_source: TextSource,
    pub featurizer: TextFeaturizerParams,
    pub classifier: LinearParams,
}

/// A fitted featurizer and classifier that agree on the feature layout.
///
/// An artifact is never partially constructed: every constructor checks that
/// the vocabulary size equals the weight-vector length.
#[derive(Clone, Debug)]
pub struct ModelArtifact {
    featurizer: FittedTextFeaturizer,
    classifier: LinearClassifier<Fitted>,
    text_source: TextSource,
}

impl ModelArtifact {
    /// Bundle fitted components.
    ///
    /// # Errors
    /// [`SentimentError::InvalidArtifact`] if the featurizer and classifier
    /// disagree on the number of features.
    pub fn from_parts(
        featurizer: FittedTextFeaturizer,
        classifier: LinearClassifier<Fitted>,
        text_source: TextSource,
    ) -> Result<Self> {
        let artifact = Self {
            featurizer,
            classifier,
            text_source,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks that the vocabulary size matches the weight-vector length.
    pub fn validate(&self) -> Result<()> {
        let vocabulary = self.featurizer.n_features_out();
        let weights = self.classifier.n_features();
        if vocabulary != weights {
            return Err(SentimentError::InvalidArtifact(format!(
                "vocabulary has {} terms but classifier has {} weights",
                vocabulary, weights
            )));
        }
        Ok(())
    }

    pub fn featurizer(&self) -> &FittedTextFeaturizer {
        &self.featurizer
    }

    pub fn classifier(&self) -> &LinearClassifier<Fitted> {
        &self.classifier
    }

    pub fn text_source(&self) -> TextSource {
        self.text_source
    }

    /// Feature vector of a review under this artifact's text policy.
    pub fn featurize(&self, review: &UnlabeledReview) -> FeatureVector {
        let text = self.text_source.select(&review.title, &review.body);
        self.featurizer.transform(&text)
    }

    pub fn extract_params(&self) -> ModelArtifactParams {
        ModelArtifactParams {
            format_version: ARTIFACT_FORMAT_VERSION,
            text_source: self.text_source,
            featurizer: self.featurizer.extract_params(),
            classifier: self.classifier.extract_params(),
        }
    }

    /// Rebuild an artifact from its parameters.
    ///
    /// # Errors
    /// [`SentimentError::InvalidArtifact`] for an unknown format version,
    /// inconsistent featurizer parameters, non-finite weights or a
    /// vocabulary/weights length mismatch.
    pub fn from_params(params: ModelArtifactParams) -> Result<Self> {
        if params.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(SentimentError::InvalidArtifact(format!(
                "unsupported artifact format version {} (expected {})",
                params.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        let featurizer = FittedTextFeaturizer::from_params(params.featurizer)?;
        let classifier = LinearClassifier::<Fitted>::from_params(params.classifier)?;
        Self::from_parts(featurizer, classifier, params.text_source)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_params(&self.extract_params(), path.as_ref())?;
        info!("Saved model artifact to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let params: ModelArtifactParams = read_params(path.as_ref())?;
        let artifact = Self::from_params(params)?;
        info!(
            "Loaded model artifact from {} ({} features)",
            path.as_ref().display(),
            artifact.featurizer.n_features_out()
        );
        Ok(artifact)
    }
}

/// Fits a featurizer and a classifier from labeled reviews.
#[derive(Clone, Debug)]
pub struct TrainingPipeline {
    featurizer: TextFeaturizer,
    trainer: SdcaTrainer,
    text_source: TextSource,
}

impl TrainingPipeline {
    pub fn new(featurizer: FeaturizerConfig, trainer: SdcaTrainer, text_source: TextSource) -> Self {
        Self {
            featurizer: TextFeaturizer::new(featurizer),
            trainer,
            text_source,
        }
    }

    /// Pipeline configured from the featurizer, trainer and text-source
    /// sections of `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            config.featurizer.clone(),
            SdcaTrainer::from_config(&config.trainer)?,
            config.text_source,
        ))
    }

    /// Trains a model artifact.
    ///
    /// Either returns a complete artifact or an error; nothing is kept from a
    /// failed run.
    ///
    /// # Errors
    /// - [`SentimentError::EmptyDataset`] if `reviews` is empty.
    /// - [`SentimentError::InsufficientData`] if only one label is present.
    pub fn train(&self, reviews: &[LabeledReview]) -> Result<ModelArtifact> {
        if reviews.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "cannot train on zero reviews".to_string(),
            ));
        }

        let texts: Vec<String> = reviews
            .iter()
            .map(|r| self.text_source.select(&r.title, &r.body))
            .collect();
        let featurizer = self.featurizer.fit(&texts)?;
        info!(
            "Fitted featurizer on {} reviews: {} vocabulary terms",
            reviews.len(),
            featurizer.n_features_out()
        );

        let features: Vec<FeatureVector> =
            texts.par_iter().map(|t| featurizer.transform(t)).collect();
        let labels: Vec<bool> = reviews.iter().map(|r| r.label).collect();
        let data = FeatureDataset::new(features, labels)?;

        let model = LinearClassifier::new(featurizer.n_features_out());
        let (classifier, report) = self.trainer.fit_with_report(model, &data)?;
        info!(
            "Trained classifier in {} epochs (duality gap {:.3e}, bias {:.4})",
            report.epochs,
            report.duality_gap,
            classifier.bias()
        );

        ModelArtifact::from_parts(featurizer, classifier, self.text_source)
    }

    /// Reads every labeled record from `source` and trains on them.
    pub fn train_from_source<S: ReviewSource + ?Sized>(&self, source: &S) -> Result<ModelArtifact> {
        self.train(&source.labeled()?)
    }
}

/// Scores reviews with an immutable [`ModelArtifact`].
///
/// `InferencePipeline` is `Send + Sync`; any number of threads may call
/// [`predict`](Self::predict) at once.
#[derive(Clone, Debug)]
pub struct InferencePipeline {
    artifact: ModelArtifact,
}

impl InferencePipeline {
    /// # Errors
    /// [`SentimentError::InvalidArtifact`] if the artifact is inconsistent.
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Classify one review.
    pub fn predict(&self, review: &UnlabeledReview) -> Result<Prediction> {
        let features = self.artifact.featurize(review);
        self.artifact.classifier.predict(&features)
    }

    /// Classify many reviews in parallel. Output order matches input order.
    pub fn predict_batch(&self, reviews: &[UnlabeledReview]) -> Result<Vec<Prediction>> {
        reviews.par_iter().map(|r| self.predict(r)).collect()
    }
}

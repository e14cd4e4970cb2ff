//! Train-or-load workflow behind the `review-sentiment` binary.
//!
//! The process starts with no model. If an artifact is persisted at the
//! configured path it is loaded, otherwise one is trained from the training file
//! and saved. The test file is then scored and every prediction is printed.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use crate::config::{AppConfig, TextSource};
use crate::dataset::{CsvReviewReader, CsvSource, UnlabeledReview};
use crate::error::Result;
use crate::metrics::BinaryMetrics;
use crate::model::linear::Prediction;
use crate::pipeline::{InferencePipeline, ModelArtifact, TrainingPipeline};

/// Classify product reviews as positive or negative.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "review-sentiment")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CliArgs {
    /// Verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where the trained model is stored
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Labeled training data, used when no model is stored
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Reviews to classify
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Feed "title body" to the featurizer instead of the body alone
    #[arg(long)]
    pub include_title: bool,

    /// Train a new model even if one is stored
    #[arg(long)]
    pub retrain: bool,

    /// Also report accuracy metrics against the test labels
    #[arg(long)]
    pub evaluate: bool,
}

impl CliArgs {
    /// Resolve the effective configuration: defaults, then the JSON file,
    /// then command-line overrides.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(path) = &self.model {
            config.model_path = path.clone();
        }
        if let Some(path) = &self.train {
            config.train_path = path.clone();
        }
        if let Some(path) = &self.test {
            config.test_path = path.clone();
        }
        if self.include_title {
            config.text_source = TextSource::TitleAndBody;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            retrain: self.retrain,
            evaluate: self.evaluate,
        }
    }
}

/// Switches that change the workflow rather than the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub retrain: bool,
    pub evaluate: bool,
}

/// Whether a usable artifact file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    Persisted(PathBuf),
    Absent(PathBuf),
}

impl ArtifactLocation {
    pub fn probe(path: &Path) -> Self {
        if path.is_file() {
            ArtifactLocation::Persisted(path.to_path_buf())
        } else {
            ArtifactLocation::Absent(path.to_path_buf())
        }
    }

    /// Load the artifact stored here, or train one from `config` and store it.
    pub fn resolve(self, config: &AppConfig) -> Result<ModelArtifact> {
        match self {
            ArtifactLocation::Persisted(path) => {
                info!("Loading model from {}", path.display());
                ModelArtifact::load_from_file(&path)
            }
            ArtifactLocation::Absent(path) => {
                info!(
                    "No model at {}; training from {}",
                    path.display(),
                    config.train_path.display()
                );
                let source = CsvSource::new(
                    &config.train_path,
                    CsvReviewReader::new(config.csv.clone()),
                );
                let artifact = TrainingPipeline::from_config(config)?.train_from_source(&source)?;
                artifact.save_to_file(&path)?;
                Ok(artifact)
            }
        }
    }
}

/// Model lifecycle of one process: `NoModel` until an artifact is trained or
/// loaded, then `Ready` for the rest of the run.
#[derive(Debug, Clone)]
pub enum ModelState {
    NoModel,
    Ready(ModelArtifact),
}

impl ModelState {
    /// Move to `Ready` by loading from or training into `location`.
    ///
    /// A `Ready` state is returned unchanged: there is no retraining in place.
    pub fn advance(self, config: &AppConfig, location: ArtifactLocation) -> Result<Self> {
        match self {
            ready @ ModelState::Ready(_) => Ok(ready),
            ModelState::NoModel => location.resolve(config).map(ModelState::Ready),
        }
    }

    pub fn artifact(&self) -> Option<&ModelArtifact> {
        match self {
            ModelState::Ready(artifact) => Some(artifact),
            ModelState::NoModel => None,
        }
    }
}

/// Load the persisted model, or train and persist one.
///
/// With `retrain`, an existing artifact is ignored and overwritten.
pub fn ensure_model(config: &AppConfig, retrain: bool) -> Result<ModelArtifact> {
    let location = if retrain {
        ArtifactLocation::Absent(config.model_path.clone())
    } else {
        ArtifactLocation::probe(&config.model_path)
    };
    location.resolve(config)
}

/// One prediction block as printed by the binary, without the trailing blank line.
pub fn format_prediction(review: &UnlabeledReview, prediction: &Prediction) -> String {
    format!(
        "Review: {}\nPredicted Sentiment: {}\nProbability: {:.2}\nScore: {:.2}\n",
        review.body,
        if prediction.predicted_label {
            "Positive"
        } else {
            "Negative"
        },
        prediction.probability,
        prediction.score
    )
}

/// Run the whole workflow, writing predictions to `out`.
///
/// The test file is read completely before anything is written, so a malformed
/// record produces no output at all.
pub fn run<W: Write>(config: &AppConfig, options: RunOptions, out: &mut W) -> Result<()> {
    let artifact = ensure_model(config, options.retrain)?;
    let pipeline = InferencePipeline::new(artifact)?;

    let reader = CsvReviewReader::new(config.csv.clone());
    let (reviews, labels): (Vec<UnlabeledReview>, Option<Vec<bool>>) = if options.evaluate {
        let labeled = reader.read_labeled(&config.test_path)?;
        let labels: Vec<bool> = labeled.iter().map(|r| r.label).collect();
        (labeled.iter().map(|r| r.to_unlabeled()).collect(), Some(labels))
    } else {
        (reader.read_unlabeled(&config.test_path)?, None)
    };
    info!(
        "Scoring {} reviews from {}",
        reviews.len(),
        config.test_path.display()
    );

    let predictions = pipeline.predict_batch(&reviews)?;
    for (review, prediction) in reviews.iter().zip(&predictions) {
        writeln!(out, "{}", format_prediction(review, prediction))?;
    }

    if let Some(labels) = labels {
        let metrics = BinaryMetrics::compute(&labels, &predictions)?;
        writeln!(out, "{}", metrics)?;
    }
    out.flush()?;
    Ok(())
}

//! Configuration structs for featurization, training and the command-line workflow.
//!
//! Everything here is plain data with `serde` derives so a full [`AppConfig`] can be
//! kept in a JSON file next to the data it describes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::csv::{ColumnMapping, ReviewField};
use crate::error::{Result, SentimentError};

/// How term counts are turned into feature values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weighting {
    /// Raw term counts.
    #[default]
    TermFrequency,
    /// Term counts scaled by smoothed inverse document frequency.
    TfIdf,
}

/// Which review fields make up the text that gets featurized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextSource {
    #[default]
    Body,
    /// Title and body joined by a single space.
    TitleAndBody,
}

impl TextSource {
    /// Select the feature text of a review.
    pub fn select(&self, title: &str, body: &str) -> String {
        match self {
            TextSource::Body => body.to_string(),
            TextSource::TitleAndBody => format!("{} {}", title, body),
        }
    }
}

/// Hyperparameters of the text featurizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerConfig {
    /// Inclusive range of word n-gram lengths.
    pub ngram_range: (usize, usize),
    /// Inclusive range of character n-gram lengths, taken within each token.
    /// `None` disables character n-grams.
    pub char_ngram_range: Option<(usize, usize)>,
    pub weighting: Weighting,
    /// Keep at most this many terms (most frequent first).
    pub max_vocabulary_size: Option<usize>,
    /// Drop terms seen fewer times than this across the corpus.
    pub min_frequency: usize,
    /// Scale every vector to unit L2 norm.
    pub normalize: bool,
}

impl Default for FeaturizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            char_ngram_range: None,
            weighting: Weighting::TermFrequency,
            max_vocabulary_size: None,
            min_frequency: 1,
            normalize: true,
        }
    }
}

impl FeaturizerConfig {
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_char_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.char_ngram_range = Some((min_n, max_n));
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_max_vocabulary_size(mut self, size: usize) -> Self {
        self.max_vocabulary_size = Some(size);
        self
    }

    pub fn with_min_frequency(mut self, min_frequency: usize) -> Self {
        self.min_frequency = min_frequency;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SentimentError::InvalidInput(format!(
                "ngram_range must satisfy 1 <= min <= max, got ({}, {})",
                min_n, max_n
            )));
        }
        if let Some((min_n, max_n)) = self.char_ngram_range {
            if min_n == 0 || min_n > max_n {
                return Err(SentimentError::InvalidInput(format!(
                    "char_ngram_range must satisfy 1 <= min <= max, got ({}, {})",
                    min_n, max_n
                )));
            }
        }
        if self.max_vocabulary_size == Some(0) {
            return Err(SentimentError::InvalidInput(
                "max_vocabulary_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hyperparameters of the SDCA logistic-regression trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdcaConfig {
    /// L2 regularization strength (lambda).
    pub l2_regularization: f64,
    /// Maximum number of passes over the data.
    pub max_epochs: usize,
    /// Training stops once the duality gap drops below this value.
    pub convergence_tolerance: f64,
    /// Seed of the example-order shuffle.
    pub seed: u64,
    pub shuffle: bool,
}

impl Default for SdcaConfig {
    fn default() -> Self {
        Self {
            l2_regularization: 1e-3,
            max_epochs: 100,
            convergence_tolerance: 1e-4,
            seed: 0x5EED,
            shuffle: true,
        }
    }
}

impl SdcaConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.l2_regularization > 0.0) || !self.l2_regularization.is_finite() {
            return Err(SentimentError::InvalidInput(format!(
                "l2_regularization must be a positive number, got {}",
                self.l2_regularization
            )));
        }
        if self.max_epochs == 0 {
            return Err(SentimentError::InvalidInput(
                "max_epochs must be positive".to_string(),
            ));
        }
        if !(self.convergence_tolerance >= 0.0) {
            return Err(SentimentError::InvalidInput(format!(
                "convergence_tolerance must be non-negative, got {}",
                self.convergence_tolerance
            )));
        }
        Ok(())
    }
}

/// Layout of the delimited review files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub has_header: bool,
    pub columns: ColumnMapping,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            columns: ColumnMapping::new(vec![
                (0, ReviewField::Label),
                (1, ReviewField::Title),
                (2, ReviewField::Body),
            ]),
        }
    }
}

/// Everything the train-or-load workflow needs, passed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub text_source: TextSource,
    pub featurizer: FeaturizerConfig,
    pub trainer: SdcaConfig,
    pub csv: CsvOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.bin"),
            train_path: Path::new("Data").join("train-reviews-micro.csv"),
            test_path: Path::new("Data").join("test-reviews.csv"),
            text_source: TextSource::Body,
            featurizer: FeaturizerConfig::default(),
            trainer: SdcaConfig::default(),
            csv: CsvOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.featurizer.validate()?;
        self.trainer.validate()
    }
}

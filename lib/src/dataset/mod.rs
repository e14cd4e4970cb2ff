//! Review records and the sources that produce them.
//!
//! # Core Concepts
//!
//! - **LabeledReview**: a training row: sentiment label, title and body.
//! - **UnlabeledReview**: a row to score: title and body only.
//! - **ReviewSource**: a finite, restartable producer of records in file order.
//!   Every call re-reads the underlying data from the start.
//! - **FeatureDataset**: featurized rows paired with labels, as consumed by the trainer.
//!
//! # Example
//!
//! ```rust
//! use review_sentiment::dataset::{LabeledReview, ReviewSource};
//!
//! let rows = vec![
//!     LabeledReview::new(true, "", "Great product"),
//!     LabeledReview::new(false, "", "Terrible service"),
//! ];
//!
//! let unlabeled = rows.unlabeled().unwrap();
//! assert_eq!(unlabeled[1].body, "Terrible service");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::vector::FeatureVector;

pub mod csv;
pub use self::csv::{ColumnMapping, CsvReviewReader, CsvSource, ReviewField};

/// A review with a known sentiment (`true` = positive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledReview {
    pub label: bool,
    pub title: String,
    pub body: String,
}

impl LabeledReview {
    pub fn new(label: bool, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label,
            title: title.into(),
            body: body.into(),
        }
    }

    /// The same review with its label dropped.
    pub fn to_unlabeled(&self) -> UnlabeledReview {
        UnlabeledReview {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// A review to be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlabeledReview {
    pub title: String,
    pub body: String,
}

impl UnlabeledReview {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// A review consisting of body text only.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self::new(String::new(), body)
    }
}

/// Abstract producer of review records.
///
/// Sources are restartable: calling a method twice yields the same records in the
/// same order. A malformed record aborts the whole read with
/// [`SentimentError::Ingestion`](crate::error::SentimentError::Ingestion); no partial
/// record list is ever returned.
pub trait ReviewSource {
    /// All records with their labels.
    fn labeled(&self) -> Result<Vec<LabeledReview>>;

    /// All records without labels. Sources without a label column only support this.
    fn unlabeled(&self) -> Result<Vec<UnlabeledReview>>;
}

/// In-memory rows behave as a source, which keeps tests and callers free of files.
impl ReviewSource for Vec<LabeledReview> {
    fn labeled(&self) -> Result<Vec<LabeledReview>> {
        Ok(self.clone())
    }

    fn unlabeled(&self) -> Result<Vec<UnlabeledReview>> {
        Ok(self.iter().map(LabeledReview::to_unlabeled).collect())
    }
}

/// Feature vectors and their labels, held in memory.
///
/// All rows share one dimensionality; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct FeatureDataset {
    features: Vec<FeatureVector>,
    labels: Vec<bool>,
}

impl FeatureDataset {
    pub fn new(features: Vec<FeatureVector>, labels: Vec<bool>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(SentimentError::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "no feature rows to train on".to_string(),
            ));
        }
        let n_features = features[0].len();
        if !features.iter().all(|row| row.len() == n_features) {
            return Err(SentimentError::InvalidInput(
                "all rows must have the same number of features".to_string(),
            ));
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, FeatureVector::len)
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    /// Number of positive and negative rows.
    pub fn class_counts(&self) -> (usize, usize) {
        let positive = self.labels.iter().filter(|l| **l).count();
        (positive, self.labels.len() - positive)
    }
}

//! Metrics for evaluating binary classifiers.

use std::fmt;

use crate::error::{Result, SentimentError};
use crate::model::linear::Prediction;

/// Probabilities are clipped to `[EPS, 1 - EPS]` before taking logarithms.
const EPS: f64 = 1e-15;

/// Confusion counts and summary scores over a labeled test set.
///
/// # Example
/// ```
/// use review_sentiment::metrics::BinaryMetrics;
/// use review_sentiment::model::linear::Prediction;
///
/// let labels = [true, false];
/// let preds = [Prediction::from_score(2.0), Prediction::from_score(-1.0)];
/// let m = BinaryMetrics::compute(&labels, &preds)?;
/// assert_eq!(m.accuracy, 1.0);
/// # Ok::<(), review_sentiment::error::SentimentError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub accuracy: f64,
    /// `tp / (tp + fp)`, zero when nothing was predicted positive.
    pub precision: f64,
    /// `tp / (tp + fn)`, zero when there are no positive labels.
    pub recall: f64,
    pub f1: f64,
    /// Mean negative log-likelihood of the true labels.
    pub log_loss: f64,
}

impl BinaryMetrics {
    /// Compare predictions against true labels.
    ///
    /// # Errors
    /// - [`SentimentError::InvalidInput`] if the slices differ in length.
    /// - [`SentimentError::EmptyDataset`] if there is nothing to evaluate.
    pub fn compute(labels: &[bool], predictions: &[Prediction]) -> Result<Self> {
        if labels.len() != predictions.len() {
            return Err(SentimentError::InvalidInput(format!(
                "{} labels but {} predictions",
                labels.len(),
                predictions.len()
            )));
        }
        if labels.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "no labeled reviews to evaluate".to_string(),
            ));
        }

        let (mut tp, mut fp, mut tn, mut fn_) = (0, 0, 0, 0);
        let mut nll = 0.0;
        for (&label, pred) in labels.iter().zip(predictions) {
            match (label, pred.predicted_label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
            let p = (pred.probability as f64).clamp(EPS, 1.0 - EPS);
            nll -= if label { p.ln() } else { (1.0 - p).ln() };
        }

        let n = labels.len() as f64;
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            true_positives: tp,
            false_positives: fp,
            true_negatives: tn,
            false_negatives: fn_,
            accuracy: (tp + tn) as f64 / n,
            precision,
            recall,
            f1,
            log_loss: nll / n,
        })
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

impl fmt::Display for BinaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Evaluated: {}", self.total())?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall: {:.4}", self.recall)?;
        writeln!(f, "F1: {:.4}", self.f1)?;
        write!(f, "Log-loss: {:.4}", self.log_loss)
    }
}

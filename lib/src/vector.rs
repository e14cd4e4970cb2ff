//! Dense feature vectors produced by the text featurizer.

use serde::{Deserialize, Serialize};

/// A fixed-length feature vector.
///
/// Every vector produced by one fitted featurizer has the same length and the same
/// dimension-to-term mapping. Values are stored as `f32`; arithmetic against model
/// weights is carried out in `f64`.
///
/// # Example
/// ```
/// use review_sentiment::vector::FeatureVector;
///
/// let v = FeatureVector::new(vec![1.0, 0.0, 2.0]);
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.dot(&[0.5, 9.0, 1.0]), 2.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn zeros(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.values.clone()
    }

    /// Iterator over `(dimension, value)` pairs with a non-zero value.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v as f64))
    }

    /// Dot product with a weight slice, accumulated in `f64`.
    ///
    /// # Panics
    /// If `weights` is shorter than the vector.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.nonzero().map(|(i, v)| v * weights[i]).sum()
    }

    /// Squared L2 norm in `f64`.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| (*v as f64) * (*v as f64)).sum()
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

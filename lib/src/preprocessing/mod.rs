//! Text preprocessing transformers.
//!
//! Transformers follow the same fitted/unfitted split as models in this crate:
//!
//! - [`Transformer`]: unfitted transformer carrying hyperparameters
//! - [`FittedTransformer`]: fitted transformer ready for inference and serialization
//!
//! # Available Transformers
//!
//! - [`TextFeaturizer`]: bag-of-words / word n-gram featurizer with TF or TF-IDF
//!   weighting and optional L2 normalization
//!
//! # Example
//!
//! ```
//! use review_sentiment::config::FeaturizerConfig;
//! use review_sentiment::preprocessing::{FittedTransformer, TextFeaturizer, Transformer};
//!
//! let corpus = vec!["Great product".to_string(), "Terrible service".to_string()];
//! let fitted = TextFeaturizer::new(FeaturizerConfig::default()).fit(&corpus)?;
//!
//! // Unknown words contribute nothing but never change the length.
//! let v = fitted.transform("great zebra");
//! assert_eq!(v.len(), fitted.n_features_out());
//! # Ok::<(), review_sentiment::error::SentimentError>(())
//! ```

pub mod text;
pub mod traits;

pub use text::{FittedTextFeaturizer, TextFeaturizer, TextFeaturizerParams};
pub use traits::{FittedTransformer, Transformer};

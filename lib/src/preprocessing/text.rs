//! Bag-of-words text featurization.
//!
//! Text is lowercased and split on non-alphanumeric boundaries; word n-grams in the
//! configured range become vocabulary terms, optionally followed by character
//! n-grams of each token. Each term gets a dimension index in the order it is
//! first seen during fitting, so the layout is stable across runs.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{FeaturizerConfig, Weighting};
use crate::error::{Result, SentimentError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::vector::FeatureVector;

/// Lowercase `text` and split it on every non-alphanumeric character.
///
/// ```
/// use review_sentiment::preprocessing::text::tokenize;
///
/// assert_eq!(tokenize("Loved it!! 10/10"), vec!["loved", "it", "10", "10"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Word n-grams of `tokens` for every length in `min_n..=max_n`, shortest first.
pub fn ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n == 0 || n > tokens.len() {
            continue;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}

/// Marks character n-gram terms. Tokens never contain `#`, so a character term
/// cannot collide with a word term.
pub const CHAR_NGRAM_PREFIX: &str = "#c:";

/// Character n-grams of every token for each length in `min_n..=max_n`, shortest
/// first. Tokens are wrapped as `<token>` so prefixes and suffixes get their own
/// terms.
///
/// ```
/// use review_sentiment::preprocessing::text::char_ngrams;
///
/// assert_eq!(char_ngrams(&["ok".to_string()], (3, 3)), vec!["#c:<ok", "#c:ok>"]);
/// ```
pub fn char_ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let wrapped: Vec<Vec<char>> = tokens
        .iter()
        .map(|t| std::iter::once('<').chain(t.chars()).chain(std::iter::once('>')).collect())
        .collect();

    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n == 0 {
            continue;
        }
        for chars in &wrapped {
            if n > chars.len() {
                continue;
            }
            terms.extend(chars.windows(n).map(|w| {
                let mut term = String::from(CHAR_NGRAM_PREFIX);
                term.extend(w);
                term
            }));
        }
    }
    terms
}

/// All terms of `text` under `config`: word n-grams, then character n-grams.
pub fn extract_terms(text: &str, config: &FeaturizerConfig) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = ngrams(&tokens, config.ngram_range);
    if let Some(range) = config.char_ngram_range {
        terms.extend(char_ngrams(&tokens, range));
    }
    terms
}

/// Unfitted text featurizer holding only hyperparameters.
#[derive(Clone, Debug, Default)]
pub struct TextFeaturizer {
    config: FeaturizerConfig,
}

impl TextFeaturizer {
    pub fn new(config: FeaturizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeaturizerConfig {
        &self.config
    }
}

/// Serializable parameters for a fitted [`TextFeaturizer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextFeaturizerParams {
    /// Vocabulary terms in dimension order.
    pub terms: Vec<String>,
    /// Inverse document frequency per term, present for TF-IDF weighting.
    pub idf: Option<Vec<f32>>,
    pub config: FeaturizerConfig,
}

/// Fitted featurizer: a frozen vocabulary plus weighting options.
#[derive(Clone, Debug)]
pub struct FittedTextFeaturizer {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    config: FeaturizerConfig,
}

impl FittedTextFeaturizer {
    /// Vocabulary terms in dimension order.
    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    /// Dimension of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self) -> Option<&[f32]> {
        self.idf.as_deref()
    }

    pub fn config(&self) -> &FeaturizerConfig {
        &self.config
    }
}

/// Per-term statistics gathered while scanning the corpus.
struct TermStats {
    term: String,
    count: usize,
    doc_freq: usize,
}

impl Transformer for TextFeaturizer {
    type Corpus = [String];
    type Params = TextFeaturizerParams;
    type Fitted = FittedTextFeaturizer;

    fn fit(&self, corpus: &[String]) -> Result<FittedTextFeaturizer> {
        self.config.validate()?;
        if corpus.is_empty() {
            return Err(SentimentError::EmptyDataset(
                "Cannot fit TextFeaturizer on an empty corpus".to_string(),
            ));
        }

        let mut stats: Vec<TermStats> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for doc in corpus {
            let mut in_doc: HashSet<usize> = HashSet::new();
            for term in extract_terms(doc, &self.config) {
                let idx = match seen.get(&term) {
                    Some(&idx) => idx,
                    None => {
                        seen.insert(term.clone(), stats.len());
                        stats.push(TermStats {
                            term,
                            count: 0,
                            doc_freq: 0,
                        });
                        stats.len() - 1
                    }
                };
                stats[idx].count += 1;
                if in_doc.insert(idx) {
                    stats[idx].doc_freq += 1;
                }
            }
        }

        // Positions into `stats`, still in first-seen order.
        let mut kept: Vec<usize> = (0..stats.len())
            .filter(|&i| stats[i].count >= self.config.min_frequency)
            .collect();

        if let Some(cap) = self.config.max_vocabulary_size {
            if kept.len() > cap {
                kept.sort_by(|&a, &b| stats[b].count.cmp(&stats[a].count).then(a.cmp(&b)));
                kept.truncate(cap);
                kept.sort_unstable();
            }
        }

        let n_docs = corpus.len() as f64;
        let idf = match self.config.weighting {
            Weighting::TermFrequency => None,
            Weighting::TfIdf => Some(
                kept.iter()
                    .map(|&i| ((1.0 + n_docs) / (1.0 + stats[i].doc_freq as f64)).ln() as f32 + 1.0)
                    .collect(),
            ),
        };

        let terms: Vec<String> = kept
            .into_iter()
            .map(|i| std::mem::take(&mut stats[i].term))
            .collect();

        log::info!(
            "fitted text featurizer: {} documents, {} terms",
            corpus.len(),
            terms.len()
        );

        FittedTextFeaturizer::from_params(TextFeaturizerParams {
            terms,
            idf,
            config: self.config.clone(),
        })
    }
}

impl FittedTransformer for FittedTextFeaturizer {
    type Input = str;
    type Output = FeatureVector;
    type Params = TextFeaturizerParams;

    fn transform(&self, text: &str) -> FeatureVector {
        let mut values = vec![0.0f64; self.terms.len()];
        for term in extract_terms(text, &self.config) {
            if let Some(&i) = self.index.get(&term) {
                values[i] += 1.0;
            }
        }

        if let Some(ref idf) = self.idf {
            for (v, w) in values.iter_mut().zip(idf.iter()) {
                *v *= *w as f64;
            }
        }

        if self.config.normalize {
            let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                values.iter_mut().for_each(|v| *v /= norm);
            }
        }

        FeatureVector::new(values.into_iter().map(|v| v as f32).collect())
    }

    fn extract_params(&self) -> TextFeaturizerParams {
        TextFeaturizerParams {
            terms: self.terms.clone(),
            idf: self.idf.clone(),
            config: self.config.clone(),
        }
    }

    fn from_params(params: TextFeaturizerParams) -> Result<Self> {
        params
            .config
            .validate()
            .map_err(|e| SentimentError::InvalidArtifact(e.to_string()))?;

        if let Some(ref idf) = params.idf {
            if idf.len() != params.terms.len() {
                return Err(SentimentError::InvalidArtifact(format!(
                    "featurizer has {} terms but {} idf values",
                    params.terms.len(),
                    idf.len()
                )));
            }
        }

        let mut index = HashMap::with_capacity(params.terms.len());
        for (i, term) in params.terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(SentimentError::InvalidArtifact(format!(
                    "duplicate vocabulary term '{}'",
                    term
                )));
            }
        }

        Ok(Self {
            terms: params.terms,
            index,
            idf: params.idf,
            config: params.config,
        })
    }

    fn n_features_out(&self) -> usize {
        self.terms.len()
    }
}

//! Seeded generator of labeled reviews.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use review_sentiment::dataset::{LabeledReview, UnlabeledReview};

const POSITIVE: &[&str] = &[
    "great", "loved", "excellent", "perfect", "fast", "friendly", "recommend", "happy",
    "works", "amazing",
];
const NEGATIVE: &[&str] = &[
    "terrible", "awful", "broken", "slow", "rude", "refund", "disappointed", "worst",
    "cheap", "returned",
];
const NEUTRAL: &[&str] = &[
    "product", "service", "delivery", "price", "box", "it", "the", "was", "and", "order",
    "item", "seller", "quality", "size", "color",
];

/// A reproducible corpus of short labeled reviews.
///
/// Each review mixes a few sentiment words from its own class with neutral
/// filler and, with some probability, one word from the opposite class.
pub struct SyntheticReviews {
    rng: StdRng,
    words_per_review: usize,
    noise: f64,
}

impl SyntheticReviews {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            words_per_review: 12,
            noise: 0.2,
        }
    }

    pub fn words_per_review(mut self, n: usize) -> Self {
        self.words_per_review = n.max(1);
        self
    }

    /// Probability of one opposite-class word per review.
    pub fn noise(mut self, p: f64) -> Self {
        self.noise = p.clamp(0.0, 1.0);
        self
    }

    pub fn labeled(&mut self, n: usize) -> Vec<LabeledReview> {
        (0..n)
            .map(|i| {
                let label = i % 2 == 0;
                let body = self.body(label);
                LabeledReview::new(label, "", body)
            })
            .collect()
    }

    pub fn unlabeled(&mut self, n: usize) -> Vec<UnlabeledReview> {
        self.labeled(n)
            .into_iter()
            .map(|r| r.to_unlabeled())
            .collect()
    }

    fn body(&mut self, label: bool) -> String {
        let (own, other) = if label {
            (POSITIVE, NEGATIVE)
        } else {
            (NEGATIVE, POSITIVE)
        };
        let mut words = Vec::with_capacity(self.words_per_review);
        for _ in 0..self.words_per_review {
            let pool = if self.rng.random_bool(0.3) { own } else { NEUTRAL };
            if let Some(w) = pool.choose(&mut self.rng) {
                words.push(*w);
            }
        }
        if self.rng.random_bool(self.noise) {
            if let Some(w) = other.choose(&mut self.rng) {
                words.push(*w);
            }
        }
        words.join(" ")
    }
}

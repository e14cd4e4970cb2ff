//! Benchmark utilities for review-sentiment.
//!
//! Provides a synthetic review corpus so benchmarks run without external data.

pub mod data;

pub use data::SyntheticReviews;

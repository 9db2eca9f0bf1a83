//! carelens-sentiment
//!
//! Two-stage sentiment inference: a lexicon-based polarity scorer followed
//! by a generated explanation with a deterministic fallback.

pub mod analyzer;
pub mod fusion;
mod lexicon;

pub use analyzer::SentimentAnalyzer;
pub use fusion::{Explanation, ExplanationSource, FusedSentiment, SentimentFusion};

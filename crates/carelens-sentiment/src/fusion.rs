//! Sentiment scoring fused with a generated, human-readable explanation.
//!
//! The explanation stage must never block or blank the result: any failure
//! of the generator (error, timeout, empty output, prompt echoed back) falls
//! through to [`fallback_explanation`], which is built purely from the scores.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use carelens_core::capability::GeneratorRef;
use carelens_core::models::request::PromptRequest;
use carelens_core::models::sentiment::SentimentResult;
use carelens_prompt::PromptAssembler;

use crate::analyzer::SentimentAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub text: String,
    pub source: ExplanationSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FusedSentiment {
    pub sentiment: SentimentResult,
    pub explanation: Explanation,
}

pub struct SentimentFusion {
    analyzer: SentimentAnalyzer,
    generator: GeneratorRef,
    assembler: Arc<PromptAssembler>,
    timeout: Duration,
}

impl SentimentFusion {
    pub fn new(generator: GeneratorRef, assembler: Arc<PromptAssembler>, timeout: Duration) -> Self {
        Self {
            analyzer: SentimentAnalyzer::new(),
            generator,
            assembler,
            timeout,
        }
    }

    /// Score `text` and explain the result.
    pub async fn analyze(&self, text: &str) -> FusedSentiment {
        let sentiment = self.analyzer.analyze(text);
        info!(
            label = %sentiment.label,
            compound = sentiment.scores.compound,
            "sentiment scored"
        );
        let explanation = self.explain(text, &sentiment).await;
        FusedSentiment {
            sentiment,
            explanation,
        }
    }

    /// Ask the generator for a short account of the speaker's emotional
    /// state, falling back to the templated explanation on any failure.
    pub async fn explain(&self, transcript: &str, sentiment: &SentimentResult) -> Explanation {
        let request = PromptRequest::SentimentExplanation {
            transcript: transcript.to_string(),
            sentiment: *sentiment,
        };
        let prompt = match self.assembler.render(&request) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "explanation prompt failed to render, using fallback");
                return fallback(sentiment);
            }
        };

        let generated = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "explanation generation failed, using fallback");
                return fallback(sentiment);
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "explanation generation timed out, using fallback");
                return fallback(sentiment);
            }
        };

        let cleaned = generated.replace(prompt.as_str(), "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            warn!("explanation generation returned nothing usable, using fallback");
            return fallback(sentiment);
        }

        Explanation {
            text: cleaned.to_string(),
            source: ExplanationSource::Generated,
        }
    }
}

fn fallback(sentiment: &SentimentResult) -> Explanation {
    Explanation {
        text: fallback_explanation(sentiment),
        source: ExplanationSource::Fallback,
    }
}

/// Deterministic explanation built only from the label and scores. Always
/// non-empty and always names the label and all three percentages.
pub fn fallback_explanation(sentiment: &SentimentResult) -> String {
    let pct = sentiment.scores.percentages();
    format!(
        "The user feels {lower} based on their statement (overall sentiment: {label}, \
         compound score {compound:.2}). With {pos:.1}% positive, {neg:.1}% negative, \
         and {neu:.1}% neutral sentiment, they might be reacting to recent events. \
         Their emotions could stem from personal experiences or external factors.",
        lower = sentiment.label.as_str().to_lowercase(),
        label = sentiment.label,
        compound = sentiment.scores.compound,
        pos = pct.positive,
        neg = pct.negative,
        neu = pct.neutral,
    )
}

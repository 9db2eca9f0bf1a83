use std::fmt;

use serde::{Deserialize, Serialize};

/// Compound score at or above which text reads as positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which text reads as negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical polarity breakdown.
///
/// `positive`, `negative` and `neutral` are proportions in `[0, 1]`;
/// `compound` is the normalised overall polarity in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub compound: f64,
}

/// Score proportions expressed as percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentages {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    pub fn percentages(&self) -> Percentages {
        Percentages {
            positive: self.positive * 100.0,
            negative: self.negative * 100.0,
            neutral: self.neutral * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub scores: SentimentScores,
}

impl SentimentResult {
    pub fn from_scores(scores: SentimentScores) -> Self {
        Self {
            label: SentimentLabel::from_compound(scores.compound),
            scores,
        }
    }
}

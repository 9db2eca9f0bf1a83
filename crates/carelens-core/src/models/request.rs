use std::fmt;

use serde::{Deserialize, Serialize};

use super::sentiment::SentimentResult;

/// Placeholder rendered in place of an absent optional field, so the model
/// is told explicitly that the information is missing.
pub const NOT_PROVIDED: &str = "Not provided";

/// Normalize one optional form value.
///
/// Absent, blank, and the literal `undefined` (what browser clients send for
/// an unset JS variable) all become [`NOT_PROVIDED`]. Anything else is
/// trimmed and kept.
pub fn normalize_field(value: Option<&str>) -> String {
    match value.map(str::trim) {
        None | Some("") | Some("undefined") | Some("null") => NOT_PROVIDED.to_string(),
        Some(v) => v.to_string(),
    }
}

/// Demographic fields as they arrive from a client, all optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDemographics {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
}

/// Demographic fields after sentinel substitution. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: String,
    pub gender: String,
    pub condition: String,
}

impl RawDemographics {
    pub fn normalize(&self) -> Demographics {
        Demographics {
            age: normalize_field(self.age.as_deref()),
            gender: normalize_field(self.gender.as_deref()),
            condition: normalize_field(self.description.as_deref()),
        }
    }
}

/// Kind of prompt, used for logging and template lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    NutritionAnalysis,
    MedicalChat,
    HealthChat,
    HealthReportAnalysis,
    SentimentExplanation,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::NutritionAnalysis => "nutrition_analysis",
            TaskKind::MedicalChat => "medical_chat",
            TaskKind::HealthChat => "health_chat",
            TaskKind::HealthReportAnalysis => "health_report_analysis",
            TaskKind::SentimentExplanation => "sentiment_explanation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured input for one prompt template.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptRequest {
    NutritionAnalysis {
        demographics: Demographics,
        ingredients: String,
    },
    MedicalChat {
        message: String,
    },
    HealthChat {
        message: String,
    },
    HealthReportAnalysis {
        demographics: Demographics,
        report_text: String,
        query: String,
    },
    SentimentExplanation {
        transcript: String,
        sentiment: SentimentResult,
    },
}

impl PromptRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            PromptRequest::NutritionAnalysis { .. } => TaskKind::NutritionAnalysis,
            PromptRequest::MedicalChat { .. } => TaskKind::MedicalChat,
            PromptRequest::HealthChat { .. } => TaskKind::HealthChat,
            PromptRequest::HealthReportAnalysis { .. } => TaskKind::HealthReportAnalysis,
            PromptRequest::SentimentExplanation { .. } => TaskKind::SentimentExplanation,
        }
    }
}

/// Formatted prompt handed to a generator. Produced, never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RenderedPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use tera::{Context, Tera};

use carelens_core::models::request::{Demographics, NOT_PROVIDED, PromptRequest, RenderedPrompt};

use crate::error::PromptError;
use crate::templates;

/// Renders [`PromptRequest`]s through the fixed template set.
///
/// Rendering is a pure function of the request: no clock, no randomness,
/// no I/O.
pub struct PromptAssembler {
    tera: Tera,
}

impl PromptAssembler {
    pub fn new() -> Result<Self, PromptError> {
        let mut tera = Tera::default();
        // Prompts are plain text; user content must reach the model unescaped.
        tera.autoescape_on(vec![]);
        for kind in templates::ALL {
            tera.add_raw_template(kind.as_str(), templates::source(kind))
                .map_err(|e| PromptError::TemplateParse(format!("{kind}: {e}")))?;
        }
        Ok(Self { tera })
    }

    pub fn render(&self, request: &PromptRequest) -> Result<RenderedPrompt, PromptError> {
        let kind = request.kind();
        let context = build_context(request);
        let text = self.tera.render(kind.as_str(), &context)?;
        tracing::debug!(task = %kind, prompt_len = text.len(), "rendered prompt");
        Ok(RenderedPrompt::new(text))
    }
}

fn insert_demographics(context: &mut Context, demographics: &Demographics) {
    context.insert("age", &demographics.age);
    context.insert("gender", &demographics.gender);
    context.insert("condition", &demographics.condition);
}

fn build_context(request: &PromptRequest) -> Context {
    let mut context = Context::new();
    match request {
        PromptRequest::NutritionAnalysis {
            demographics,
            ingredients,
        } => {
            insert_demographics(&mut context, demographics);
            context.insert("ingredients", ingredients);
        }
        PromptRequest::MedicalChat { message } | PromptRequest::HealthChat { message } => {
            context.insert("message", message);
        }
        PromptRequest::HealthReportAnalysis {
            demographics,
            report_text,
            query,
        } => {
            insert_demographics(&mut context, demographics);
            context.insert("report_text", report_text);
            context.insert("query", query);
            context.insert("not_provided", NOT_PROVIDED);
        }
        PromptRequest::SentimentExplanation {
            transcript,
            sentiment,
        } => {
            // Pre-formatted so the percentages always carry one decimal.
            let pct = sentiment.scores.percentages();
            context.insert("transcript", transcript);
            context.insert("label", sentiment.label.as_str());
            context.insert("positive", &format!("{:.1}", pct.positive));
            context.insert("negative", &format!("{:.1}", pct.negative));
            context.insert("neutral", &format!("{:.1}", pct.neutral));
        }
    }
    context
}

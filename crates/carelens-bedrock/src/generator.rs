//! [`Generator`] backed by a Bedrock model.
//!
//! The rendered prompt already carries its own framing (system prompt,
//! history, open assistant turn), so it is sent as a single user message
//! with no separate system block.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, InferenceConfiguration, Message};
use tracing::{debug, info};
use uuid::Uuid;

use carelens_core::capability::Generator;
use carelens_core::error::GenerationError;
use carelens_core::models::request::RenderedPrompt;

use crate::error::BedrockError;

/// Sampling settings sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceParams {
    pub max_tokens: i32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl InferenceParams {
    fn to_config(self) -> InferenceConfiguration {
        InferenceConfiguration::builder()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .top_p(self.top_p)
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
    params: InferenceParams,
}

impl BedrockGenerator {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            model_id: model_id.into(),
            params: InferenceParams::default(),
        }
    }

    pub fn with_params(mut self, params: InferenceParams) -> Self {
        self.params = params;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn converse(&self, prompt: &str) -> Result<String, BedrockError> {
        let invocation_id = Uuid::new_v4();
        info!(
            invocation_id = %invocation_id,
            model = %self.model_id,
            prompt_len = prompt.len(),
            "invoking model"
        );
        debug!(invocation_id = %invocation_id, prompt, "model prompt");

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .inference_config(self.params.to_config())
            .send()
            .await
            .map_err(classify)?;

        let output = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = response_text(output);
        if text.is_empty() {
            return Err(BedrockError::EmptyResponse);
        }

        info!(
            invocation_id = %invocation_id,
            output_len = text.len(),
            "model invocation complete"
        );
        Ok(text)
    }
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, GenerationError> {
        Ok(self.converse(prompt.as_str()).await?)
    }
}

/// Concatenate the text blocks of a model message, ignoring any other
/// block kinds.
pub fn response_text(message: &Message) -> String {
    message
        .content()
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn classify<R>(err: SdkError<ConverseError, R>) -> BedrockError
where
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let service = err.into_service_error();
    if service.is_throttling_exception()
        || service.is_service_unavailable_exception()
        || service.is_model_not_ready_exception()
    {
        BedrockError::Unavailable(service.to_string())
    } else {
        BedrockError::Invocation(service.to_string())
    }
}

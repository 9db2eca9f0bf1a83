use thiserror::Error;

use carelens_core::error::GenerationError;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("model temporarily unavailable: {0}")]
    Unavailable(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("model returned no text")]
    EmptyResponse,
}

impl From<BedrockError> for GenerationError {
    fn from(err: BedrockError) -> Self {
        match err {
            BedrockError::Unavailable(msg) => GenerationError::Unavailable(msg),
            e @ BedrockError::EmptyResponse => GenerationError::EmptyOutput(e.to_string()),
            other => GenerationError::Invocation(other.to_string()),
        }
    }
}

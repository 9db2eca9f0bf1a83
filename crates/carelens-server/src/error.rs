use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use carelens_core::error::{CoreError, ExtractionError, GenerationError};
use carelens_prompt::error::PromptError;
use carelens_vision::error::VisionError;

/// Failure of one orchestrated request.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Validation(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("{stage} timed out after {}s", .after.as_secs())]
    Timeout { stage: &'static str, after: Duration },

    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    pub fn status(&self) -> StatusCode {
        match self {
            OrchestratorError::Validation(_)
            | OrchestratorError::Decode(_)
            | OrchestratorError::Extraction(ExtractionError::UnsupportedFormat(_)) => {
                StatusCode::BAD_REQUEST
            }
            OrchestratorError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VisionError> for OrchestratorError {
    fn from(e: VisionError) -> Self {
        match e {
            VisionError::Decode(msg) => OrchestratorError::Decode(msg),
            too_large @ VisionError::TooLarge { .. } => {
                OrchestratorError::Validation(too_large.to_string())
            }
            other => OrchestratorError::Internal(other.to_string()),
        }
    }
}

impl From<PromptError> for OrchestratorError {
    fn from(e: PromptError) -> Self {
        OrchestratorError::Internal(e.to_string())
    }
}

impl From<CoreError> for OrchestratorError {
    fn from(e: CoreError) -> Self {
        OrchestratorError::Internal(e.to_string())
    }
}

/// Error body layout. Each route family keeps the shape its clients parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStyle {
    /// `{"message": "Sorry, I encountered an error: ..."}`
    Chat,
    /// `{"success": false, "message": "Error processing request: ..."}`
    Ocr,
    /// `{"detail": "..."}`
    Detail,
}

impl ErrorStyle {
    /// Body shape used by the route serving `path`, for errors raised before
    /// a handler can choose one.
    pub fn for_path(path: &str) -> Self {
        match path {
            "/llm-chat" | "/health-chat" => ErrorStyle::Chat,
            "/ocr" | "/health-ocr" => ErrorStyle::Ocr,
            _ => ErrorStyle::Detail,
        }
    }
}

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    style: ErrorStyle,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, style: ErrorStyle, message: impl Into<String>) -> Self {
        Self {
            status,
            style,
            message: message.into(),
        }
    }

    pub fn from_orchestrator(style: ErrorStyle, err: OrchestratorError) -> Self {
        Self::new(err.status(), style, err.to_string())
    }

    pub fn chat(err: OrchestratorError) -> Self {
        Self::from_orchestrator(ErrorStyle::Chat, err)
    }

    pub fn ocr(err: OrchestratorError) -> Self {
        Self::from_orchestrator(ErrorStyle::Ocr, err)
    }

    pub fn detail(err: OrchestratorError) -> Self {
        Self::from_orchestrator(ErrorStyle::Detail, err)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorStyle::Detail, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), "internal error: {}", self.message);
        } else {
            tracing::warn!(status = self.status.as_u16(), "request rejected: {}", self.message);
        }

        let body = match self.style {
            ErrorStyle::Chat => json!({
                "message": format!("Sorry, I encountered an error: {}", self.message)
            }),
            ErrorStyle::Ocr => json!({
                "success": false,
                "message": format!("Error processing request: {}", self.message)
            }),
            ErrorStyle::Detail => json!({ "detail": self.message }),
        };

        (self.status, Json(body)).into_response()
    }
}

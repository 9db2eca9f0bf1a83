use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, OrchestratorError};
use crate::orchestrator::ChatTask;
use crate::routes::json_body;
use crate::sessions::is_valid_session_id;
use crate::state::AppState;

/// Response header carrying the conversation's session id.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Medical Q&A turn. Replies with plain text.
pub async fn llm_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(body).map_err(ApiError::chat)?;
    chat_turn(&state, ChatTask::Medical, req).await
}

/// General health-assistance turn. Replies with plain text.
pub async fn health_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = json_body(body).map_err(ApiError::chat)?;
    chat_turn(&state, ChatTask::Health, req).await
}

async fn chat_turn(state: &AppState, task: ChatTask, req: ChatRequest) -> Result<Response, ApiError> {
    let session_id = resolve_session_id(req.session_id).map_err(ApiError::chat)?;
    let reply = state
        .orchestrator
        .chat(&session_id, task, &req.message)
        .await
        .map_err(ApiError::chat)?;

    Ok(([(SESSION_HEADER, session_id)], reply).into_response())
}

/// Keep a well-formed client id, mint one when absent.
fn resolve_session_id(requested: Option<String>) -> Result<String, OrchestratorError> {
    match requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && id != "undefined" && id != "null")
    {
        Some(id) if is_valid_session_id(&id) => Ok(id),
        Some(_) => Err(OrchestratorError::Validation(
            "session_id must be 1-128 characters of letters, digits, '-' or '_'".into(),
        )),
        None => Ok(Uuid::new_v4().to_string()),
    }
}

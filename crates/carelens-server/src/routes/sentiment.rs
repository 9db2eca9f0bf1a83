use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::audio::SentimentBody;
use crate::routes::json_body;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SentimentRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TextSentimentResponse {
    pub text: String,
    #[serde(flatten)]
    pub sentiment: SentimentBody,
}

pub async fn text_sentiment(
    State(state): State<AppState>,
    body: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<TextSentimentResponse>, ApiError> {
    let req = json_body(body).map_err(ApiError::detail)?;
    let fused = state
        .orchestrator
        .text_sentiment(&req.message)
        .await
        .map_err(ApiError::detail)?;

    Ok(Json(TextSentimentResponse {
        text: req.message,
        sentiment: fused.into(),
    }))
}

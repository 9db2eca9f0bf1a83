use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use carelens_core::models::sentiment::{SentimentLabel, SentimentScores};
use carelens_sentiment::FusedSentiment;

use crate::error::{ApiError, OrchestratorError};
use crate::routes::ocr::malformed;
use crate::state::AppState;

/// Sentiment fields shared by the audio and text endpoints.
#[derive(Debug, Serialize)]
pub struct SentimentBody {
    pub sentiment: SentimentLabel,
    pub sentiment_scores: SentimentScores,
    pub explanation: String,
}

impl From<FusedSentiment> for SentimentBody {
    fn from(fused: FusedSentiment) -> Self {
        Self {
            sentiment: fused.sentiment.label,
            sentiment_scores: fused.sentiment.scores,
            explanation: fused.explanation.text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AudioResponse {
    pub transcription: String,
    #[serde(flatten)]
    pub sentiment: SentimentBody,
}

pub async fn process_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AudioResponse>, ApiError> {
    let (file_name, bytes) = read_audio_form(multipart).await.map_err(ApiError::detail)?;
    let analysis = state
        .orchestrator
        .process_audio(&file_name, &bytes)
        .await
        .map_err(ApiError::detail)?;

    Ok(Json(AudioResponse {
        transcription: analysis.transcription,
        sentiment: analysis.fused.into(),
    }))
}

async fn read_audio_form(mut multipart: Multipart) -> Result<(String, Vec<u8>), OrchestratorError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(malformed)?.to_vec();
        return Ok((file_name, bytes));
    }
    Err(OrchestratorError::Validation("form field 'file' is required".into()))
}

use axum::extract::{Multipart, State};
use axum::extract::multipart::Field;

use crate::error::{ApiError, OrchestratorError};
use crate::orchestrator::{ImageSubmission, ImageTask};
use crate::state::AppState;

/// Ingredient-label analysis. Replies with plain text.
pub async fn ocr(State(state): State<AppState>, multipart: Multipart) -> Result<String, ApiError> {
    analyze(&state, ImageTask::Nutrition, multipart).await
}

/// Medical-report analysis. Replies with plain text.
pub async fn health_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, ApiError> {
    analyze(&state, ImageTask::HealthReport, multipart).await
}

async fn analyze(state: &AppState, task: ImageTask, multipart: Multipart) -> Result<String, ApiError> {
    let submission = read_image_form(multipart).await.map_err(ApiError::ocr)?;
    state
        .orchestrator
        .analyze_image(task, submission)
        .await
        .map_err(ApiError::ocr)
}

async fn read_image_form(mut multipart: Multipart) -> Result<ImageSubmission, OrchestratorError> {
    let mut submission = ImageSubmission::default();
    let mut saw_file = false;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                submission.image = field.bytes().await.map_err(malformed)?.to_vec();
                saw_file = true;
            }
            "age" => submission.demographics.age = Some(text(field).await?),
            "gender" => submission.demographics.gender = Some(text(field).await?),
            "description" => submission.demographics.description = Some(text(field).await?),
            "query" => submission.query = Some(text(field).await?),
            _ => {}
        }
    }

    if !saw_file {
        return Err(OrchestratorError::Validation("form field 'file' is required".into()));
    }
    Ok(submission)
}

async fn text(field: Field<'_>) -> Result<String, OrchestratorError> {
    field.text().await.map_err(malformed)
}

pub(crate) fn malformed(e: axum::extract::multipart::MultipartError) -> OrchestratorError {
    OrchestratorError::Validation(format!("malformed multipart body: {e}"))
}

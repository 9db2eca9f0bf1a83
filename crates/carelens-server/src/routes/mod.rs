pub mod audio;
pub mod chat;
pub mod health;
pub mod ocr;
pub mod sentiment;
pub mod sessions;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::OrchestratorError;

/// Unwrap a JSON body, turning axum's rejection (bad content type, syntax
/// error, missing field) into a validation error the route can shape.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, OrchestratorError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| OrchestratorError::Validation(rejection.body_text()))
}

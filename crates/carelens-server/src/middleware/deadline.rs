use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ErrorStyle};

/// Answer 408 when a request outlives `limit`, in the body shape of the
/// route that timed out. Dropping the handler future
/// also drops any upload it staged, which deletes the file.
pub async fn enforce_deadline(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, limit_secs = limit.as_secs(), "request deadline exceeded");
            ApiError::new(
                StatusCode::REQUEST_TIMEOUT,
                ErrorStyle::for_path(&path),
                format!("request exceeded {}s", limit.as_secs()),
            )
            .into_response()
        }
    }
}

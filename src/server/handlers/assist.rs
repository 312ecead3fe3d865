//! One generic handler for every AI-assisted endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;

use super::super::error::ApiError;
use super::super::AppState;
use crate::tasks::{run_task, AssistantTask};

/// Parse a JSON request body, treating an empty body as `{}`.
///
/// Parsing by hand keeps malformed bodies on the 400 path instead of the
/// extractor's 415/422 rejections.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| ApiError::BadRequest("Request body must be UTF-8".to_string()))?;
    let text = if text.trim().is_empty() { "{}" } else { text };
    serde_json::from_str(text)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// POST handler running task `T`.
pub async fn assist<T: AssistantTask>(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<T::Response>, ApiError> {
    let request: T::Request = parse_body(&body)?;
    let ctx = state.task_context();
    let response = run_task::<T>(&state.invoker, &ctx, &request).await?;
    Ok(Json(response))
}

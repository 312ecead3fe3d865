//! Read-only access to the dataset collections.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use super::super::error::ApiError;
use super::super::AppState;
use crate::dataset::CollectionKind;

/// Health check with collection sizes.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let counts: serde_json::Map<String, Value> = CollectionKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), json!(state.dataset.len_of(*kind))))
        .collect();

    Json(json!({
        "status": "ok",
        "region": state.region.as_ref(),
        "collections": counts,
    }))
}

fn kind(name: &str) -> Result<CollectionKind, ApiError> {
    CollectionKind::from_str(name)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown collection '{}'", name)))
}

/// Every record of a collection, in file order.
pub async fn list_collection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind = kind(&name)?;
    Ok(Json(state.dataset.collection_json(kind)?))
}

/// One record by slug.
pub async fn get_record(
    State(state): State<AppState>,
    Path((name, slug)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let kind = kind(&name)?;
    state
        .dataset
        .record_json(kind, &slug)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No {} with slug '{}'", kind.as_str(), slug)))
}

//! Campsites near a trail or attraction.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::super::error::ApiError;
use super::super::AppState;
use crate::dataset::{Anchor, AnchorKind, NearbyCampsite, DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
use crate::geo::Distance;

/// Largest `limit` accepted.
const MAX_LIMIT: usize = 50;

/// Radius and result-count parameters.
#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    pub radius_km: Option<f64>,
    pub radius_miles: Option<f64>,
    pub limit: Option<usize>,
}

impl NearbyParams {
    /// Resolve the radius, defaulting to 20 km.
    pub fn radius(&self) -> Result<Distance, ApiError> {
        let radius = match (self.radius_km, self.radius_miles) {
            (Some(_), Some(_)) => {
                return Err(ApiError::BadRequest(
                    "Give radius_km or radius_miles, not both".to_string(),
                ))
            }
            (Some(km), None) => Distance::from_km(km),
            (None, Some(miles)) => Distance::from_miles(miles),
            (None, None) => Distance::from_km(DEFAULT_RADIUS_KM),
        };
        if !radius.as_km().is_finite() || radius.as_km() <= 0.0 {
            return Err(ApiError::BadRequest("Radius must be positive".to_string()));
        }
        Ok(radius)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse<'a> {
    pub anchor: Anchor<'a>,
    pub radius_km: f64,
    pub campsites: Vec<NearbyCampsite<'a>>,
}

/// GET /api/near/:kind/:slug
pub async fn nearby_campsites(
    State(state): State<AppState>,
    Path((kind, slug)): Path<(String, String)>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let kind = AnchorKind::from_str(&kind)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown kind '{}'", kind)))?;
    let radius = params.radius()?;

    let anchor = state
        .dataset
        .anchor(kind, &slug)
        .ok_or_else(|| ApiError::NotFound(format!("No {} with slug '{}'", kind.as_str(), slug)))?;
    let reference = anchor.coordinate.ok_or_else(|| {
        ApiError::BadRequest(format!("{} '{}' has no location", kind.as_str(), slug))
    })?;

    let response = NearbyResponse {
        campsites: state
            .dataset
            .campsites_near(reference, radius, params.limit()),
        radius_km: radius.as_km(),
        anchor,
    };

    Ok(Json(serde_json::to_value(&response)?))
}

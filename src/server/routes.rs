//! Router configuration for the web server.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;
use crate::tasks::{
    Compare, DryingAdvice, FaqSearch, MatchCampsites, PackingList, PlanTrip, SeoCopy, TrailFitness,
};

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Dataset
        .route("/api/collections/:name", get(handlers::list_collection))
        .route("/api/collections/:name/:slug", get(handlers::get_record))
        .route("/api/near/:kind/:slug", get(handlers::nearby_campsites))
        // AI-assisted features
        .route("/api/plan-trip", post(handlers::assist::<PlanTrip>))
        .route("/api/match-campsites", post(handlers::assist::<MatchCampsites>))
        .route("/api/faq-search", post(handlers::assist::<FaqSearch>))
        .route("/api/compare", post(handlers::assist::<Compare>))
        .route("/api/trail-fitness", post(handlers::assist::<TrailFitness>))
        .route("/api/packing-list", post(handlers::assist::<PackingList>))
        .route("/api/seo-generator", post(handlers::assist::<SeoCopy>))
        .route("/api/drying-advisor", post(handlers::assist::<DryingAdvice>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

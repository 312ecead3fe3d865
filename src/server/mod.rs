//! HTTP API for the directory.
//!
//! Serves the static collections read-only, the proximity lookup, and one
//! POST endpoint per AI-assisted feature. All state is immutable after
//! startup, so handlers share it through cheap `Arc` clones.

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::dataset::Dataset;
use crate::llm::{LlmClient, TaskInvoker};
use crate::tasks::TaskContext;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub invoker: Arc<TaskInvoker>,
    /// Region named in prompts.
    pub region: Arc<str>,
    pub max_context_chars: usize,
}

impl AppState {
    pub fn new(
        dataset: Dataset,
        invoker: TaskInvoker,
        region: &str,
        max_context_chars: usize,
    ) -> Self {
        Self {
            dataset: Arc::new(dataset),
            invoker: Arc::new(invoker),
            region: Arc::from(region),
            max_context_chars,
        }
    }

    /// Load the dataset and build the completion client.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let dataset = Dataset::load(&settings.data_dir)?;
        let client = LlmClient::new(settings.llm.clone())?;
        let invoker = TaskInvoker::new(Arc::new(client));

        Ok(Self::new(
            dataset,
            invoker,
            &settings.region,
            settings.llm.max_context_chars,
        ))
    }

    pub fn task_context(&self) -> TaskContext<'_> {
        TaskContext {
            dataset: &self.dataset,
            region: &self.region,
            max_context_chars: self.max_context_chars,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    tracing::info!("Completion backend: {}", state.invoker.backend_label());
    let app = create_router(state);

    let addr: SocketAddr = bind.parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm::testing::ScriptedBackend;
    use crate::llm::TaskError;
    use crate::tasks::fixtures;

    fn setup_test_app(backend: Arc<ScriptedBackend>) -> axum::Router {
        let state = AppState::new(
            fixtures::dataset(),
            TaskInvoker::new(backend),
            "Loch Ness, Scotland",
            10_000,
        );
        create_router(state)
    }

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_api_health() {
        let app = setup_test_app(ScriptedBackend::replying_json(json!({})));

        let response = app.oneshot(get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["collections"]["campsites"], 3);
        assert_eq!(json["collections"]["faq"], 2);
    }

    #[tokio::test]
    async fn test_api_collection_and_record() {
        let app = setup_test_app(ScriptedBackend::replying_json(json!({})));

        let response = app.clone().oneshot(get("/api/collections/trails")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["id"], "falls-loop");

        let response = app
            .clone()
            .oneshot(get("/api/collections/campsites/glen-pods"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["display_name"], "Glen Pods");

        let response = app
            .oneshot(get("/api/collections/campsites/nowhere"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }

    #[tokio::test]
    async fn test_api_unknown_collection() {
        let app = setup_test_app(ScriptedBackend::replying_json(json!({})));
        let response = app.oneshot(get("/api/collections/hotels")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_nearby() {
        let app = setup_test_app(ScriptedBackend::replying_json(json!({})));

        let response = app
            .clone()
            .oneshot(get("/api/near/attraction/castle?radius_km=20&limit=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["anchor"]["slug"], "castle");
        let sites = json["campsites"].as_array().unwrap();
        assert!(sites.len() <= 2);
        assert_eq!(sites[0]["id"], "glen-pods");

        let response = app
            .oneshot(get("/api/near/trail/nowhere"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_empty_body_rejected_without_call() {
        let backend = ScriptedBackend::replying_json(json!({}));
        let app = setup_test_app(backend.clone());

        let response = app.oneshot(post("/api/match-campsites", "")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_request");
        assert_eq!(json["message"], "Query is required");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_malformed_json_rejected() {
        let backend = ScriptedBackend::replying_json(json!({}));
        let app = setup_test_app(backend.clone());

        let response = app.oneshot(post("/api/faq-search", "{question")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_match_campsites_preserves_model_order() {
        let backend = ScriptedBackend::replying_json(json!({
            "filters": {
                "area_id": null,
                "stay_types": ["pod"],
                "facility_tags": [],
                "price_band": null,
                "near_water": false
            },
            "ranked_campsite_ids": ["glen-pods", "ghost", "lochside"],
            "explanation": "Pods first."
        }));
        let app = setup_test_app(backend.clone());

        let response = app
            .oneshot(post("/api/match-campsites", r#"{"query": "a pod near the loch"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["ranked_campsite_ids"], json!(["glen-pods", "lochside"]));
        assert_eq!(json["top_campsites"][0]["display_name"], "Glen Pods");
        assert_eq!(json["top_campsites"][1]["display_name"], "Lochside Camping");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_api_trail_fitness_unknown_trail() {
        let backend = ScriptedBackend::replying_json(json!({}));
        let app = setup_test_app(backend.clone());

        let response = app
            .oneshot(post(
                "/api/trail-fitness",
                r#"{"trail_id": "nope", "fitness_description": "I run twice a week"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_compare_needs_two_ids() {
        let backend = ScriptedBackend::replying_json(json!({}));
        let app = setup_test_app(backend.clone());

        let response = app
            .oneshot(post("/api/compare", r#"{"type": "campsites", "ids": ["lochside"]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_upstream_failure_is_generic_500() {
        let backend = ScriptedBackend::failing(TaskError::UpstreamUnavailable);
        let app = setup_test_app(backend.clone());

        let response = app
            .oneshot(post("/api/faq-search", r#"{"question": "midges?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Failed to process request");
        assert!(!json.to_string().contains("scripted"));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_api_schema_violation_is_500() {
        let backend = ScriptedBackend::replying_json(json!({ "answer": "Yes" }));
        let app = setup_test_app(backend);

        let response = app
            .oneshot(post("/api/faq-search", r#"{"question": "midges?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

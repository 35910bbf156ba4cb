//! Axum route handlers for the conscience HTTP server.
//!
//! # Routes
//!
//! - `GET  /health` — Returns `{"status": "ok", "version": "0.4.0"}`
//! - `POST /chat`   — Processes one interaction through the emotional agent
//! - `GET  /state`  — Returns the read-only channel snapshot
//!
//! The agent is a single-writer state machine with no store-level atomicity,
//! so every request takes the one async mutex around it; interleaved
//! decay/update cycles would silently lose writes otherwise.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::EmotionalAgent;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The one emotional agent behind this service, serialized by the mutex.
    pub agent: Arc<Mutex<EmotionalAgent>>,
}

impl AppState {
    pub fn new(agent: EmotionalAgent) -> Self {
        Self {
            agent: Arc::new(Mutex::new(agent)),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/state", get(state_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "conscience",
    }))
}

/// POST /chat request body. The outcome fields default to an ethical,
/// unrewarded, non-critical interaction.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_prompt: String,
    #[serde(default = "default_ethical")]
    pub action_is_ethical: bool,
    #[serde(default)]
    pub reward_magnitude: f64,
    #[serde(default)]
    pub user_tone_is_critical: bool,
}

fn default_ethical() -> bool {
    true
}

/// POST /chat — process one interaction.
///
/// Response: `{ "response", "current_state", "lambda_value",
/// "confidence_score", "tone" }`. A persistence failure surfaces as 500; a
/// generation failure does not (the agent substitutes a placeholder).
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if request.user_prompt.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "user_prompt must not be empty"})),
        ));
    }
    if !request.reward_magnitude.is_finite() || request.reward_magnitude < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "reward_magnitude must be a non-negative number"})),
        ));
    }

    let mut agent = state.agent.lock().await;
    let outcome = agent
        .process_interaction(
            &request.user_prompt,
            request.action_is_ethical,
            request.reward_magnitude,
            request.user_tone_is_critical,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        })?;

    Ok(Json(serde_json::json!({
        "response": outcome.response_text,
        "current_state": outcome.new_state,
        "lambda_value": outcome.lambda_value,
        "confidence_score": outcome.confidence_score,
        "tone": outcome.tone.name(),
    })))
}

/// GET /state — read-only affective snapshot, no side effects.
async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let agent = state.agent.lock().await;
    Json(agent.current_state())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::conscience::ConscienceVariant;
    use crate::store::MemoryStateStore;

    fn test_state() -> AppState {
        let agent = EmotionalAgent::new(
            Box::new(MemoryStateStore::new()),
            None,
            ConscienceVariant::Sigmoid,
        )
        .unwrap();
        AppState::new(agent)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_router(test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "conscience");
    }

    #[tokio::test]
    async fn test_chat_processes_interaction() {
        let app = app_router(test_state());

        let body = serde_json::json!({
            "user_prompt": "is it wrong to lie?",
            "action_is_ethical": true,
            "reward_magnitude": 50.0,
            "user_tone_is_critical": false,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["response"].as_str().unwrap().starts_with("SIMULATED"));
        let lambda = json["lambda_value"].as_f64().unwrap();
        assert!(lambda > 0.0 && lambda < 1.0);
        assert_eq!(json["current_state"].as_object().unwrap().len(), 8);
        assert!(json["tone"].is_string());
    }

    #[tokio::test]
    async fn test_chat_defaults_outcome_fields() {
        let app = app_router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"user_prompt": "hello"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_rejects_negative_reward() {
        let app = app_router(test_state());

        let body = serde_json::json!({
            "user_prompt": "hello",
            "reward_magnitude": -5.0,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_prompt() {
        let app = app_router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"user_prompt": "  "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_state_endpoint_returns_all_channels() {
        let app = app_router(test_state());

        let request = Request::builder()
            .uri("/state")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 8);
        assert_eq!(map["calm"].as_f64().unwrap(), 0.5);
    }

    #[tokio::test]
    async fn test_chat_mutates_state_visible_via_state_endpoint() {
        let state = test_state();
        let app = app_router(state.clone());

        let body = serde_json::json!({
            "user_prompt": "hello",
            "action_is_ethical": true,
            "reward_magnitude": 100.0,
        });
        let request = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let _ = app.clone().oneshot(request).await.unwrap();

        let snapshot = state.agent.lock().await.current_state();
        assert!(snapshot["pride"] > 0.1, "ethical outcome raises pride");
    }
}

//! HTTP Endpoints
//!
//! JSON API consumed by the chat widget plus operational endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use farm_chat_config::constants::sessions::DEFAULT_SESSION_ID;
use farm_chat_core::{IntentLabel, Lead};

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        .route("/chat", post(chat))
        .route("/leads", get(list_leads))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

const FALLBACK_ORIGIN: &str = "http://localhost:3000";

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, any origin is allowed (the widget is embedded cross-site)
/// - If no configured origin parses, only localhost:3000 is allowed
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, defaulting to {}", FALLBACK_ORIGIN);
        return layer.allow_origin(HeaderValue::from_static(FALLBACK_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    layer.allow_origin(parsed_origins)
}

/// Chat request; both fields may be absent
#[derive(Debug, Default)]
struct ChatRequest {
    message: Option<String>,
    session_id: Option<String>,
}

impl ChatRequest {
    /// Parse leniently, field by field. A field that is missing or not a
    /// string falls back on its own; an empty or malformed body means all
    /// defaults.
    fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        let value: serde_json::Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable chat body, using defaults");
                return Self::default();
            }
        };

        let field = |name: &str| match value.get(name) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(field = name, value = %other, "Ignoring non-string chat field");
                None
            }
        };

        Self {
            message: field("message"),
            session_id: field("session_id"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    intent: IntentLabel,
    lead_captured: bool,
}

/// Handle one chat message
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatResponse>, StatusCode> {
    let request = ChatRequest::from_body(&body);
    let message = request.message.unwrap_or_default();
    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let outcome = state.chat.handle(&session_id, &message).await.map_err(|e| {
        tracing::error!(session_id = %session_id, error = %e, "Chat cycle failed");
        StatusCode::from(e)
    })?;

    Ok(Json(ChatResponse {
        response: outcome.response,
        intent: outcome.intent,
        lead_captured: outcome.lead_captured,
    }))
}

#[derive(Debug, Serialize)]
struct LeadsResponse {
    leads: Vec<Lead>,
    total: usize,
}

/// List captured leads
async fn list_leads(State(state): State<AppState>) -> Result<Json<LeadsResponse>, StatusCode> {
    let leads = state.store().leads().await.map_err(|e| {
        tracing::error!(error = %e, "Listing leads failed");
        StatusCode::from(ServerError::from(e))
    })?;
    Ok(Json(LeadsResponse {
        total: leads.len(),
        leads,
    }))
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.server.service_name,
    }))
}

//! Prometheus metrics

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use farm_chat_core::IntentLabel;

use crate::state::AppState;

/// Install the global Prometheus recorder
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

pub fn record_message(intent: IntentLabel) {
    metrics::counter!("farm_chat_messages_total", "intent" => intent.as_str()).increment(1);
}

pub fn record_lead_captured() {
    metrics::counter!("farm_chat_leads_captured_total").increment(1);
}

pub fn record_llm_fallback() {
    metrics::counter!("farm_chat_llm_fallbacks_total").increment(1);
}

pub fn record_cycle(elapsed: Duration) {
    metrics::histogram!("farm_chat_cycle_seconds").record(elapsed.as_secs_f64());
}

/// `GET /metrics`
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

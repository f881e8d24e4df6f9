//! HTTP request handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use serde::Serialize;
use teloxide::types::Update;
use tracing::{debug, error, warn};

use crate::server::state::ServerState;
use crate::utils::version_info;

/// Body returned to Telegram for every webhook delivery
pub const WEBHOOK_ACK: &str = "OK";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "cibot".to_string(),
        version: version.version,
    })
}

/// Telegram webhook handler
///
/// Always acknowledges with `200 OK`. Malformed payloads and processing
/// failures are logged only, so Telegram never redelivers an update.
pub async fn webhook_handler(State(state): State<Arc<ServerState>>, body: Bytes) -> &'static str {
    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Discarding malformed webhook payload: {}", e);
            return WEBHOOK_ACK;
        }
    };

    debug!("Received update {}", update.id.0);
    if let Err(e) = state.dispatcher.process_update(&update).await {
        error!("Failed to process update {}: {}", update.id.0, e);
    }

    WEBHOOK_ACK
}

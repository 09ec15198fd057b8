//! Operational endpoints and terminal handlers.

use crate::middleware::JoinMetrics;
use crate::ApiError;
use axum::{extract::State, http::StatusCode, http::Uri, Json};
use std::sync::Arc;

#[derive(Clone)]
pub struct OpsState {
    pub chains: Arc<Vec<String>>,
    pub metrics: Arc<JoinMetrics>,
}

/// Liveness
pub async fn handle_health(State(state): State<OpsState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "chains": state.chains.as_slice(),
    }))
}

pub async fn handle_metrics(State(state): State<OpsState>) -> Json<serde_json::Value> {
    Json(state.metrics.to_json())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

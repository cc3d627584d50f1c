use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use magnetsearch_core::{AdapterInfo, SanitizedConfig};

use super::{api_error, ApiError};
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub time: DateTime<Utc>,
    pub default_adapter: String,
    pub adapters: Vec<AdapterInfo>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptersResponse {
    pub adapters: Vec<AdapterInfo>,
    pub default_adapter: String,
}

/// GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.registry();
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now(),
        default_adapter: registry.default_id(),
        adapters: registry.list(),
    })
}

/// GET /api/adapters
pub async fn list_adapters(State(state): State<Arc<AppState>>) -> Json<AdaptersResponse> {
    let registry = state.registry();
    Json(AdaptersResponse {
        adapters: registry.list(),
        default_adapter: registry.default_id(),
    })
}

/// GET /api/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        encode_metrics(),
    )
}

pub async fn method_not_allowed(method: Method) -> ApiError {
    api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} not allowed", method),
    )
}

pub async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Not found")
}

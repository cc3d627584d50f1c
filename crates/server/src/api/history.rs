use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use magnetsearch_core::HistoryEntry;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    /// Newest first. Serialized as `[]` when empty.
    pub history: Vec<HistoryEntry>,
}

/// GET /api/history
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.history().list(),
    })
}

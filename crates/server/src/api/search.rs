//! Search endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use magnetsearch_core::{SearchRequest, SearchResponse};

use super::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub adapter: Option<String>,
    /// Kept as text so a malformed page falls back to the first page
    /// instead of rejecting the request.
    #[serde(default)]
    pub page: Option<String>,
}

impl SearchParams {
    fn into_request(self) -> SearchRequest {
        SearchRequest {
            query: self.q.unwrap_or_default(),
            adapter: self.adapter,
            page: self.page.as_deref().and_then(parse_page),
        }
    }
}

fn parse_page(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// GET /api/search?q=<query>&adapter=<id>&page=<n>
///
/// Adapter failures come back inside `meta` with a 200; only request-shape
/// problems (blank query, bad magnet, unknown adapter) are 400s.
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) =
        params.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    // Cancelled when this future is dropped, e.g. on client disconnect
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .orchestrator()
        .search(params.into_request(), &cancel)
        .await
        .map(Json)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_is_lenient() {
        assert_eq!(parse_page("3"), Some(3));
        assert_eq!(parse_page(" 2 "), Some(2));
        assert_eq!(parse_page("-1"), Some(-1));
        assert_eq!(parse_page("abc"), None);
        assert_eq!(parse_page(""), None);
    }

    #[test]
    fn test_params_into_request() {
        let params = SearchParams {
            q: Some("ubuntu".to_string()),
            adapter: Some("nyaa".to_string()),
            page: Some("two".to_string()),
        };
        let request = params.into_request();
        assert_eq!(request.query, "ubuntu");
        assert_eq!(request.adapter.as_deref(), Some("nyaa"));
        assert_eq!(request.normalized_page(), 1);
    }

    #[test]
    fn test_missing_query_becomes_empty() {
        let request = SearchParams::default().into_request();
        assert!(request.query.is_empty());
        assert!(request.adapter.is_none());
        assert!(request.page.is_none());
    }
}

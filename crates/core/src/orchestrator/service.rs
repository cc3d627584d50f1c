//! Search orchestrator implementation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::types::{SearchError, SearchRequest};
use crate::adapter::{Adapter, AdapterError};
use crate::history::SearchHistory;
use crate::magnet;
use crate::metrics::{
    ADAPTER_REQUESTS, FALLBACKS_TOTAL, HISTORY_WRITE_FAILURES, SEARCHES_TOTAL, SEARCH_RESULTS,
};
use crate::model::{SearchMeta, SearchMode, SearchResponse, SearchResult};
use crate::registry::AdapterRegistry;

/// Runs searches against the registry and records them to history.
pub struct SearchOrchestrator {
    registry: Arc<AdapterRegistry>,
    history: Arc<dyn SearchHistory>,
    expected_page_size: usize,
}

impl SearchOrchestrator {
    /// `expected_page_size` drives the has-next-page heuristic: a page with at
    /// least that many results is assumed to have a successor.
    pub fn new(
        registry: Arc<AdapterRegistry>,
        history: Arc<dyn SearchHistory>,
        expected_page_size: usize,
    ) -> Self {
        Self {
            registry,
            history,
            expected_page_size: expected_page_size.max(1),
        }
    }

    pub fn registry(&self) -> &Arc<AdapterRegistry> {
        &self.registry
    }

    pub fn history(&self) -> &Arc<dyn SearchHistory> {
        &self.history
    }

    /// Execute one search.
    ///
    /// Only request-shape problems fail: an empty query, a malformed magnet
    /// link, or an adapter id that does not resolve. Adapter failures are
    /// reported in the response metadata.
    pub async fn search(
        &self,
        request: SearchRequest,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchError::Validation(
                "Please provide a search keyword or magnet link".to_string(),
            ));
        }

        let response = if magnet::is_magnet(query) {
            decode_magnet(query)?
        } else {
            let adapter = self.resolve_adapter(request.adapter.as_deref())?;
            self.dispatch(adapter, query, request.normalized_page(), cancel)
                .await
        };

        SEARCHES_TOTAL
            .with_label_values(&[response.meta.mode.as_str()])
            .inc();
        SEARCH_RESULTS
            .with_label_values(&[])
            .observe(response.results.len() as f64);

        if cancel.is_cancelled() {
            debug!(query = %response.query, "Search cancelled, not recording to history");
        } else {
            self.record(&response).await;
        }

        Ok(response)
    }

    fn resolve_adapter(&self, explicit: Option<&str>) -> Result<Arc<dyn Adapter>, SearchError> {
        match explicit.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self
                .registry
                .get(id)
                .ok_or_else(|| SearchError::UnknownAdapter(format!("Unknown adapter: {}", id))),
            None => self.registry.default_adapter().ok_or_else(|| {
                SearchError::UnknownAdapter("No search adapter is configured".to_string())
            }),
        }
    }

    async fn dispatch(
        &self,
        adapter: Arc<dyn Adapter>,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> SearchResponse {
        debug!(adapter = adapter.id(), query = %query, page = page, "Dispatching search");

        let outcome = call_adapter(adapter.as_ref(), query, page, cancel).await;
        let (mut results, primary_error) = match outcome {
            Ok(results) => (results, None),
            Err(e) => {
                warn!(adapter = adapter.id(), error = %e, "Search adapter failed");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut meta = SearchMeta {
            mode: SearchMode::Search,
            adapter: adapter.id().to_string(),
            adapter_name: adapter.name().to_string(),
            adapter_description: adapter.description().to_string(),
            adapter_endpoint: adapter.endpoint().to_string(),
            result_count: 0,
            adapter_error: primary_error,
            fallback_used: false,
            fallback_adapter: None,
            fallback_adapter_name: None,
            fallback_adapter_error: None,
            current_page: page,
            has_previous_page: page > 1,
            has_next_page: false,
        };

        let needs_fallback = meta.adapter_error.is_some() || results.is_empty();
        if needs_fallback && !cancel.is_cancelled() {
            if let Some(fallback) = self.registry.fallback(adapter.id()) {
                info!(
                    adapter = adapter.id(),
                    fallback = fallback.id(),
                    "Primary adapter failed or returned no results, trying fallback"
                );

                match call_adapter(fallback.as_ref(), query, page, cancel).await {
                    Ok(fallback_results) if !fallback_results.is_empty() => {
                        FALLBACKS_TOTAL.with_label_values(&["used"]).inc();
                        results = fallback_results;
                        meta.fallback_used = true;
                        meta.fallback_adapter = Some(fallback.id().to_string());
                        meta.fallback_adapter_name = Some(fallback.name().to_string());
                    }
                    Ok(_) => {
                        FALLBACKS_TOTAL.with_label_values(&["empty"]).inc();
                        debug!(fallback = fallback.id(), "Fallback adapter returned no results");
                    }
                    Err(e) => {
                        FALLBACKS_TOTAL.with_label_values(&["error"]).inc();
                        warn!(fallback = fallback.id(), error = %e, "Fallback adapter failed");
                        meta.fallback_adapter = Some(fallback.id().to_string());
                        meta.fallback_adapter_name = Some(fallback.name().to_string());
                        meta.fallback_adapter_error = Some(e.to_string());
                    }
                }
            }
        }

        meta.result_count = results.len();
        meta.has_next_page = results.len() >= self.expected_page_size;

        SearchResponse {
            query: query.to_string(),
            results,
            meta,
        }
    }

    /// Best-effort history write. The store does blocking file I/O, so it
    /// runs on the blocking pool.
    async fn record(&self, response: &SearchResponse) {
        let history = Arc::clone(&self.history);
        let snapshot = response.clone();
        let outcome = tokio::task::spawn_blocking(move || history.record(&snapshot)).await;

        let failure = match outcome {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("history writer task failed: {}", e),
        };
        HISTORY_WRITE_FAILURES.inc();
        error!(query = %response.query, error = %failure, "Failed to record search history");
    }
}

fn decode_magnet(query: &str) -> Result<SearchResponse, SearchError> {
    let result = magnet::parse(query).map_err(|e| SearchError::Validation(e.to_string()))?;
    Ok(SearchResponse {
        query: query.to_string(),
        results: vec![result],
        meta: SearchMeta::magnet(),
    })
}

async fn call_adapter(
    adapter: &dyn Adapter,
    query: &str,
    page: u32,
    cancel: &CancellationToken,
) -> Result<Vec<SearchResult>, AdapterError> {
    let outcome = adapter.search(query, page, cancel).await;
    let label = match &outcome {
        Ok(results) if results.is_empty() => "empty",
        Ok(_) => "success",
        Err(_) => "error",
    };
    ADAPTER_REQUESTS
        .with_label_values(&[adapter.id(), label])
        .inc();
    outcome
}

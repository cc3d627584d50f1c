//! Types for the search orchestrator.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced to the caller of a search.
///
/// Adapter and history failures are never surfaced here; they are reported
/// through [`crate::model::SearchMeta`] or logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Missing query or malformed magnet link.
    #[error("{0}")]
    Validation(String),

    /// An explicit adapter id did not resolve, or no default is configured.
    #[error("{0}")]
    UnknownAdapter(String),
}

/// One inbound search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Keywords or a magnet URI.
    pub query: String,
    /// Explicit adapter id; the registry default is used when absent.
    pub adapter: Option<String>,
    /// 1-based page. Absent or non-positive values mean the first page.
    pub page: Option<i64>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    /// The page to request, clamped to at least 1.
    pub fn normalized_page(&self) -> u32 {
        self.page
            .filter(|p| *p > 0)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1)
    }
}

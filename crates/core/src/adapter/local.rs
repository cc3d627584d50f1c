//! Adapter serving a static, pre-normalized dataset from disk.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{Adapter, AdapterError};
use crate::model::{SearchResult, UNKNOWN_CATEGORY};
use crate::parse::datetime;

/// Results per emulated page.
pub const LOCAL_PAGE_SIZE: usize = 10;

const LOCAL_SOURCE: &str = "local-sample";

/// Adapter that matches queries against an in-memory dataset.
///
/// The dataset is read once at construction. Matching is a case-insensitive
/// substring test on title and info hash.
#[derive(Debug)]
pub struct LocalAdapter {
    id: String,
    items: Vec<SearchResult>,
}

impl LocalAdapter {
    /// Load the dataset from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, AdapterError> {
        let content = std::fs::read(path)
            .map_err(|e| AdapterError::Dataset(format!("{}: {}", path.display(), e)))?;
        let records: Vec<LocalRecord> = serde_json::from_slice(&content)
            .map_err(|e| AdapterError::Dataset(format!("{}: {}", path.display(), e)))?;

        Ok(Self::from_results(
            records.into_iter().map(SearchResult::from).collect(),
        ))
    }

    /// Build an adapter over results that are already normalized.
    pub fn from_results(items: Vec<SearchResult>) -> Self {
        Self {
            id: "sample".to_string(),
            items,
        }
    }

    /// Override the registry id (defaults to `sample`).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl Adapter for LocalAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Local sample data"
    }

    fn description(&self) -> &str {
        "Matches queries against the bundled sample dataset"
    }

    fn endpoint(&self) -> &str {
        "local-data"
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, AdapterError> {
        let needle = query.to_lowercase();
        let mut matches = Vec::new();

        for item in &self.items {
            if cancel.is_cancelled() {
                return Err(AdapterError::Cancelled);
            }

            let title_hit = item.title.to_lowercase().contains(&needle);
            let hash_hit = item
                .info_hash
                .as_deref()
                .is_some_and(|h| h.to_lowercase().contains(&needle));
            if title_hit || hash_hit {
                matches.push(item);
            }
        }

        let start = (page.max(1) as usize - 1) * LOCAL_PAGE_SIZE;
        Ok(matches
            .into_iter()
            .skip(start)
            .take(LOCAL_PAGE_SIZE)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalRecord {
    title: String,
    #[serde(default)]
    size: Option<i64>,
    #[serde(default)]
    seeders: Option<i64>,
    #[serde(default)]
    leechers: Option<i64>,
    #[serde(default)]
    magnet: String,
    #[serde(default)]
    uploaded: Option<String>,
    #[serde(default)]
    info_hash: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    trackers: Vec<String>,
}

impl From<LocalRecord> for SearchResult {
    fn from(r: LocalRecord) -> Self {
        let mut result = SearchResult::new(r.title, r.magnet).with_size(r.size);
        if let Some(hash) = r.info_hash {
            result = result.with_info_hash(hash);
        }
        result.seeders = r.seeders.and_then(|n| u32::try_from(n).ok());
        result.leechers = r.leechers.and_then(|n| u32::try_from(n).ok());
        result.uploaded = r.uploaded.as_deref().and_then(datetime);
        result.trackers = r.trackers;
        result.category = r
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
        result.source = r
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| LOCAL_SOURCE.to_string());
        result
    }
}

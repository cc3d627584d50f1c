//! Normalized search model shared by every adapter and the history log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parse::size_label;

/// Category used when a source omits one or reports it as uncategorized.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    /// Magnet URI. Empty if one could not be constructed.
    #[serde(default)]
    pub magnet: String,
    /// Info hash, always upper-case hex when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trackers: Vec<String>,
    /// Seeder count. `None` means unknown, which is not the same as zero.
    #[serde(default)]
    pub seeders: Option<u32>,
    #[serde(default)]
    pub leechers: Option<u32>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<i64>,
    /// Human readable size; empty iff `size` is absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub size_label: String,
    #[serde(default)]
    pub uploaded: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Id of the adapter that produced this hit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl SearchResult {
    /// Create a result with only a title and magnet; everything else absent.
    pub fn new(title: impl Into<String>, magnet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            magnet: magnet.into(),
            info_hash: None,
            trackers: Vec::new(),
            seeders: None,
            leechers: None,
            size: None,
            size_label: String::new(),
            uploaded: None,
            category: UNKNOWN_CATEGORY.to_string(),
            source: String::new(),
        }
    }

    /// Set the info hash, normalizing it to upper case. Blank hashes are dropped.
    pub fn with_info_hash(mut self, info_hash: impl AsRef<str>) -> Self {
        let hash = info_hash.as_ref().trim();
        self.info_hash = if hash.is_empty() {
            None
        } else {
            Some(hash.to_uppercase())
        };
        self
    }

    /// Set the size in bytes and recompute the label.
    pub fn with_size(mut self, size: Option<i64>) -> Self {
        self.size = size.filter(|s| *s > 0);
        self.size_label = self.size.map(size_label).unwrap_or_default();
        self
    }
}

/// How a search was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// The query was a magnet URI decoded locally.
    Magnet,
    /// The query was dispatched to an adapter.
    Search,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Magnet => "magnet",
            SearchMode::Search => "search",
        }
    }
}

/// Diagnostic envelope for one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub mode: SearchMode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub adapter: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub adapter_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub adapter_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub adapter_endpoint: String,
    pub result_count: usize,
    /// Primary adapter failure. Non-fatal: results may still be present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_error: Option<String>,
    #[serde(default)]
    pub fallback_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_adapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_adapter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_adapter_error: Option<String>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub has_next_page: bool,
}

fn first_page() -> u32 {
    1
}

impl SearchMeta {
    /// Metadata for a directly decoded magnet link.
    pub fn magnet() -> Self {
        Self {
            mode: SearchMode::Magnet,
            adapter: String::new(),
            adapter_name: String::new(),
            adapter_description: String::new(),
            adapter_endpoint: String::new(),
            result_count: 1,
            adapter_error: None,
            fallback_used: false,
            fallback_adapter: None,
            fallback_adapter_name: None,
            fallback_adapter_error: None,
            current_page: 1,
            has_previous_page: false,
            has_next_page: false,
        }
    }
}

/// The unit returned over the wire and persisted to history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub meta: SearchMeta,
}

/// Public adapter descriptor, derived from live registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    pub is_default: bool,
    pub is_fallback: bool,
}

//! Search adapter abstraction.
//!
//! An adapter is any backend (remote API or local dataset) that can answer a
//! paged query with normalized [`SearchResult`]s. Adapters either return a
//! complete result list or fail as a whole; there is no partial success.

mod local;
mod remote;

pub use local::{LocalAdapter, LOCAL_PAGE_SIZE};
pub use remote::{RemoteAdapter, RemoteProvider};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{AdaptersConfig, RemoteAdapterConfig};
use crate::magnet;
use crate::model::{SearchResult, UNKNOWN_CATEGORY};

/// Errors raised by an adapter while answering a query.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote service error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to load dataset: {0}")]
    Dataset(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Search cancelled")]
    Cancelled,
}

/// A pluggable search backend.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Stable, unique registry key.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Informational endpoint (URL or a local marker).
    fn endpoint(&self) -> &str;

    /// Answer `query` for the 1-based `page`.
    ///
    /// Implementations must stop and return [`AdapterError::Cancelled`] once
    /// `cancel` fires.
    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, AdapterError>;
}

/// Build every enabled adapter described by `config`.
///
/// Adapters that fail to initialize (bad endpoint, unreadable dataset) are
/// logged and skipped so the service can start with the rest.
pub fn build_adapters(config: &AdaptersConfig) -> Vec<Arc<dyn Adapter>> {
    let mut adapters: Vec<Arc<dyn Adapter>> = Vec::new();

    let remotes = [
        (RemoteProvider::Apibay, &config.apibay),
        (RemoteProvider::Nyaa, &config.nyaa),
        (RemoteProvider::Sukebei, &config.sukebei),
    ];
    for (provider, remote) in remotes {
        if !remote.enabled {
            continue;
        }
        match build_remote(provider, remote, config) {
            Ok(adapter) => adapters.push(Arc::new(adapter)),
            Err(e) => warn!(adapter = provider.id(), error = %e, "Skipping remote adapter"),
        }
    }

    if config.sample.enabled {
        match LocalAdapter::from_file(&config.sample.path) {
            Ok(adapter) => {
                info!(
                    adapter = adapter.id(),
                    records = adapter.len(),
                    "Loaded local dataset"
                );
                adapters.push(Arc::new(adapter));
            }
            Err(e) => warn!(
                path = %config.sample.path.display(),
                error = %e,
                "Skipping local dataset adapter"
            ),
        }
    }

    adapters
}

fn build_remote(
    provider: RemoteProvider,
    remote: &RemoteAdapterConfig,
    config: &AdaptersConfig,
) -> Result<RemoteAdapter, AdapterError> {
    RemoteAdapter::new(
        provider,
        &remote.endpoint,
        config.trackers.clone(),
        remote.timeout(),
        &config.user_agent,
    )
}

/// A record as delivered by a provider, before normalization.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRecord {
    pub title: Option<String>,
    pub magnet: Option<String>,
    pub info_hash: Option<String>,
    pub seeders: Option<u32>,
    pub leechers: Option<u32>,
    pub size: Option<i64>,
    /// Provider-supplied size label, kept verbatim when the size parses.
    pub size_label: Option<String>,
    pub uploaded: Option<chrono::DateTime<chrono::Utc>>,
    pub category: Option<String>,
}

/// Turn a raw provider record into a [`SearchResult`].
///
/// Records without a title, or with neither a magnet nor an info hash, cannot
/// be acted upon and are dropped. When only a hash is present a magnet is
/// synthesized from the hash, title and the adapter's trackers.
pub(crate) fn normalize(
    raw: RawRecord,
    source: &str,
    trackers: &[String],
    uncategorized: &[&str],
) -> Option<SearchResult> {
    let title = non_blank(raw.title)?;
    let magnet = non_blank(raw.magnet);
    let info_hash = non_blank(raw.info_hash)
        .or_else(|| magnet.as_deref().and_then(crate::parse::info_hash_from_magnet));

    let magnet = match (magnet, &info_hash) {
        (Some(magnet), _) => magnet,
        (None, Some(hash)) => magnet::build(hash, &title, trackers),
        (None, None) => return None,
    };

    let mut result = SearchResult::new(title, magnet).with_size(raw.size);
    if let Some(hash) = info_hash {
        result = result.with_info_hash(hash);
    }
    if result.size.is_some() {
        if let Some(label) = non_blank(raw.size_label) {
            result.size_label = label;
        }
    }
    result.trackers = trackers.to_vec();
    result.seeders = raw.seeders;
    result.leechers = raw.leechers;
    result.uploaded = raw.uploaded;
    result.category = non_blank(raw.category)
        .filter(|c| !uncategorized.contains(&c.as_str()))
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());
    result.source = source.to_string();
    Some(result)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

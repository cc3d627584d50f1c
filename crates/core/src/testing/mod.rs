//! Testing utilities and mock implementations.
//!
//! Mocks for the adapter and history seams, so the orchestrator and the HTTP
//! surface can be exercised without network access or disk state.
//!
//! # Example
//!
//! ```rust,ignore
//! use magnetsearch_core::testing::{fixtures, MockAdapter, MockHistoryStore};
//!
//! let primary = Arc::new(MockAdapter::new("apibay"));
//! let fallback = Arc::new(MockAdapter::new("sample").with_results(fixtures::results("debian", 3)));
//! let history = Arc::new(MockHistoryStore::new());
//!
//! registry.register(primary.clone());
//! registry.register(fallback.clone());
//! registry.configure("apibay", "sample")?;
//! ```

mod mock_adapter;
mod mock_history;

pub use mock_adapter::{MockAdapter, RecordedSearch};
pub use mock_history::MockHistoryStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::magnet;
    use crate::model::SearchResult;

    /// A normalized result with a real-looking hash, magnet and swarm stats.
    pub fn search_result(title: &str, info_hash: &str) -> SearchResult {
        let trackers = vec!["udp://tracker.opentrackr.org:1337/announce".to_string()];
        let mut result = SearchResult::new(title, magnet::build(info_hash, title, &trackers))
            .with_info_hash(info_hash)
            .with_size(Some(1024 * 1024 * 700)); // 700 MB
        result.trackers = trackers;
        result.seeders = Some(50);
        result.leechers = Some(10);
        result.source = "mock".to_string();
        result
    }

    /// `count` results titled `"<prefix> <n>"` with distinct hashes.
    pub fn results(prefix: &str, count: usize) -> Vec<SearchResult> {
        (0..count)
            .map(|i| search_result(&format!("{} {}", prefix, i), &format!("{:040x}", i + 1)))
            .collect()
    }
}

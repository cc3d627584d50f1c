//! In-memory history store for testing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;

use crate::history::{HistoryEntry, HistoryError, SearchHistory};
use crate::model::SearchResponse;

/// Mock implementation of the SearchHistory trait.
///
/// Keeps entries in memory, newest first, without any cap. Writes can be
/// made to fail to exercise best-effort recording.
#[derive(Debug, Default)]
pub struct MockHistoryStore {
    entries: Mutex<Vec<HistoryEntry>>,
    failing: AtomicBool,
    next_id: AtomicU64,
    /// Blocking sleep inside `record`, standing in for a slow fsync.
    write_delay: Mutex<Option<Duration>>,
}

impl MockHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `record` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every `record` block the calling thread for `delay`.
    pub fn set_write_delay(&self, delay: Duration) {
        *self
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }
}

impl SearchHistory for MockHistoryStore {
    fn record(&self, response: &SearchResponse) -> Result<HistoryEntry, HistoryError> {
        let delay = *self
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(HistoryError::Io {
                path: "mock-history.json".into(),
                source: std::io::Error::other("simulated write failure"),
            });
        }

        let entry = HistoryEntry {
            id: (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string(),
            query: response.query.clone(),
            created_at: Utc::now(),
            mode: response.meta.mode,
            meta: response.meta.clone(),
            results: response.results.clone(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, entry.clone());
        Ok(entry)
    }

    fn list(&self) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

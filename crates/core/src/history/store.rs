//! History storage trait and errors.

use std::path::PathBuf;

use thiserror::Error;

use super::HistoryEntry;
use crate::model::SearchResponse;

/// Errors raised while loading or persisting history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialization(String),

    #[error("History file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Storage for past searches, newest first.
pub trait SearchHistory: Send + Sync {
    /// Record a response and persist it before returning.
    ///
    /// Returns the stored entry. On error nothing is recorded.
    fn record(&self, response: &SearchResponse) -> Result<HistoryEntry, HistoryError>;

    /// Independent copies of every entry, newest first.
    fn list(&self) -> Vec<HistoryEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

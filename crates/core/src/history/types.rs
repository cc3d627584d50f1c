use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{SearchMeta, SearchMode, SearchResult};

/// One recorded search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Nanosecond creation timestamp, unique within the store.
    pub id: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub mode: SearchMode,
    pub meta: SearchMeta,
    /// Capped copy of the response results.
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

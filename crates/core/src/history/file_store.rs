//! JSON file-backed history store.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use super::{HistoryEntry, HistoryError, SearchHistory};
use crate::model::SearchResponse;

struct StoreState {
    entries: Vec<HistoryEntry>,
    last_id: i128,
}

/// History persisted as a pretty-printed JSON array.
///
/// Every write serializes the whole list to `<path>.tmp` and renames it over
/// `path`, so readers only ever see a complete file. All mutations happen
/// under one lock.
pub struct FileHistoryStore {
    path: PathBuf,
    max_entries: usize,
    max_results: usize,
    state: Mutex<StoreState>,
}

impl FileHistoryStore {
    /// Open the store, creating the backing file if it does not exist.
    ///
    /// An empty file is an empty history. A file that cannot be parsed is an
    /// error. Persisted entries beyond `max_entries` are dropped.
    pub fn open(
        path: impl Into<PathBuf>,
        max_entries: usize,
        max_results: usize,
    ) -> Result<Self, HistoryError> {
        let path = path.into();
        let store = Self {
            path,
            max_entries: max_entries.max(1),
            max_results,
            state: Mutex::new(StoreState {
                entries: Vec::new(),
                last_id: 0,
            }),
        };

        match fs::read(&store.path) {
            Ok(data) => {
                let mut entries = parse_entries(&store.path, &data)?;
                entries.truncate(store.max_entries);
                let last_id = entries
                    .iter()
                    .filter_map(|e| e.id.parse::<i128>().ok())
                    .max()
                    .unwrap_or(0);
                info!(path = %store.path.display(), entries = entries.len(), "Loaded search history");

                let mut state = store.lock();
                state.entries = entries;
                state.last_id = last_id;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %store.path.display(), "Creating empty search history");
                store.persist(&[])?;
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    path: store.path.clone(),
                    source,
                })
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let data = serde_json::to_vec_pretty(entries)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.tmp_path();
        let io_err = |source| HistoryError::Io {
            path: tmp.clone(),
            source,
        };
        let mut file = File::create(&tmp).map_err(io_err)?;
        file.write_all(&data).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), entries = entries.len(), "Persisted search history");
        Ok(())
    }
}

impl SearchHistory for FileHistoryStore {
    fn record(&self, response: &SearchResponse) -> Result<HistoryEntry, HistoryError> {
        let mut state = self.lock();

        let now = Utc::now();
        let nanos = now
            .timestamp_nanos_opt()
            .map(i128::from)
            .unwrap_or(state.last_id + 1);
        let id = nanos.max(state.last_id + 1);

        let results: Vec<_> = response
            .results
            .iter()
            .take(self.max_results)
            .cloned()
            .collect();
        let mut meta = response.meta.clone();
        meta.result_count = results.len();

        let entry = HistoryEntry {
            id: id.to_string(),
            query: response.query.clone(),
            created_at: now,
            mode: meta.mode,
            meta,
            results,
        };

        let mut entries = Vec::with_capacity(self.max_entries);
        entries.push(entry.clone());
        entries.extend(
            state
                .entries
                .iter()
                .take(self.max_entries.saturating_sub(1))
                .cloned(),
        );

        self.persist(&entries)?;
        state.entries = entries;
        state.last_id = id;
        Ok(entry)
    }

    fn list(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    fn len(&self) -> usize {
        self.lock().entries.len()
    }
}

fn parse_entries(path: &Path, data: &[u8]) -> Result<Vec<HistoryEntry>, HistoryError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let entries: Option<Vec<HistoryEntry>> =
        serde_json::from_slice(data).map_err(|e| HistoryError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(entries.unwrap_or_default())
}

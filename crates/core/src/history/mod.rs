//! Bounded, durable log of executed searches.

mod file_store;
mod store;
mod types;

pub use file_store::FileHistoryStore;
pub use store::{HistoryError, SearchHistory};
pub use types::HistoryEntry;

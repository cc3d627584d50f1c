//! Search request lifecycle.
//!
//! The orchestrator decides between direct magnet decoding and adapter
//! dispatch, retries through the registry's fallback adapter when the
//! primary fails or comes back empty, and records every response to the
//! history store.

mod service;
mod types;

pub use service::SearchOrchestrator;
pub use types::{SearchError, SearchRequest};

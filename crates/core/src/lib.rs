pub mod adapter;
pub mod config;
pub mod history;
pub mod magnet;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod parse;
pub mod registry;
pub mod testing;

pub use adapter::{
    build_adapters, Adapter, AdapterError, LocalAdapter, RemoteAdapter, RemoteProvider,
    LOCAL_PAGE_SIZE,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use history::{FileHistoryStore, HistoryEntry, HistoryError, SearchHistory};
pub use magnet::MagnetError;
pub use model::{AdapterInfo, SearchMeta, SearchMode, SearchResponse, SearchResult};
pub use orchestrator::{SearchError, SearchOrchestrator, SearchRequest};
pub use registry::{AdapterRegistry, RegistryError};

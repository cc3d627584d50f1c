use std::sync::Arc;

use magnetsearch_core::{
    AdapterRegistry, Config, SanitizedConfig, SearchHistory, SearchOrchestrator,
};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: SearchOrchestrator,
}

impl AppState {
    pub fn new(config: Config, orchestrator: SearchOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// Wire a registry and history store into a ready-to-serve state.
    pub fn with_components(
        config: Config,
        registry: Arc<AdapterRegistry>,
        history: Arc<dyn SearchHistory>,
    ) -> Self {
        let orchestrator =
            SearchOrchestrator::new(registry, history, config.search.expected_page_size);
        Self::new(config, orchestrator)
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub fn registry(&self) -> &AdapterRegistry {
        self.orchestrator.registry()
    }

    pub fn history(&self) -> &dyn SearchHistory {
        self.orchestrator.history().as_ref()
    }
}

use super::{
    types::{Config, RemoteAdapterConfig},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - History and paging limits are positive
/// - Enabled remote adapters have an endpoint and a timeout
/// - At least one adapter is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // History validation
    if config.history.max_entries == 0 {
        return Err(ConfigError::ValidationError(
            "history.max_entries must be at least 1".to_string(),
        ));
    }
    if config.history.max_results_per_entry == 0 {
        return Err(ConfigError::ValidationError(
            "history.max_results_per_entry must be at least 1".to_string(),
        ));
    }

    if config.search.expected_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "search.expected_page_size must be at least 1".to_string(),
        ));
    }

    // Adapter validation
    let adapters = &config.adapters;
    let remotes = [
        ("apibay", &adapters.apibay),
        ("nyaa", &adapters.nyaa),
        ("sukebei", &adapters.sukebei),
    ];
    for (id, remote) in remotes {
        validate_remote(id, remote)?;
    }

    let any_enabled = remotes.iter().any(|(_, r)| r.enabled) || adapters.sample.enabled;
    if !any_enabled {
        return Err(ConfigError::ValidationError(
            "at least one adapter must be enabled".to_string(),
        ));
    }

    Ok(())
}

fn validate_remote(id: &str, config: &RemoteAdapterConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }
    if config.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "adapters.{}.endpoint is required when the adapter is enabled",
            id
        )));
    }
    if config.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(format!(
            "adapters.{}.timeout_secs cannot be 0",
            id
        )));
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub history: HistoryConfig,
    pub search: SearchConfig,
    pub adapters: AdaptersConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3001
}

/// Search history persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON file holding the history.
    pub path: PathBuf,
    /// Entries kept; oldest are evicted first.
    pub max_entries: usize,
    /// Results kept per entry.
    pub max_results_per_entry: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/searchHistory.json"),
            max_entries: 50,
            max_results_per_entry: 20,
        }
    }
}

/// Adapter selection and paging
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Adapter used when a request names none. Empty picks one automatically.
    pub default_adapter: String,
    /// Adapter retried when the primary fails or returns nothing. Empty disables.
    pub fallback_adapter: String,
    /// A page with at least this many results is assumed to have a successor.
    pub expected_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_adapter: "apibay".to_string(),
            fallback_adapter: "sample".to_string(),
            expected_page_size: 10,
        }
    }
}

/// Adapter collaborators
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdaptersConfig {
    /// Trackers appended to magnets synthesized from a bare info hash.
    pub trackers: Vec<String>,
    pub user_agent: String,
    pub apibay: RemoteAdapterConfig,
    pub nyaa: RemoteAdapterConfig,
    pub sukebei: RemoteAdapterConfig,
    pub sample: LocalAdapterConfig,
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            trackers: vec![
                "udp://tracker.opentrackr.org:1337/announce".to_string(),
                "udp://open.stealth.si:80/announce".to_string(),
                "udp://tracker.tiny-vps.com:6969/announce".to_string(),
            ],
            user_agent: format!("magnetsearch/{}", env!("CARGO_PKG_VERSION")),
            apibay: RemoteAdapterConfig::new("https://apibay.org/q.php", 8),
            nyaa: RemoteAdapterConfig::new("https://nyaaapi.onrender.com/nyaa", 10),
            sukebei: RemoteAdapterConfig::new("https://nyaaapi.onrender.com/sukebei", 10),
            sample: LocalAdapterConfig::default(),
        }
    }
}

/// A remote JSON search provider
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteAdapterConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteAdapterConfig {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.to_string(),
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteAdapterConfig {
    fn default() -> Self {
        Self::new("", 10)
    }
}

/// The bundled local dataset
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalAdapterConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for LocalAdapterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from("data/sampleResults.json"),
        }
    }
}

/// Sanitized config for API responses (file paths and user agent omitted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub history: SanitizedHistoryConfig,
    pub search: SearchConfig,
    pub adapters: Vec<SanitizedAdapterConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedHistoryConfig {
    pub max_entries: usize,
    pub max_results_per_entry: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAdapterConfig {
    pub id: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl SanitizedAdapterConfig {
    fn remote(id: &str, config: &RemoteAdapterConfig) -> Self {
        Self {
            id: id.to_string(),
            enabled: config.enabled,
            endpoint: Some(config.endpoint.clone()),
            timeout_secs: Some(config.timeout_secs),
        }
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let adapters = &config.adapters;
        Self {
            server: config.server.clone(),
            history: SanitizedHistoryConfig {
                max_entries: config.history.max_entries,
                max_results_per_entry: config.history.max_results_per_entry,
            },
            search: config.search.clone(),
            adapters: vec![
                SanitizedAdapterConfig::remote("apibay", &adapters.apibay),
                SanitizedAdapterConfig::remote("nyaa", &adapters.nyaa),
                SanitizedAdapterConfig::remote("sukebei", &adapters.sukebei),
                SanitizedAdapterConfig {
                    id: "sample".to_string(),
                    enabled: adapters.sample.enabled,
                    endpoint: None,
                    timeout_secs: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.history.max_results_per_entry, 20);
        assert_eq!(config.search.default_adapter, "apibay");
        assert_eq!(config.search.fallback_adapter, "sample");
        assert_eq!(config.search.expected_page_size, 10);
        assert_eq!(config.adapters.trackers.len(), 3);
        assert!(config.adapters.user_agent.starts_with("magnetsearch/"));
        assert_eq!(config.adapters.apibay.timeout(), Duration::from_secs(8));
        assert_eq!(config.adapters.nyaa.endpoint, "https://nyaaapi.onrender.com/nyaa");
        assert!(config.adapters.sample.enabled);
    }

    #[test]
    fn test_sanitized_config_hides_paths() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        let json = serde_json::to_value(&sanitized).unwrap();

        assert_eq!(json["server"]["port"], 3001);
        assert_eq!(json["history"]["max_entries"], 50);
        assert!(json["history"].get("path").is_none());
        assert!(json["adapters"].get("user_agent").is_none());

        let ids: Vec<&str> = sanitized.adapters.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["apibay", "nyaa", "sukebei", "sample"]);
        assert_eq!(json["adapters"][0]["timeout_secs"], 8);
        assert!(json["adapters"][3].get("endpoint").is_none());
    }
}

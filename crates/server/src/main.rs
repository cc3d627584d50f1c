use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magnetsearch_core::{
    build_adapters, load_config, validate_config, AdapterRegistry, FileHistoryStore,
    SearchHistory,
};
use magnetsearch_server::{create_router, AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("magnetsearch v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("MAGNETSEARCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("History path: {:?}", config.history.path);

    // Build and register adapters
    let registry = Arc::new(AdapterRegistry::new());
    for adapter in build_adapters(&config.adapters) {
        info!("Registered adapter: {} ({})", adapter.id(), adapter.name());
        registry.register(adapter);
    }

    // A bad default or fallback leaves the service up in degraded mode
    if let Err(e) = registry.configure(
        &config.search.default_adapter,
        &config.search.fallback_adapter,
    ) {
        warn!("Adapter registry misconfigured: {}", e);
    }
    if registry.default_adapter().is_none() {
        warn!("No default adapter available; searches without an explicit adapter will fail");
    }

    // Open history store
    let history: Arc<dyn SearchHistory> = Arc::new(
        FileHistoryStore::open(
            &config.history.path,
            config.history.max_entries,
            config.history.max_results_per_entry,
        )
        .with_context(|| format!("Failed to open history at {:?}", config.history.path))?,
    );
    info!("History loaded with {} entries", history.len());

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::with_components(config, registry, history));
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

//! Prometheus metrics for core components.
//!
//! Covers the search flow (modes, fallbacks, result counts), per-adapter
//! request outcomes and latency, and history persistence failures.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Searches total by mode.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magnetsearch_searches_total", "Total searches handled"),
        &["mode"], // "magnet", "search"
    )
    .unwrap()
});

/// Fallback attempts by outcome.
pub static FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magnetsearch_fallbacks_total",
            "Total fallback adapter attempts",
        ),
        &["result"], // "used", "empty", "error"
    )
    .unwrap()
});

/// Results returned per search.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magnetsearch_search_results",
            "Number of results returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Adapter Metrics
// =============================================================================

/// Adapter requests by adapter and outcome.
pub static ADAPTER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magnetsearch_adapter_requests_total",
            "Total adapter search requests",
        ),
        &["adapter", "result"], // result: "success", "empty", "error"
    )
    .unwrap()
});

/// Remote adapter request duration in seconds.
pub static ADAPTER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magnetsearch_adapter_duration_seconds",
            "Duration of adapter search calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["adapter"],
    )
    .unwrap()
});

// =============================================================================
// History Metrics
// =============================================================================

/// History writes that failed to persist.
pub static HISTORY_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magnetsearch_history_write_failures_total",
        "Total history entries that could not be persisted",
    )
    .unwrap()
});

/// Entries currently held in the history store.
pub static HISTORY_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "magnetsearch_history_entries",
        "Number of entries in the search history",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(FALLBACKS_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Adapters
        Box::new(ADAPTER_REQUESTS.clone()),
        Box::new(ADAPTER_DURATION.clone()),
        // History
        Box::new(HISTORY_WRITE_FAILURES.clone()),
        Box::new(HISTORY_ENTRIES.clone()),
    ]
}

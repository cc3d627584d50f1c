//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock adapters and a real file-backed history store in a temporary
//! directory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use magnetsearch_core::{
    testing::MockAdapter, AdapterRegistry, Config, FileHistoryStore, SearchHistory,
};
use magnetsearch_server::AppState;

/// Re-export fixtures for test convenience
pub use magnetsearch_core::testing::fixtures;

/// Id of the default mock adapter.
pub const PRIMARY_ID: &str = "primary";
/// Id of the fallback mock adapter.
pub const FALLBACK_ID: &str = "sample";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.primary.set_results(fixtures::results("ubuntu", 3));
///
///     let response = fixture.get("/api/search?q=ubuntu").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Default adapter - configure its results or failures
    pub primary: Arc<MockAdapter>,
    /// Fallback adapter
    pub fallback: Arc<MockAdapter>,
    /// History store backing the router
    pub history: Arc<FileHistoryStore>,
    /// Temporary directory holding the history file
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` if empty or not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestFixture {
    /// Create a fixture with `primary` as default and `sample` as fallback,
    /// both returning no results until configured.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let history_path = temp_dir.path().join("searchHistory.json");

        let mut config = Config::default();
        config.history.path = history_path.clone();
        config.search.default_adapter = PRIMARY_ID.to_string();
        config.search.fallback_adapter = FALLBACK_ID.to_string();

        let primary = Arc::new(MockAdapter::new(PRIMARY_ID).with_name("Primary"));
        let fallback = Arc::new(MockAdapter::new(FALLBACK_ID).with_name("Sample Data"));

        let registry = Arc::new(AdapterRegistry::new());
        registry.register(primary.clone());
        registry.register(fallback.clone());
        registry
            .configure(PRIMARY_ID, FALLBACK_ID)
            .expect("Failed to configure registry");

        let history = Arc::new(
            FileHistoryStore::open(
                &history_path,
                config.history.max_entries,
                config.history.max_results_per_entry,
            )
            .expect("Failed to open history store"),
        );

        let state = Arc::new(AppState::with_components(
            config,
            registry,
            Arc::clone(&history) as Arc<dyn SearchHistory>,
        ));

        // Create router
        let router = magnetsearch_server::create_router(state);

        Self {
            router,
            primary,
            fallback,
            history,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a request with an arbitrary method and empty body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            $response.text
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}

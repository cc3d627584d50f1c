//! Mock adapter for testing.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::adapter::{Adapter, AdapterError};
use crate::model::SearchResult;

/// A recorded search for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub query: String,
    pub page: u32,
}

/// Mock implementation of the Adapter trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results for every page
/// - Track queries and pages for assertions
/// - Simulate failures, persistent or one-shot
/// - Simulate slow backends that honor cancellation
///
/// # Example
///
/// ```rust,ignore
/// use magnetsearch_core::testing::MockAdapter;
///
/// let adapter = MockAdapter::new("apibay");
/// adapter.set_results(vec![SearchResult::new("Sintel", "magnet:?xt=urn:btih:AB")]);
/// adapter.set_next_error(AdapterError::Timeout);
///
/// assert!(adapter.search("sintel", 1, &cancel).await.is_err());
/// assert_eq!(adapter.search("sintel", 1, &cancel).await?.len(), 1);
/// assert_eq!(adapter.search_count(), 2);
/// ```
#[derive(Debug)]
pub struct MockAdapter {
    id: String,
    name: String,
    description: String,
    endpoint: String,
    results: Arc<RwLock<Vec<SearchResult>>>,
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// Consumed by the next search.
    next_error: Arc<RwLock<Option<AdapterError>>>,
    /// Returned by every search until cleared.
    failure: Arc<RwLock<Option<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockAdapter {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Mock {}", id),
            description: "Mock search adapter".to_string(),
            endpoint: format!("mock://{}", id),
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        self.set_results(results);
        self
    }

    /// Set the results returned for subsequent searches.
    pub fn set_results(&self, results: Vec<SearchResult>) {
        *self.results.write().unwrap_or_else(PoisonError::into_inner) = results;
    }

    /// Configure the next search to fail with the given error.
    pub fn set_next_error(&self, error: AdapterError) {
        *self.next_error.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Make every search fail with an HTTP 502 carrying `message`, or stop
    /// failing when `None`.
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = message.map(String::from);
    }

    /// Delay every search. The delay is cut short by cancellation.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    pub fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>, AdapterError> {
        self.searches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedSearch {
                query: query.to_string(),
                page,
            });

        let delay = *self.delay.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::select! {
                _ = cancel.cancelled() => return Err(AdapterError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        let next_error = self
            .next_error
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(err) = next_error {
            return Err(err);
        }

        let failure = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(message) = failure {
            return Err(AdapterError::Status {
                status: 502,
                body: message,
            });
        }

        let results = self
            .results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Ok(results)
    }
}

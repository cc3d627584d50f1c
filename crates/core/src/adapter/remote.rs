//! HTTP JSON adapters for public magnet search APIs.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{normalize, Adapter, AdapterError, RawRecord};
use crate::metrics::ADAPTER_DURATION;
use crate::model::SearchResult;
use crate::parse::{
    datetime, human_size, optional_count, optional_i64, optional_string, unix_timestamp,
};

/// Known remote providers. Each one owns its identity and payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteProvider {
    Apibay,
    Nyaa,
    Sukebei,
}

impl RemoteProvider {
    pub fn id(&self) -> &'static str {
        match self {
            RemoteProvider::Apibay => "apibay",
            RemoteProvider::Nyaa => "nyaa",
            RemoteProvider::Sukebei => "sukebei",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RemoteProvider::Apibay => "The Pirate Bay (apibay.org)",
            RemoteProvider::Nyaa => "Nyaa",
            RemoteProvider::Sukebei => "Sukebei",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RemoteProvider::Apibay => "Searches through the public apibay.org API",
            RemoteProvider::Nyaa => "Searches Nyaa through the nyaaapi.onrender.com API",
            RemoteProvider::Sukebei => "Searches Sukebei through the nyaaapi.onrender.com API",
        }
    }

    /// Whether the provider accepts a `page` parameter.
    pub fn supports_paging(&self) -> bool {
        !matches!(self, RemoteProvider::Apibay)
    }

    /// Category values the provider uses to mean "no category".
    fn uncategorized(&self) -> &'static [&'static str] {
        match self {
            RemoteProvider::Apibay => &["0"],
            RemoteProvider::Nyaa | RemoteProvider::Sukebei => &[],
        }
    }

    /// Decode a response body into raw records.
    fn decode(&self, body: &[u8]) -> Result<Vec<RawRecord>, AdapterError> {
        let decode_err = |e: serde_json::Error| AdapterError::Decode(e.to_string());
        match self {
            RemoteProvider::Apibay => {
                let records: Vec<ApibayRecord> = serde_json::from_slice(body).map_err(decode_err)?;
                Ok(records.into_iter().map(RawRecord::from).collect())
            }
            RemoteProvider::Nyaa => {
                let records: Vec<NyaaRecord> = serde_json::from_slice(body).map_err(decode_err)?;
                Ok(records.into_iter().map(RawRecord::from).collect())
            }
            RemoteProvider::Sukebei => {
                let response: SukebeiResponse =
                    serde_json::from_slice(body).map_err(decode_err)?;
                Ok(response.data.into_iter().map(RawRecord::from).collect())
            }
        }
    }
}

/// Adapter backed by a remote JSON search endpoint.
pub struct RemoteAdapter {
    provider: RemoteProvider,
    endpoint: String,
    base_url: Url,
    client: Client,
    trackers: Vec<String>,
}

impl RemoteAdapter {
    /// Create an adapter for `provider` at `endpoint`.
    ///
    /// `timeout` bounds every outbound request made by this adapter.
    pub fn new(
        provider: RemoteProvider,
        endpoint: &str,
        trackers: Vec<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, AdapterError> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| AdapterError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            base_url,
            client,
            trackers,
        })
    }

    pub fn provider(&self) -> RemoteProvider {
        self.provider
    }

    fn search_url(&self, query: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if self.provider.supports_paging() {
                pairs.append_pair("page", &page.to_string());
            }
        }
        url
    }

    async fn fetch(&self, url: Url) -> Result<Vec<SearchResult>, AdapterError> {
        let response = self.client.get(url).send().await.map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.bytes().await.map_err(map_request_error)?;
        let records = self.provider.decode(&body)?;
        let total = records.len();

        let results: Vec<SearchResult> = records
            .into_iter()
            .filter_map(|raw| {
                normalize(
                    raw,
                    self.provider.id(),
                    &self.trackers,
                    self.provider.uncategorized(),
                )
            })
            .collect();

        debug!(
            adapter = self.provider.id(),
            received = total,
            kept = results.len(),
            "Remote search decoded"
        );

        Ok(results)
    }
}

#[async_trait]
impl Adapter for RemoteAdapter {
    fn id(&self) -> &str {
        self.provider.id()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn description(&self) -> &str {
        self.provider.description()
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
        if page > 1 && !self.provider.supports_paging() {
            return Ok(Vec::new());
        }

        let url = self.search_url(query, page);
        debug!(adapter = self.provider.id(), page = page, "Searching remote provider");

        let start = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdapterError::Cancelled),
            result = self.fetch(url) => result,
        };
        ADAPTER_DURATION
            .with_label_values(&[self.provider.id()])
            .observe(start.elapsed().as_secs_f64());

        result
    }
}

fn map_request_error(e: reqwest::Error) -> AdapterError {
    if e.is_timeout() {
        AdapterError::Timeout
    } else {
        AdapterError::Http(e)
    }
}

/// Size that may arrive as a byte count or as a label like `"1.2 GiB"`.
fn size_field(value: &Value) -> (Option<i64>, Option<String>) {
    match value {
        Value::String(label) if optional_i64(value).is_none() => {
            (human_size(label), Some(label.trim().to_string()))
        }
        _ => (optional_i64(value), None),
    }
}

/// Timestamp that may arrive as a formatted string or unix seconds.
fn timestamp_field(value: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    value
        .as_str()
        .and_then(datetime)
        .or_else(|| unix_timestamp(value))
}

// Provider payloads

#[derive(Debug, Deserialize)]
struct ApibayRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    info_hash: Option<String>,
    #[serde(default)]
    seeders: Value,
    #[serde(default)]
    leechers: Value,
    #[serde(default)]
    size: Value,
    #[serde(default)]
    added: Value,
    #[serde(default)]
    category: Value,
}

impl From<ApibayRecord> for RawRecord {
    fn from(r: ApibayRecord) -> Self {
        // apibay answers an empty search with a single all-zero placeholder
        let info_hash = r
            .info_hash
            .filter(|h| !h.trim().chars().all(|c| c == '0'));

        RawRecord {
            title: r.name,
            magnet: None,
            info_hash,
            seeders: optional_count(&r.seeders),
            leechers: optional_count(&r.leechers),
            size: optional_i64(&r.size),
            size_label: None,
            uploaded: unix_timestamp(&r.added),
            category: optional_string(&r.category),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NyaaRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    info_hash: Option<String>,
    #[serde(default)]
    magnet: Option<String>,
    #[serde(default)]
    seeders: Value,
    #[serde(default)]
    leechers: Value,
    #[serde(default)]
    size: Value,
    #[serde(default)]
    date: Value,
    #[serde(default)]
    category: Value,
}

impl From<NyaaRecord> for RawRecord {
    fn from(r: NyaaRecord) -> Self {
        let (size, size_label) = size_field(&r.size);
        RawRecord {
            title: r.name,
            magnet: r.magnet,
            info_hash: r.info_hash,
            seeders: optional_count(&r.seeders),
            leechers: optional_count(&r.leechers),
            size,
            size_label,
            uploaded: timestamp_field(&r.date),
            category: optional_string(&r.category),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SukebeiResponse {
    #[serde(default)]
    data: Vec<SukebeiRecord>,
}

#[derive(Debug, Deserialize)]
struct SukebeiRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    magnet: Option<String>,
    #[serde(default)]
    seeders: Value,
    #[serde(default)]
    leechers: Value,
    #[serde(default)]
    size: Value,
    #[serde(default)]
    time: Value,
    #[serde(default)]
    category: Value,
}

impl From<SukebeiRecord> for RawRecord {
    fn from(r: SukebeiRecord) -> Self {
        let (size, size_label) = size_field(&r.size);
        RawRecord {
            title: r.title,
            magnet: r.magnet,
            info_hash: None,
            seeders: optional_count(&r.seeders),
            leechers: optional_count(&r.leechers),
            size,
            size_label,
            uploaded: timestamp_field(&r.time),
            category: optional_string(&r.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN_CATEGORY;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use chrono::Datelike;
    use serde_json::json;
    use std::collections::HashMap;

    fn trackers() -> Vec<String> {
        vec!["udp://tracker.example:1337/announce".to_string()]
    }

    fn adapter(provider: RemoteProvider, endpoint: &str) -> RemoteAdapter {
        RemoteAdapter::new(
            provider,
            endpoint,
            trackers(),
            Duration::from_secs(5),
            "magnetsearch-test",
        )
        .unwrap()
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/search", addr)
    }

    #[test]
    fn test_provider_identity() {
        assert_eq!(RemoteProvider::Apibay.id(), "apibay");
        assert_eq!(RemoteProvider::Nyaa.id(), "nyaa");
        assert_eq!(RemoteProvider::Sukebei.id(), "sukebei");
        assert!(!RemoteProvider::Apibay.supports_paging());
        assert!(RemoteProvider::Nyaa.supports_paging());
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = RemoteAdapter::new(
            RemoteProvider::Nyaa,
            "not a url",
            vec![],
            Duration::from_secs(1),
            "ua",
        );
        assert!(matches!(result, Err(AdapterError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_search_url_includes_page_when_supported() {
        let nyaa = adapter(RemoteProvider::Nyaa, "https://example.com/nyaa");
        let url = nyaa.search_url("one piece", 3);
        assert_eq!(url.as_str(), "https://example.com/nyaa?q=one+piece&page=3");

        let apibay = adapter(RemoteProvider::Apibay, "https://apibay.org/q.php");
        let url = apibay.search_url("ubuntu", 1);
        assert_eq!(url.as_str(), "https://apibay.org/q.php?q=ubuntu");
    }

    #[test]
    fn test_decode_apibay_string_numbers() {
        let body = json!([
            {
                "id": "1",
                "name": "Ubuntu 24.04 Desktop",
                "info_hash": "abcdef0123456789abcdef0123456789abcdef01",
                "seeders": "120",
                "leechers": "n/a",
                "size": "6114770944",
                "added": "1713398400",
                "category": "303"
            },
            {
                "id": "0",
                "name": "No results returned",
                "info_hash": "0000000000000000000000000000000000000000",
                "seeders": "0",
                "leechers": "0",
                "size": "0",
                "added": "0",
                "category": "0"
            }
        ]);
        let records = RemoteProvider::Apibay
            .decode(body.to_string().as_bytes())
            .unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.seeders, Some(120));
        assert_eq!(first.leechers, None);
        assert_eq!(first.size, Some(6_114_770_944));
        assert_eq!(first.uploaded.unwrap().year(), 2024);
        assert_eq!(first.category.as_deref(), Some("303"));

        // The placeholder loses its hash and will be dropped on normalization
        assert!(records[1].info_hash.is_none());
    }

    #[test]
    fn test_decode_nyaa_mixed_size_shapes() {
        let body = json!([
            {
                "name": "Show - 01",
                "info_hash": "aa",
                "magnet": "",
                "seeders": 10,
                "leechers": 2,
                "size": 1048576,
                "date": "2024-01-02 03:04:05",
                "category": "Anime"
            },
            {
                "name": "Show - 02",
                "magnet": "magnet:?xt=urn:btih:bb",
                "seeders": "7",
                "size": "1.5 GiB",
                "date": "2024-01-03T00:00:00Z"
            }
        ]);
        let records = RemoteProvider::Nyaa
            .decode(body.to_string().as_bytes())
            .unwrap();

        assert_eq!(records[0].size, Some(1_048_576));
        assert!(records[0].size_label.is_none());
        assert!(records[0].uploaded.is_some());

        assert_eq!(records[1].seeders, Some(7));
        assert_eq!(records[1].leechers, None);
        assert_eq!(records[1].size, Some(1_610_612_736));
        assert_eq!(records[1].size_label.as_deref(), Some("1.5 GiB"));
    }

    #[test]
    fn test_decode_sukebei_envelope() {
        let body = json!({
            "count": 1,
            "data": [{
                "title": "Item",
                "magnet": "magnet:?xt=urn:btih:cc&dn=Item",
                "seeders": 3,
                "leechers": 1,
                "size": "704.9 MiB",
                "time": "2024-05-06 07:08",
                "category": ""
            }]
        });
        let records = RemoteProvider::Sukebei
            .decode(body.to_string().as_bytes())
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].size.is_some());
        assert!(records[0].uploaded.is_some());
        assert!(records[0].category.is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let result = RemoteProvider::Apibay.decode(br#"{"error": "nope"}"#);
        assert!(matches!(result, Err(AdapterError::Decode(_))));
    }

    #[tokio::test]
    async fn test_search_normalizes_fixture_response() {
        let router = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("q").map(String::as_str), Some("ubuntu"));
                Json(json!([
                    {
                        "name": "Ubuntu",
                        "info_hash": "abcdef",
                        "seeders": "5",
                        "leechers": "1",
                        "size": "2048",
                        "added": "1713398400",
                        "category": "0"
                    },
                    { "name": "", "info_hash": "ffff" },
                    { "name": "No hash" }
                ]))
            }),
        );
        let endpoint = serve(router).await;
        let apibay = adapter(RemoteProvider::Apibay, &endpoint);

        let results = apibay
            .search("ubuntu", 1, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.title, "Ubuntu");
        assert_eq!(hit.info_hash.as_deref(), Some("ABCDEF"));
        assert!(hit.magnet.starts_with("magnet:?xt=urn:btih:ABCDEF&dn=Ubuntu"));
        assert_eq!(hit.trackers, trackers());
        assert_eq!(hit.seeders, Some(5));
        assert_eq!(hit.size_label, "2.0 KB");
        assert_eq!(hit.category, UNKNOWN_CATEGORY);
        assert_eq!(hit.source, "apibay");
    }

    #[tokio::test]
    async fn test_search_forwards_page() {
        let router = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let page = params.get("page").cloned().unwrap_or_default();
                Json(json!([{
                    "name": format!("page {}", page),
                    "info_hash": "ab"
                }]))
            }),
        );
        let endpoint = serve(router).await;
        let nyaa = adapter(RemoteProvider::Nyaa, &endpoint);

        let results = nyaa
            .search("anything", 4, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(results[0].title, "page 4");
    }

    #[tokio::test]
    async fn test_apibay_later_pages_are_empty() {
        // No server: a network call here would fail
        let apibay = adapter(RemoteProvider::Apibay, "http://127.0.0.1:9/q.php");
        let results = apibay
            .search("ubuntu", 2, &CancellationToken::new())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let router = Router::new().route(
            "/search",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        );
        let endpoint = serve(router).await;
        let nyaa = adapter(RemoteProvider::Nyaa, &endpoint);

        let err = nyaa
            .search("x", 1, &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AdapterError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let router = Router::new().route(
            "/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );
        let endpoint = serve(router).await;
        let nyaa = RemoteAdapter::new(
            RemoteProvider::Nyaa,
            &endpoint,
            vec![],
            Duration::from_millis(200),
            "ua",
        )
        .unwrap();

        let err = nyaa
            .search("x", 1, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Timeout));
    }

    #[tokio::test]
    async fn test_search_cancelled() {
        let router = Router::new().route(
            "/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        );
        let endpoint = serve(router).await;
        let nyaa = adapter(RemoteProvider::Nyaa, &endpoint);

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = nyaa.search("x", 1, &cancel).await.unwrap_err();
        assert!(matches!(err, AdapterError::Cancelled));
    }
}

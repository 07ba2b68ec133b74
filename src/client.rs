use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

use crate::config::CONFIG;
use crate::data_models::SearchResult;

/// Failures of a single search request. None of them is fatal: the
/// controller records them and keeps the previous results.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("search request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("search response is not a list of results: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a query with a ranked list of documents.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// Talks to a remote endpoint with `GET <endpoint>?query=<q>`.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    endpoint: Url,
    client: Client,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| SearchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn from_config() -> Result<Self, SearchError> {
        Self::new(
            &CONFIG.search_endpoint,
            Duration::from_secs(CONFIG.request_timeout_secs),
        )
    }

    /// Endpoint with the query appended as a percent-encoded parameter.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = self.request_url(query);
        log::debug!("requesting {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        // Decode from the full body so a truncated or malformed payload
        // fails as a whole. Endpoints answer `null` when nothing matched.
        let body = response.bytes().await?;
        let results: Vec<SearchResult> =
            serde_json::from_slice::<Option<Vec<SearchResult>>>(&body)?.unwrap_or_default();
        log::info!("search for {query:?} returned {} results", results.len());
        Ok(results)
    }
}

#[test]
fn test_request_url_escapes_query() {
    let client = HttpSearchClient::new("http://localhost:8080/search", Duration::from_secs(1))
        .expect("valid endpoint");
    let url = client.request_url("a&b c?");
    assert_eq!(url.as_str(), "http://localhost:8080/search?query=a%26b+c%3F");
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let err = HttpSearchClient::new("not a url", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, SearchError::InvalidEndpoint { .. }));
}

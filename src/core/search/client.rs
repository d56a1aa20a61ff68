//! Search Client
//!
//! One request per committed search against the remote search endpoint.
//! [`SearchClient::fetch`] is the failure boundary: transport errors,
//! rejected searches and malformed responses all come back as a
//! [`FetchOutcome`] instead of an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::{Result, SearchError};
use super::models::{CategoryCounts, CategoryResults, SearchRequest, SearchResponse, SearchTriple};

/// Default path of the search endpoint, relative to the site root.
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/search";

// ============================================================================
// Backend
// ============================================================================

/// Raw access to a search endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// JSON-over-HTTP backend: `POST {base_url}{endpoint_path}`.
#[derive(Clone)]
pub struct HttpSearchBackend {
    endpoint: String,
    client: Client,
}

impl HttpSearchBackend {
    /// Build a backend. `timeout` of `None` waits for the endpoint indefinitely.
    pub fn new(base_url: &str, endpoint_path: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let endpoint = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            endpoint_path.trim_start_matches('/')
        );
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<SearchResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(SearchError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(SearchError::Serialization(e)),
        }
    }
}

// ============================================================================
// Normalized Outcome
// ============================================================================

/// Normalized result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Populated {
        results: CategoryResults,
        counts: CategoryCounts,
    },
    /// Nothing to search for; not an error.
    Empty,
    /// The search failed. Rendered exactly like `Empty`; the reason is kept
    /// for diagnostics.
    Failed(String),
}

impl FetchOutcome {
    /// Result sets and counts to display. `Empty` and `Failed` both yield the
    /// empty/zero state.
    pub fn into_parts(self) -> (CategoryResults, CategoryCounts) {
        match self {
            Self::Populated { results, counts } => (results, counts),
            Self::Empty | Self::Failed(_) => (CategoryResults::default(), CategoryCounts::default()),
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Fold a raw response into an outcome.
pub fn normalize(response: Result<SearchResponse>) -> FetchOutcome {
    let response = match response {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(e.to_string()),
    };

    if !response.success {
        let reason = response
            .error
            .unwrap_or_else(|| "unspecified error".to_string());
        return FetchOutcome::Failed(SearchError::Rejected(reason).to_string());
    }

    match (response.data, response.count) {
        (Some(results), Some(counts)) => FetchOutcome::Populated { results, counts },
        (None, _) => FetchOutcome::Failed(
            SearchError::MalformedResponse("success without data".to_string()).to_string(),
        ),
        (_, None) => FetchOutcome::Failed(
            SearchError::MalformedResponse("success without count".to_string()).to_string(),
        ),
    }
}

// ============================================================================
// Search Client
// ============================================================================

/// Issues searches through a backend and normalizes the results.
///
/// No caching and no retries: the same triple is fetched again every time
/// it is requested.
#[derive(Clone)]
pub struct SearchClient {
    backend: Arc<dyn SearchBackend>,
}

impl SearchClient {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn http(base_url: &str, endpoint_path: &str, timeout: Option<Duration>) -> Result<Self> {
        let backend = HttpSearchBackend::new(base_url, endpoint_path, timeout)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Search for `triple`. Never fails; see [`FetchOutcome`].
    pub async fn fetch(&self, triple: &SearchTriple) -> FetchOutcome {
        if !triple.has_query() {
            return FetchOutcome::Empty;
        }

        let outcome = normalize(self.backend.search(&triple.to_request()).await);
        if let Some(reason) = outcome.failure() {
            tracing::warn!(
                query = %triple.query,
                tag = %triple.tag,
                page = triple.page,
                "search failed: {reason}"
            );
        }
        outcome
    }
}

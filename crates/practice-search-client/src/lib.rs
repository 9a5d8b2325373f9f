pub mod bing;
pub mod searchcans;
pub mod serper;
pub mod types;

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use bing::BingClient;
use searchcans::SearchCansClient;
use serper::SerperClient;
pub use types::{RawSearchHit, SearchProvider, SearchSettings};

const USER_AGENT: &str = "PracticeLink/0.1 (Problem Link Resolver)";

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status code: {0}")]
    Status(StatusCode),
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("search is disabled")]
    Disabled,
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Payload(error.to_string())
        } else {
            Self::Http(error.to_string())
        }
    }
}

/// One interchangeable search provider.
#[async_trait]
pub trait SearchBackend: Send + Sync + fmt::Debug {
    fn provider(&self) -> SearchProvider;

    /// Best-effort ranked results for `query`.
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>, ClientError>;
}

pub(crate) fn build_http(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .gzip(true)
        .build()
        .map_err(ClientError::from)
}

/// Search front door used by the resolver.
///
/// Failures never escape: a timeout, a non-2xx answer or an unreadable body all
/// come back as an empty hit list, logged at `warn`.
#[derive(Debug, Clone)]
pub struct SearchClient {
    backend: Option<Arc<dyn SearchBackend>>,
    max_results: usize,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::disabled()
    }
}

impl SearchClient {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            backend: None,
            max_results: types::MAX_RESULTS_CAP,
        }
    }

    pub fn with_backend(backend: Arc<dyn SearchBackend>, max_results: usize) -> Self {
        Self {
            backend: Some(backend),
            max_results: max_results.clamp(1, types::MAX_RESULTS_CAP),
        }
    }

    /// Builds the configured backend, or a disabled client when no credential is set.
    pub fn from_settings(settings: &SearchSettings) -> Self {
        let Some(api_key) = settings.credential().filter(|_| settings.enabled) else {
            debug!(
                target: "practice_search",
                enabled = settings.enabled,
                "search disabled: switched off or no api key configured"
            );
            return Self::disabled();
        };

        let endpoint = settings.endpoint();
        let timeout = settings.timeout();
        let built: Result<Arc<dyn SearchBackend>, ClientError> = match settings.provider {
            SearchProvider::SearchCans => SearchCansClient::new(endpoint, api_key, timeout)
                .map(|client| Arc::new(client) as Arc<dyn SearchBackend>),
            SearchProvider::Bing => BingClient::new(endpoint, api_key, timeout, settings.result_limit())
                .map(|client| Arc::new(client) as Arc<dyn SearchBackend>),
            SearchProvider::Serper => {
                SerperClient::new(endpoint, api_key, timeout, settings.result_limit())
                    .map(|client| Arc::new(client) as Arc<dyn SearchBackend>)
            }
        };

        match built {
            Ok(backend) => Self::with_backend(backend, settings.result_limit()),
            Err(error) => {
                warn!(
                    target: "practice_search",
                    provider = %settings.provider,
                    error = %error,
                    "failed to build search backend; search disabled"
                );
                Self::disabled()
            }
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    #[must_use]
    pub fn provider(&self) -> Option<SearchProvider> {
        self.backend.as_ref().map(|backend| backend.provider())
    }

    /// Runs one query; any failure yields zero hits.
    #[instrument(name = "search_client.search", skip(self))]
    pub async fn search(&self, query: &str) -> Vec<RawSearchHit> {
        let Some(backend) = &self.backend else {
            return Vec::new();
        };

        match backend.search(query).await {
            Ok(mut hits) => {
                hits.truncate(self.max_results);
                debug!(
                    target: "practice_search",
                    provider = %backend.provider(),
                    hits = hits.len(),
                    "search completed"
                );
                hits
            }
            Err(error) => {
                warn!(
                    target: "practice_search",
                    provider = %backend.provider(),
                    query,
                    error = %error,
                    "search failed; treating as zero results"
                );
                Vec::new()
            }
        }
    }
}

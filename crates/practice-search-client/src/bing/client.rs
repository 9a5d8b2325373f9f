use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::types::BingResponse;
use crate::types::{RawSearchHit, SearchProvider};
use crate::{build_http, ClientError, SearchBackend};

const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Bing Web Search v7 backend.
#[derive(Debug)]
pub struct BingClient {
    http: Client,
    endpoint: String,
    api_key: String,
    count: usize,
}

impl BingClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        count: usize,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(timeout)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            count,
        })
    }

    fn request_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&count={}",
            self.endpoint,
            urlencoding::encode(query),
            self.count
        )
    }
}

#[async_trait]
impl SearchBackend for BingClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Bing
    }

    #[instrument(name = "bing_client.search", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>, ClientError> {
        let url = self.request_url(query);
        debug!(url = %url, "Searching via Bing");

        let response = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_HEADER, &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let payload: BingResponse = response.json().await?;
        Ok(payload
            .web_pages
            .map(|pages| pages.value)
            .unwrap_or_default()
            .into_iter()
            .filter_map(super::types::BingWebPage::into_hit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_encodes_query() {
        let client = BingClient::new(
            "https://api.bing.microsoft.com/v7.0/search",
            "key",
            Duration::from_secs(5),
            20,
        )
        .unwrap();
        let url = client.request_url("力扣 两数之和");
        assert!(url.starts_with("https://api.bing.microsoft.com/v7.0/search?q="));
        assert!(url.ends_with("&count=20"));
        assert!(!url.contains(' '));
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::types::{SerperOrganic, SerperRequest, SerperResponse};
use crate::types::{RawSearchHit, SearchProvider};
use crate::{build_http, ClientError, SearchBackend};

const API_KEY_HEADER: &str = "X-API-KEY";

/// Serper (Google results) backend.
#[derive(Debug)]
pub struct SerperClient {
    http: Client,
    endpoint: String,
    api_key: String,
    num: usize,
}

impl SerperClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        num: usize,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(timeout)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            num,
        })
    }
}

#[async_trait]
impl SearchBackend for SerperClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::Serper
    }

    #[instrument(name = "serper_client.search", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>, ClientError> {
        debug!(endpoint = %self.endpoint, "Searching via Serper");

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&SerperRequest {
                q: query,
                num: self.num,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let payload: SerperResponse = response.json().await?;
        Ok(payload
            .organic
            .into_iter()
            .filter_map(SerperOrganic::into_hit)
            .collect())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::types::{SearchCansRequest, SearchCansResponse};
use crate::types::{RawSearchHit, SearchProvider};
use crate::{build_http, ClientError, SearchBackend};

const UPSTREAM_ENGINE: &str = "bing";

/// SearchCans aggregator backend.
#[derive(Debug)]
pub struct SearchCansClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl SearchCansClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: build_http(timeout)?,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    fn parse(response: SearchCansResponse) -> Result<Vec<RawSearchHit>, ClientError> {
        if let Some(code) = response.code.filter(|code| *code != 0) {
            return Err(ClientError::Payload(format!(
                "searchcans returned code {code}: {}",
                response.msg.unwrap_or_default()
            )));
        }

        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(super::types::SearchCansItem::into_hit)
            .collect())
    }
}

#[async_trait]
impl SearchBackend for SearchCansClient {
    fn provider(&self) -> SearchProvider {
        SearchProvider::SearchCans
    }

    #[instrument(name = "searchcans_client.search", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>, ClientError> {
        debug!(endpoint = %self.endpoint, "Searching via SearchCans");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&SearchCansRequest {
                s: query,
                t: UPSTREAM_ENGINE,
                p: 1,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let payload: SearchCansResponse = response.json().await?;
        Self::parse(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_code_is_a_payload_error() {
        let payload: SearchCansResponse =
            serde_json::from_value(serde_json::json!({"code": 401, "msg": "bad key"})).unwrap();
        let error = SearchCansClient::parse(payload).unwrap_err();
        assert!(error.to_string().contains("401"));
    }

    #[test]
    fn items_without_url_are_skipped() {
        let payload: SearchCansResponse = serde_json::from_value(serde_json::json!({
            "code": 0,
            "data": [
                {"title": "no link"},
                {"title": "反转链表", "url": "https://leetcode.cn/problems/reverse-linked-list/"}
            ]
        }))
        .unwrap();
        let hits = SearchCansClient::parse(payload).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "反转链表");
    }

    #[test]
    fn missing_data_means_no_hits() {
        let payload: SearchCansResponse =
            serde_json::from_value(serde_json::json!({"code": 0})).unwrap();
        assert!(SearchCansClient::parse(payload).unwrap().is_empty());
    }
}

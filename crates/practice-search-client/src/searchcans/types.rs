use serde::{Deserialize, Serialize};

use crate::types::RawSearchHit;

#[derive(Debug, Clone, Serialize)]
pub struct SearchCansRequest<'a> {
    /// Query string
    pub s: &'a str,
    /// Upstream engine the aggregator should consult
    pub t: &'a str,
    /// Result page, 1-based
    pub p: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCansResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<SearchCansItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCansItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchCansItem {
    pub fn into_hit(self) -> Option<RawSearchHit> {
        let url = self.url?;
        RawSearchHit::from_provider(self.title, &url)
    }
}

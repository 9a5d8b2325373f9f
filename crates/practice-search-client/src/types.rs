use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on hits kept from a single provider response.
pub const MAX_RESULTS_CAP: usize = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// One untrusted result as returned by an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchHit {
    pub title: String,
    pub url: String,
}

impl RawSearchHit {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Providers occasionally return a URL followed by junk; keep only the first token.
    pub(crate) fn from_provider(title: Option<String>, url: &str) -> Option<Self> {
        let url = url.split_whitespace().next()?.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            title: title.unwrap_or_default(),
            url: url.to_string(),
        })
    }
}

/// Search provider identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Specialized search aggregator (proxies Bing/Google behind one key)
    #[default]
    SearchCans,
    /// Broad web search (Azure Bing Web Search v7)
    Bing,
    /// General search-engine API (Serper, Google results)
    Serper,
}

impl SearchProvider {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchCans => "searchcans",
            Self::Bing => "bing",
            Self::Serper => "serper",
        }
    }

    #[must_use]
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::SearchCans => "https://www.searchcans.com/api/search",
            Self::Bing => "https://api.bing.microsoft.com/v7.0/search",
            Self::Serper => "https://google.serper.dev/search",
        }
    }

    /// Unknown names fall back to the aggregator, matching the configured default.
    #[must_use]
    pub fn from_str_loose(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bing" => Self::Bing,
            "serper" | "google" => Self::Serper,
            _ => Self::SearchCans,
        }
    }
}

impl std::fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Settings for the external search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub enabled: bool,
    pub provider: SearchProvider,
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint (self-hosted proxies, tests).
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: SearchProvider::default(),
            api_key: None,
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_results: MAX_RESULTS_CAP,
        }
    }
}

impl SearchSettings {
    /// Search runs only when switched on and a credential is present.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.credential().is_some()
    }

    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint())
            .to_string()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.max_results.clamp(1, MAX_RESULTS_CAP)
    }
}

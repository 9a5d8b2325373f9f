//! Problem resolution: local catalog, then the slug mapping, then the
//! verified search ladder, then an unverified listing link.

use std::sync::Arc;

use practice_search_client::SearchClient;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{
    find_by_title_substring, list_by_difficulty, random_problem, Catalog, Difficulty, Problem,
};
use crate::link::{canonicalize, search_listing_url, PRIMARY_PROVIDER_HOST};
use crate::mapping::SlugMapping;
use crate::verifier::verify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionQuery {
    Random,
    ByTitle(String),
}

impl ResolutionQuery {
    pub fn by_title(keyword: impl Into<String>) -> Self {
        Self::ByTitle(keyword.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Local,
    Mapped,
    ExternalVerified,
    /// Unverified search listing on the primary provider; never a problem page.
    SearchListing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    pub title: String,
    pub url: Option<String>,
    pub source: Option<ResolutionSource>,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<Problem>,
}

impl ResolutionResult {
    fn local(problem: Problem, base_url: &str) -> Self {
        Self {
            title: problem.title.clone(),
            url: Some(problem.resource_url(base_url)),
            source: Some(ResolutionSource::Local),
            found: true,
            problem: Some(problem),
        }
    }

    fn mapped(keyword: &str, url: String) -> Self {
        Self {
            title: keyword.to_string(),
            url: Some(url),
            source: Some(ResolutionSource::Mapped),
            found: true,
            problem: None,
        }
    }

    fn verified(keyword: &str, url: &str) -> Self {
        Self {
            title: keyword.to_string(),
            url: Some(canonicalize(url)),
            source: Some(ResolutionSource::ExternalVerified),
            found: true,
            problem: None,
        }
    }

    fn listing(keyword: &str) -> Self {
        Self {
            title: keyword.to_string(),
            url: Some(search_listing_url(keyword)),
            source: Some(ResolutionSource::SearchListing),
            found: false,
            problem: None,
        }
    }

    fn not_found(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            source: None,
            found: false,
            problem: None,
        }
    }

    /// True for the unverified listing fallback.
    #[must_use]
    pub fn is_listing(&self) -> bool {
        self.source == Some(ResolutionSource::SearchListing)
    }
}

/// Query strings for the search ladder, most specific first.
#[must_use]
pub fn ladder_queries(keyword: &str) -> [String; 4] {
    [
        format!("site:{PRIMARY_PROVIDER_HOST}/problems/ {keyword}"),
        format!("力扣 {keyword}"),
        format!("leetcode {keyword}"),
        format!("{PRIMARY_PROVIDER_HOST} {keyword}"),
    ]
}

#[derive(Debug)]
enum Stage {
    Start,
    PickRandom,
    TryLocal,
    TryMapping,
    TrySearchLadder,
    Resolved(ResolutionResult),
    Exhausted(ResolutionResult),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::PickRandom => "pick_random",
            Self::TryLocal => "try_local",
            Self::TryMapping => "try_mapping",
            Self::TrySearchLadder => "try_search_ladder",
            Self::Resolved(_) => "resolved",
            Self::Exhausted(_) => "exhausted",
        }
    }
}

#[derive(Clone)]
pub struct ProblemResolver {
    catalog: Arc<dyn Catalog>,
    mapping: SlugMapping,
    search: SearchClient,
    base_url: String,
}

impl std::fmt::Debug for ProblemResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemResolver")
            .field("mapping", &self.mapping)
            .field("search", &self.search)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProblemResolver {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        mapping: SlugMapping,
        search: SearchClient,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            mapping,
            search,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn search_enabled(&self) -> bool {
        self.search.is_enabled()
    }

    pub fn catalog(&self) -> Arc<dyn Catalog> {
        self.catalog.clone()
    }

    /// Catalog read failures degrade to an empty catalog.
    async fn snapshot(&self) -> Vec<Problem> {
        match self.catalog.list_all().await {
            Ok(problems) => problems,
            Err(error) => {
                warn!(
                    target: "practice_resolver",
                    error = %error,
                    "catalog unavailable; continuing with an empty catalog"
                );
                Vec::new()
            }
        }
    }

    #[instrument(name = "resolver.resolve", skip(self))]
    pub async fn resolve(&self, query: &ResolutionQuery) -> ResolutionResult {
        let keyword = match query {
            ResolutionQuery::Random => String::new(),
            ResolutionQuery::ByTitle(raw) => raw.trim().to_string(),
        };
        let mut stage = Stage::Start;

        loop {
            let next = match stage {
                Stage::Start => match query {
                    ResolutionQuery::Random => Stage::PickRandom,
                    ResolutionQuery::ByTitle(_) if keyword.is_empty() => {
                        Stage::Exhausted(ResolutionResult::not_found(""))
                    }
                    ResolutionQuery::ByTitle(_) => Stage::TryLocal,
                },
                Stage::PickRandom => {
                    let problems = self.snapshot().await;
                    match random_problem(&problems) {
                        Some(problem) => {
                            Stage::Resolved(ResolutionResult::local(problem.clone(), &self.base_url))
                        }
                        None => Stage::Exhausted(ResolutionResult::not_found("")),
                    }
                }
                Stage::TryLocal => {
                    let problems = self.snapshot().await;
                    match find_by_title_substring(&problems, &keyword) {
                        Some(problem) => {
                            Stage::Resolved(ResolutionResult::local(problem.clone(), &self.base_url))
                        }
                        None => Stage::TryMapping,
                    }
                }
                Stage::TryMapping => match self.mapping.resolve(&keyword) {
                    Some(mapped) => {
                        debug!(
                            target: "practice_resolver",
                            key = mapped.key,
                            slug = mapped.slug,
                            "mapping hit"
                        );
                        Stage::Resolved(ResolutionResult::mapped(&keyword, mapped.url))
                    }
                    None => Stage::TrySearchLadder,
                },
                Stage::TrySearchLadder => match self.run_ladder(&keyword).await {
                    Some(url) => Stage::Resolved(ResolutionResult::verified(&keyword, &url)),
                    None => Stage::Exhausted(ResolutionResult::listing(&keyword)),
                },
                Stage::Resolved(result) | Stage::Exhausted(result) => {
                    info!(
                        target: "practice_resolver",
                        found = result.found,
                        source = ?result.source,
                        "resolution finished"
                    );
                    return result;
                }
            };
            debug!(target: "practice_resolver", stage = next.name(), "stage transition");
            stage = next;
        }
    }

    /// Sequential rungs; the first verified page wins.
    async fn run_ladder(&self, keyword: &str) -> Option<String> {
        if !self.search.is_enabled() {
            debug!(target: "practice_resolver", "search disabled; skipping ladder");
            return None;
        }
        for (rung, query) in ladder_queries(keyword).iter().enumerate() {
            let hits = self.search.search(query).await;
            if let Some(url) = verify(&hits, keyword) {
                debug!(target: "practice_resolver", rung, url = %url, "verified search hit");
                return Some(url);
            }
            debug!(target: "practice_resolver", rung, hits = hits.len(), "no verified hit");
        }
        None
    }

    /// Random pick restricted to one difficulty, widening to the whole catalog when
    /// no problem carries it.
    #[instrument(name = "resolver.random_by_difficulty", skip(self))]
    pub async fn random_by_difficulty(&self, difficulty: Difficulty) -> ResolutionResult {
        let problems = self.snapshot().await;
        let filtered = list_by_difficulty(&problems, difficulty);
        let picked = if filtered.is_empty() {
            random_problem(&problems)
        } else {
            random_problem_ref(&filtered)
        };
        match picked {
            Some(problem) => ResolutionResult::local(problem.clone(), &self.base_url),
            None => ResolutionResult::not_found(""),
        }
    }

    #[instrument(name = "resolver.resolve_id", skip(self))]
    pub async fn resolve_id(&self, id: u64) -> ResolutionResult {
        match self.catalog.find_by_id(id).await {
            Ok(Some(problem)) => ResolutionResult::local(problem, &self.base_url),
            Ok(None) => ResolutionResult::not_found(id.to_string()),
            Err(error) => {
                warn!(target: "practice_resolver", id, error = %error, "catalog lookup failed");
                ResolutionResult::not_found(id.to_string())
            }
        }
    }
}

fn random_problem_ref<'a>(problems: &[&'a Problem]) -> Option<&'a Problem> {
    use rand::seq::SliceRandom;
    problems.choose(&mut rand::thread_rng()).copied()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;
    use practice_search_client::{ClientError, RawSearchHit, SearchBackend, SearchProvider};

    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::link::{classify, is_resource_page, LinkKind};
    use crate::mapping::MatchPolicy;

    const BASE: &str = "http://localhost:8080";

    #[derive(Debug, Default)]
    struct ScriptedBackend {
        /// Hits returned for the rung at the same index; missing rungs return nothing.
        rungs: Vec<Vec<RawSearchHit>>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        fn provider(&self) -> SearchProvider {
            SearchProvider::SearchCans
        }

        async fn search(&self, query: &str) -> Result<Vec<RawSearchHit>, ClientError> {
            let mut queries = self.queries.lock().unwrap();
            let rung = queries.len();
            queries.push(query.to_string());
            Ok(self.rungs.get(rung).cloned().unwrap_or_default())
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl Catalog for BrokenCatalog {
        async fn list_all(&self) -> anyhow::Result<Vec<Problem>> {
            Err(anyhow!("database offline"))
        }

        async fn find_by_id(&self, _id: u64) -> anyhow::Result<Option<Problem>> {
            Err(anyhow!("database offline"))
        }
    }

    fn catalog() -> Arc<dyn Catalog> {
        Arc::new(InMemoryCatalog::new(vec![
            Problem::new(1, "两数之和", Some(Difficulty::Easy)),
            Problem::new(146, "LRU 缓存", Some(Difficulty::Medium)),
            Problem::new(206, "反转链表", Some(Difficulty::Easy)),
        ]))
    }

    fn resolver_with(search: SearchClient) -> ProblemResolver {
        ProblemResolver::new(catalog(), SlugMapping::default(), search, BASE)
    }

    #[tokio::test]
    async fn title_without_space_finds_local_entry() {
        let resolver = resolver_with(SearchClient::disabled());
        let result = resolver.resolve(&ResolutionQuery::by_title("LRU缓存")).await;
        assert!(result.found);
        assert_eq!(result.source, Some(ResolutionSource::Local));
        assert_eq!(result.url.as_deref(), Some("http://localhost:8080/ide?questionId=146"));
        assert_eq!(result.title, "LRU 缓存");
    }

    #[tokio::test]
    async fn mapping_resolves_when_catalog_misses() {
        let resolver = resolver_with(SearchClient::disabled());
        let result = resolver.resolve(&ResolutionQuery::by_title("分糖果")).await;
        assert!(result.found);
        assert_eq!(result.source, Some(ResolutionSource::Mapped));
        assert_eq!(result.url.as_deref(), Some("https://leetcode.cn/problems/candy/"));
    }

    #[tokio::test]
    async fn ladder_verifies_title_before_accepting() {
        let backend = Arc::new(ScriptedBackend {
            rungs: vec![vec![
                RawSearchHit::new("3Sum", "https://leetcode.cn/problems/3sum/"),
                RawSearchHit::new(
                    "不同路径 II",
                    "https://leetcode.cn/problems/unique-paths-ii/?envType=daily",
                ),
            ]],
            ..ScriptedBackend::default()
        });
        let resolver = resolver_with(SearchClient::with_backend(backend.clone(), 20));

        let result = resolver.resolve(&ResolutionQuery::by_title("不同路径")).await;
        assert!(result.found);
        assert_eq!(result.source, Some(ResolutionSource::ExternalVerified));
        assert_eq!(
            result.url.as_deref(),
            Some("https://leetcode.cn/problems/unique-paths-ii/")
        );
        assert_eq!(backend.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ladder_runs_rungs_in_order_until_a_hit() {
        let backend = Arc::new(ScriptedBackend {
            rungs: vec![
                vec![],
                vec![RawSearchHit::new("编辑距离 - 题库", "https://leetcode.cn/problemset/all/")],
                vec![RawSearchHit::new("72. 编辑距离", "https://leetcode.cn/problems/edit-distance/")],
            ],
            ..ScriptedBackend::default()
        });
        let resolver = resolver_with(SearchClient::with_backend(backend.clone(), 20));

        let result = resolver.resolve(&ResolutionQuery::by_title("编辑距离")).await;
        assert_eq!(result.source, Some(ResolutionSource::ExternalVerified));

        let queries = backend.queries.lock().unwrap().clone();
        assert_eq!(
            queries,
            vec![
                "site:leetcode.cn/problems/ 编辑距离".to_string(),
                "力扣 编辑距离".to_string(),
                "leetcode 编辑距离".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn exhausted_ladder_returns_tagged_listing() {
        let backend = Arc::new(ScriptedBackend::default());
        let resolver = resolver_with(SearchClient::with_backend(backend.clone(), 20));

        let result = resolver.resolve(&ResolutionQuery::by_title("编辑距离")).await;
        assert!(!result.found);
        assert!(result.is_listing());
        assert_eq!(backend.queries.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn disabled_search_falls_back_to_listing_without_calls() {
        let resolver = resolver_with(SearchClient::disabled());
        let result = resolver.resolve(&ResolutionQuery::by_title("编辑距离")).await;

        assert!(!result.found);
        assert_eq!(result.source, Some(ResolutionSource::SearchListing));
        assert_ne!(result.source, Some(ResolutionSource::ExternalVerified));
        let url = result.url.unwrap();
        assert_eq!(classify(&url), LinkKind::Listing);
        assert!(!is_resource_page(&url));
    }

    #[tokio::test]
    async fn random_picks_catalog_member() {
        let resolver = resolver_with(SearchClient::disabled());
        for _ in 0..20 {
            let result = resolver.resolve(&ResolutionQuery::Random).await;
            assert!(result.found);
            let id = result.problem.as_ref().map(|p| p.id).unwrap();
            assert!([1, 146, 206].contains(&id));
            assert!(is_resource_page(result.url.as_deref().unwrap()));
        }
    }

    #[tokio::test]
    async fn random_by_difficulty_respects_filter() {
        let resolver = resolver_with(SearchClient::disabled());
        for _ in 0..10 {
            let result = resolver.random_by_difficulty(Difficulty::Medium).await;
            assert_eq!(result.problem.map(|p| p.id), Some(146));
        }
        let widened = resolver.random_by_difficulty(Difficulty::Hard).await;
        assert!(widened.found);
    }

    #[tokio::test]
    async fn empty_keyword_and_empty_catalog_are_not_found() {
        let resolver = ProblemResolver::new(
            Arc::new(InMemoryCatalog::default()),
            SlugMapping::new(MatchPolicy::LongestKey),
            SearchClient::disabled(),
            BASE,
        );
        let blank = resolver.resolve(&ResolutionQuery::by_title("  ")).await;
        assert!(!blank.found);
        assert!(blank.url.is_none());

        let random = resolver.resolve(&ResolutionQuery::Random).await;
        assert!(!random.found);
        assert!(random.source.is_none());
    }

    #[tokio::test]
    async fn catalog_errors_degrade_to_mapping() {
        let resolver = ProblemResolver::new(
            Arc::new(BrokenCatalog),
            SlugMapping::default(),
            SearchClient::disabled(),
            BASE,
        );
        let result = resolver.resolve(&ResolutionQuery::by_title("两数之和")).await;
        assert_eq!(result.source, Some(ResolutionSource::Mapped));
        assert!(!resolver.resolve_id(1).await.found);
    }

    #[tokio::test]
    async fn resolve_id_builds_local_url() {
        let resolver = resolver_with(SearchClient::disabled());
        let result = resolver.resolve_id(206).await;
        assert_eq!(result.url.as_deref(), Some("http://localhost:8080/ide?questionId=206"));
        assert!(!resolver.resolve_id(999).await.found);
    }
}

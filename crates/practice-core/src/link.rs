//! Resource-page link validation.
//!
//! A link qualifies only when it addresses exactly one problem page: a
//! per-problem path on a supported judge site, or the local online IDE
//! locator `<base>/ide?questionId=<id>`. Listing, tag and search pages never
//! qualify. Everything here is pure string inspection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Path/query shape of a local resource locator.
pub const LOCAL_RESOURCE_MARKER: &str = "/ide?questionId=";

/// Primary external provider; ladder queries and the listing fallback target it.
pub const PRIMARY_PROVIDER_HOST: &str = "leetcode.cn";

const PRIMARY_PROBLEM_PREFIX: &str = "https://leetcode.cn/problems/";
const PRIMARY_LISTING_PREFIX: &str = "https://leetcode.cn/problemset/all/?search=";

const LISTING_PATH_MARKERS: &[&str] = &["/problemset", "/tag/", "/tags/", "/search"];

struct PageRule {
    host: &'static str,
    path_markers: &'static [&'static str],
    requires_slug: bool,
}

const PAGE_RULES: &[PageRule] = &[
    PageRule {
        host: "leetcode.cn",
        path_markers: &["/problems/"],
        requires_slug: true,
    },
    PageRule {
        host: "leetcode.com",
        path_markers: &["/problems/"],
        requires_slug: true,
    },
    PageRule {
        host: "nowcoder.com",
        path_markers: &["/practice/", "/problem", "/question"],
        requires_slug: false,
    },
];

static LOCAL_RESOURCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^https?://[^\s"'<>?#]+/ide\?questionId=\d+$"#).expect("local resource regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Local online IDE page for one catalog problem
    Local,
    /// A single problem page on an external judge site
    ExternalPage,
    /// Category, tag or search listing
    Listing,
    /// Anything else, including malformed text
    Unrecognized,
}

impl LinkKind {
    #[must_use]
    pub fn is_page(self) -> bool {
        matches!(self, Self::Local | Self::ExternalPage)
    }
}

struct UrlParts<'a> {
    host: String,
    path: &'a str,
    query: Option<&'a str>,
}

fn split_url(url: &str) -> Option<UrlParts<'_>> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let authority_end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let host = authority
        .rsplit('@')
        .next()
        .and_then(|host_port| host_port.split(':').next())
        .filter(|host| !host.is_empty())?
        .to_ascii_lowercase();

    let tail = &rest[authority_end..];
    let tail = tail.split('#').next().unwrap_or_default();
    let (path, query) = match tail.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (tail, None),
    };

    Some(UrlParts { host, path, query })
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn has_forbidden_chars(url: &str) -> bool {
    url.chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
}

fn is_listing(parts: &UrlParts<'_>) -> bool {
    let path = parts.path.to_ascii_lowercase();
    if LISTING_PATH_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
    {
        return true;
    }
    parts.query.is_some_and(|query| {
        query
            .split('&')
            .any(|pair| pair.to_ascii_lowercase().starts_with("search="))
    })
}

fn matches_page_rule(parts: &UrlParts<'_>) -> bool {
    PAGE_RULES.iter().any(|rule| {
        if !host_matches(&parts.host, rule.host) {
            return false;
        }
        rule.path_markers.iter().any(|marker| {
            let Some(index) = parts.path.find(marker) else {
                return false;
            };
            if !rule.requires_slug {
                return true;
            }
            let slug = parts.path[index + marker.len()..]
                .split('/')
                .next()
                .unwrap_or_default();
            !slug.is_empty()
        })
    })
}

/// Whether `url` is the local IDE locator for one catalog problem.
#[must_use]
pub fn is_local_resource(url: &str) -> bool {
    LOCAL_RESOURCE_RE.is_match(url)
}

#[must_use]
pub fn classify(url: &str) -> LinkKind {
    let url = url.trim();
    if url.is_empty() || has_forbidden_chars(url) {
        return LinkKind::Unrecognized;
    }
    if is_local_resource(url) {
        return LinkKind::Local;
    }
    let Some(parts) = split_url(url) else {
        return LinkKind::Unrecognized;
    };
    if is_listing(&parts) {
        return LinkKind::Listing;
    }
    if matches_page_rule(&parts) {
        return LinkKind::ExternalPage;
    }
    LinkKind::Unrecognized
}

/// The link validator: true only for a single, individually addressable problem page.
#[must_use]
pub fn is_resource_page(url: &str) -> bool {
    classify(url).is_page()
}

/// Everything before the first `?`.
#[must_use]
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// External page links lose their tracking parameters; local links keep their id.
#[must_use]
pub fn canonicalize(url: &str) -> String {
    let url = url.trim();
    match classify(url) {
        LinkKind::ExternalPage => strip_query(url).split('#').next().unwrap_or(url).to_string(),
        _ => url.to_string(),
    }
}

#[must_use]
pub fn local_resource_url(base_url: &str, id: u64) -> String {
    format!(
        "{}{LOCAL_RESOURCE_MARKER}{id}",
        base_url.trim().trim_end_matches('/')
    )
}

#[must_use]
pub fn primary_problem_url(slug: &str) -> String {
    format!("{PRIMARY_PROBLEM_PREFIX}{slug}/")
}

/// Search listing on the primary provider. Never a resource page.
#[must_use]
pub fn search_listing_url(keyword: &str) -> String {
    format!(
        "{PRIMARY_LISTING_PREFIX}{}",
        urlencoding::encode(keyword.trim())
    )
}

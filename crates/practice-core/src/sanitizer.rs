//! Response integrity pipeline.
//!
//! Untrusted generated text goes through five fixed steps:
//!
//! 1. normalize quote variants to `"`;
//! 2. extract one candidate link, before anything is destroyed;
//! 3. extract its title;
//! 4. strip every URL, link construct, tag fragment and boilerplate phrase;
//! 5. rebuild a single canonical markdown link after a `---` separator.
//!
//! The output carries at most one URL, and sanitizing a rendered output again
//! yields the same output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::link::{canonicalize, classify, LinkKind, LOCAL_RESOURCE_MARKER};
use crate::resolver::{ResolutionResult, ResolutionSource};

/// Titles longer than this are treated as failed extractions.
pub const MAX_TITLE_CHARS: usize = 50;

pub const LOCAL_LABEL: &str = "**在线练习链接**";
pub const EXTERNAL_LABEL: &str = "**原题链接**";
pub const LISTING_LABEL: &str = "**力扣搜索**";

const LOCAL_FALLBACK_TITLE: &str = "在线练习";
const GENERIC_TITLE: &str = "点击进入练习";
const SEPARATOR: &str = "\n\n---\n\n";

const QUOTE_VARIANTS: &[&str] = &[
    "\u{201C}", "\u{201D}", "\u{201E}", "\u{201F}", "\u{2033}", "\u{2036}", "\u{FF02}", "&quot;",
    "&#34;",
];

/// Phrases a generator uses to introduce a link. Longer phrases first.
const BOILERPLATE_PHRASES: &[&str] = &[
    "您可以在本站在线IDE做题链接（仅此一条，请原样输出该 URL 勿改）",
    "你可以在这里找到该题目的描述和在线 IDE 做题链接",
    "你可以在这里找到这道题目的在线IDE链接",
    "你可以在这里找到本站在线 IDE 做题链接",
    "你可以在这里找到该题的在线 IDE 链接",
    "（仅此一条，请原样输出该 URL 勿改）",
    "（仅此一条，请原样输出以下 URL）",
    "本站在线IDE做题链接",
    "你可以在这里找到原题",
    "（链接已修复）",
    "你可以在这里做题",
    "您可以在这里做题",
    "**在线练习链接**",
    "**原题链接**",
    "**力扣搜索**",
    "**立即练习**",
    "在线练习链接",
    "原题链接",
    "立即练习",
    "链接为",
    "see this link",
    "See this link",
    "click here",
    "Click here",
    "👉",
];

static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a\s*>").expect("anchor regex"));

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!?\[[^\]\n]*\]\([^)\n]*\)").expect("markdown link regex"));

static MARKDOWN_LINK_CAPTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[([^\]\n]+)\]\((https?://[^)\s"'<>]+)\)"#).expect("markdown capture regex")
});

static MARKDOWN_RESIDUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\[[^\]\n]*\]\(\s*["']?"#).expect("markdown residue regex"));

static RAW_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[!-~&&[^"'<>()\[\]]]*"#).expect("raw url regex")
});

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:target|rel|href|class|style)\s*=\s*(?:"[^"]*"?|'[^']*'?|[^\s>]*)"#)
        .expect("attribute regex")
});

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>|</?[A-Za-z][^<>\n]*$").expect("tag regex"));

static UNCLOSED_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)<[A-Za-z/][^<>\n]*$").expect("unclosed tag regex"));

static SEPARATOR_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-*_]{3,}[ \t]*$").expect("separator regex"));

static EMPTY_BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*[ \t]*\*\*").expect("empty bold regex"));

static EMPTY_PARENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([ \t]*\)|（[ \t]*）|\[[ \t]*\]").expect("empty parens regex"));

static HORIZONTAL_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{3000}\u{00A0}]+").expect("space regex"));

static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank lines regex"));

static PUNCTUATION_ONLY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[：:，,。.；;!！?？ \t]+$").expect("punctuation line regex"));

static SPACE_BEFORE_PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([，。；！？：、）】])").expect("space before punctuation regex"));

const COLLAPSIBLE_PUNCTUATION: &[char] = &['。', '！', '？', '!', '?', '，', ',', '；', ';', '：', ':'];

/// Sanitizer output. `url`, when present, appears exactly once in [`rendered`](Self::rendered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedResponse {
    pub body: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub link_kind: Option<LinkKind>,
}

impl SanitizedResponse {
    fn plain(body: String) -> Self {
        Self {
            body,
            title: None,
            url: None,
            link_kind: None,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        self.link_kind.map(|kind| match kind {
            LinkKind::Local => LOCAL_LABEL,
            LinkKind::Listing => LISTING_LABEL,
            LinkKind::ExternalPage | LinkKind::Unrecognized => EXTERNAL_LABEL,
        })
    }

    /// The canonical suffix, or an empty string when there is no link.
    #[must_use]
    pub fn link_suffix(&self) -> String {
        match (&self.url, &self.title, self.label()) {
            (Some(url), Some(title), Some(label)) => {
                format!("{SEPARATOR}{label} [{title}]({url})")
            }
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn rendered(&self) -> String {
        format!("{}{}", self.body, self.link_suffix())
    }
}

/// Runs the full pipeline on untrusted text.
#[must_use]
pub fn sanitize(raw: &str) -> SanitizedResponse {
    let text = normalize_quotes(raw);
    let candidate = extract_candidate(&text);
    let body = strip_noise(&text);

    let Some(candidate) = candidate else {
        return SanitizedResponse::plain(body);
    };
    attach_page_link(body, &candidate.url, candidate.title)
}

/// Like [`sanitize`], but the link comes from a trusted resolution instead of the
/// text. The listing fallback is attached with its own label.
#[must_use]
pub fn sanitize_with_resolution(raw: &str, resolution: &ResolutionResult) -> SanitizedResponse {
    let Some(url) = resolution.url.as_deref() else {
        return sanitize(raw);
    };
    let body = strip_noise(&normalize_quotes(raw));

    if resolution.source == Some(ResolutionSource::SearchListing) {
        if classify(url) != LinkKind::Listing || scheme_count(url) != 1 {
            return SanitizedResponse::plain(body);
        }
        return SanitizedResponse {
            body,
            title: Some(clean_title(&resolution.title).unwrap_or_else(|| GENERIC_TITLE.to_string())),
            url: Some(url.to_string()),
            link_kind: Some(LinkKind::Listing),
        };
    }

    let title = clean_title(&resolution.title);
    attach_page_link(body, url, title)
}

fn attach_page_link(body: String, url: &str, title: Option<String>) -> SanitizedResponse {
    let kind = classify(url);
    if !kind.is_page() {
        return SanitizedResponse::plain(body);
    }
    let url = canonicalize(url);
    if scheme_count(&url) != 1 {
        return SanitizedResponse::plain(body);
    }
    let title = title.unwrap_or_else(|| match kind {
        LinkKind::Local => LOCAL_FALLBACK_TITLE.to_string(),
        _ => GENERIC_TITLE.to_string(),
    });
    SanitizedResponse {
        body,
        title: Some(title),
        url: Some(url),
        link_kind: Some(kind),
    }
}

fn scheme_count(url: &str) -> usize {
    url.matches("://").count()
}

/// Step 1.
#[must_use]
pub fn normalize_quotes(raw: &str) -> String {
    QUOTE_VARIANTS
        .iter()
        .fold(raw.to_string(), |text, variant| text.replace(variant, "\""))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    url: String,
    title: Option<String>,
}

/// Steps 2 and 3. Runs on the quote-normalized text before any stripping.
fn extract_candidate(text: &str) -> Option<Candidate> {
    extract_from_marker(text).or_else(|| extract_markdown(text))
}

fn extract_from_marker(text: &str) -> Option<Candidate> {
    for (marker_at, _) in text.match_indices(LOCAL_RESOURCE_MARKER) {
        let before = &text[..marker_at];
        let start = match (before.rfind("http://"), before.rfind("https://")) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => continue,
        };
        let end = text[start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
            .map_or(text.len(), |offset| start + offset);

        let Some(url_len) = local_prefix_len(&text[start..end]) else {
            continue;
        };
        let url_end = start + url_len;
        let url = text[start..url_end].to_string();

        let title = title_after(text, url_end)
            .or_else(|| title_in_brackets(text, start))
            .or_else(|| title_before(text, start));
        return Some(Candidate { url, title });
    }
    None
}

/// Length of the longest prefix of `candidate` that is a well-formed local locator.
fn local_prefix_len(candidate: &str) -> Option<usize> {
    let marker_at = candidate.find(LOCAL_RESOURCE_MARKER)?;
    let digits_start = marker_at + LOCAL_RESOURCE_MARKER.len();
    let digits = candidate[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(candidate.len() - digits_start);
    if digits == 0 {
        return None;
    }
    let len = digits_start + digits;
    crate::link::is_local_resource(&candidate[..len]).then_some(len)
}

/// Anchor-like fragment: `...url" target=..>Title</a>` on the same line.
fn title_after(text: &str, url_end: usize) -> Option<String> {
    let rest = &text[url_end..];
    let line = rest.split(['\n', '\r']).next().unwrap_or_default();
    let gt = line.find('>')?;
    let tail = &line[..gt];
    let has_attribute = ATTRIBUTE_RE.is_match(tail);
    if !(tail.starts_with(['"', '\'']) || has_attribute) {
        return None;
    }
    let residue = ATTRIBUTE_RE.replace_all(tail, "");
    if !residue.chars().all(|c| c.is_whitespace() || matches!(c, '"' | '\'')) {
        return None;
    }
    let after = &line[gt + 1..];
    let title = after.split('<').next().unwrap_or_default();
    clean_title(title)
}

/// Markdown form: `[Title](url`.
fn title_in_brackets(text: &str, url_start: usize) -> Option<String> {
    let before = text[..url_start].strip_suffix("](")?;
    let open = before.rfind('[')?;
    let inner = &before[open + 1..];
    if inner.contains('\n') {
        return None;
    }
    clean_title(inner)
}

/// Visible text preceding the URL on its line.
fn title_before(text: &str, url_start: usize) -> Option<String> {
    let before = &text[..url_start];
    let line_start = before.rfind(['\n', '\r']).map_or(0, |at| at + 1);
    let line = &before[line_start..];
    let line = UNCLOSED_TAG_RE.replace_all(line, "");
    let line = ATTRIBUTE_RE.replace_all(&line, "");
    let line = TAG_RE.replace_all(&line, "");
    clean_title(&line)
}

fn extract_markdown(text: &str) -> Option<Candidate> {
    let captures = MARKDOWN_LINK_CAPTURE_RE.captures(text)?;
    let title = captures.get(1).and_then(|m| clean_title(m.as_str()));
    let url = captures.get(2)?.as_str().to_string();
    Some(Candidate { url, title })
}

/// Normalizes a candidate title; `None` means unusable.
fn clean_title(raw: &str) -> Option<String> {
    let mut title: String = raw
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '[' | ']' | '*' | '`' | '\n' | '\r'))
        .collect();
    title = remove_phrases(&title);
    let title = HORIZONTAL_SPACE_RE.replace_all(&title, " ");
    let title = trim_title_edges(title.trim());

    if title.is_empty()
        || title.chars().count() > MAX_TITLE_CHARS
        || title.to_ascii_lowercase().contains("http")
        || title.contains(LOCAL_RESOURCE_MARKER)
    {
        return None;
    }
    Some(title.to_string())
}

/// Trims edge punctuation; a bracket is only trimmed when it has no partner.
fn trim_title_edges(mut title: &str) -> &str {
    loop {
        let before = title;
        title = title
            .trim_start_matches(['-', '：', ':', ' ', ')', '）'])
            .trim_end_matches(['。', '.', '：', ':', '，', ',', ' ', '(', '（']);
        for (open, close) in [('(', ')'), ('（', '）')] {
            let opens = title.matches(open).count();
            let closes = title.matches(close).count();
            if closes > opens {
                title = title.strip_suffix(close).unwrap_or(title);
            } else if opens > closes {
                title = title.strip_prefix(open).unwrap_or(title);
            }
        }
        if title == before {
            return title.trim();
        }
    }
}

fn remove_phrases(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = BOILERPLATE_PHRASES
            .iter()
            .fold(current.clone(), |acc, phrase| acc.replace(phrase, ""));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Step 4, iterated until stable so that re-sanitizing is a no-op.
///
/// A pass only deletes characters or blanks them to spaces, so the loop ends.
/// Deletions may glue URL pieces back together; those are caught on a later pass.
#[must_use]
pub fn strip_noise(text: &str) -> String {
    let mut current = strip_once(text);
    loop {
        let next = strip_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    if RAW_URL_RE.is_match(&current) {
        current = strip_noise(&RAW_URL_RE.replace_all(&current, " "));
    }
    current
}

fn strip_once(text: &str) -> String {
    let text = ANCHOR_RE.replace_all(text, " ");
    let text = MARKDOWN_LINK_RE.replace_all(&text, " ");
    let text = MARKDOWN_RESIDUE_RE.replace_all(&text, " ");
    let text = RAW_URL_RE.replace_all(&text, " ");
    let text = ATTRIBUTE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = text.replace(['<', '>', '"'], " ");
    let text = SEPARATOR_LINE_RE.replace_all(&text, "");
    let text = remove_phrases(&text);
    let text = EMPTY_BOLD_RE.replace_all(&text, "");
    let text = EMPTY_PARENS_RE.replace_all(&text, "");
    let text = collapse_punctuation(&text);
    let text = HORIZONTAL_SPACE_RE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCTUATION_RE.replace_all(&text, "$1");
    let text = PUNCTUATION_ONLY_LINE_RE.replace_all(&text, "");

    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let text = lines.join("\n");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim()
        .trim_end_matches(['：', ':'])
        .trim_end()
        .to_string()
}

/// Runs of the same punctuation mark shrink to one.
fn collapse_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if previous == Some(c) && COLLAPSIBLE_PUNCTUATION.contains(&c) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080";

    fn url_count(text: &str) -> usize {
        text.matches("http://").count() + text.matches("https://").count()
    }

    #[test]
    fn anchor_fragment_is_rebuilt_as_single_link() {
        let raw = format!(
            "已找到这道题：{BASE}/ide?questionId=7\" target=\"_blank\" rel=\"noopener\">反转链表</a> 祝你练习愉快。"
        );
        let out = sanitize(&raw);

        assert_eq!(out.title.as_deref(), Some("反转链表"));
        assert_eq!(out.url.as_deref(), Some("http://localhost:8080/ide?questionId=7"));
        assert_eq!(out.link_kind, Some(LinkKind::Local));

        let rendered = out.rendered();
        assert!(rendered.ends_with("**在线练习链接** [反转链表](http://localhost:8080/ide?questionId=7)"));
        assert!(!rendered.contains("target="));
        assert!(!rendered.contains("rel="));
        assert!(!out.body.contains('<'));
        assert!(!out.body.contains('>'));
        assert_eq!(url_count(&rendered), 1);
    }

    #[test]
    fn duplicated_urls_collapse_to_one() {
        let raw = format!(
            "链接为：{BASE}/ide?questionId=146 {BASE}/ide?questionId=146\n[LRU 缓存]({BASE}/ide?questionId=146)"
        );
        let out = sanitize(&raw);
        assert_eq!(out.url.as_deref(), Some("http://localhost:8080/ide?questionId=146"));
        assert_eq!(url_count(&out.rendered()), 1);
    }

    #[test]
    fn markdown_title_is_used_for_marker_link() {
        let raw = format!("来看这道题 [LRU 缓存]({BASE}/ide?questionId=146)。");
        let out = sanitize(&raw);
        assert_eq!(out.title.as_deref(), Some("LRU 缓存"));
        assert_eq!(out.body, "来看这道题。");
    }

    #[test]
    fn curly_quotes_are_normalized_before_extraction() {
        let raw = format!("{BASE}/ide?questionId=9\u{201D} target=\u{201C}_blank\u{201D}>两数之和</a>");
        let out = sanitize(&raw);
        assert_eq!(out.url.as_deref(), Some("http://localhost:8080/ide?questionId=9"));
        assert_eq!(out.title.as_deref(), Some("两数之和"));
        assert!(!out.rendered().contains('\u{201C}'));
    }

    #[test]
    fn external_markdown_link_drops_query_and_uses_external_label() {
        let raw = "这是原题：[分发糖果](https://leetcode.cn/problems/candy/?envType=daily-question) 点击这里 click here";
        let out = sanitize(raw);
        assert_eq!(out.url.as_deref(), Some("https://leetcode.cn/problems/candy/"));
        assert_eq!(out.link_kind, Some(LinkKind::ExternalPage));
        assert!(out.rendered().contains("**原题链接** [分发糖果](https://leetcode.cn/problems/candy/)"));
        assert!(!out.body.contains("click here"));
    }

    #[test]
    fn listing_links_are_never_attached() {
        let raw = "试试这个：[搜索](https://leetcode.cn/problemset/all/?search=dp)";
        let out = sanitize(raw);
        assert!(out.url.is_none());
        assert_eq!(url_count(&out.rendered()), 0);
    }

    #[test]
    fn overlong_title_falls_back_to_generic_label() {
        let long = "很".repeat(60);
        let raw = format!("{BASE}/ide?questionId=3\">{long}</a>");
        let out = sanitize(&raw);
        assert_eq!(out.title.as_deref(), Some("在线练习"));
    }

    #[test]
    fn text_without_links_is_only_cleaned() {
        let raw = "你好！！！<b>这是</b>一段   说明。。\n\n\n\n第二段";
        let out = sanitize(raw);
        assert_eq!(out.body, "你好！ 这是 一段 说明。\n\n第二段");
        assert!(out.url.is_none());
        assert_eq!(out.rendered(), out.body);
    }

    #[test]
    fn malformed_locator_degrades_to_plain_text() {
        let out = sanitize("打开 http://localhost:8080/ide?questionId=abc 即可");
        assert!(out.url.is_none());
        assert_eq!(url_count(&out.rendered()), 0);
    }

    #[test]
    fn resanitizing_rendered_output_is_stable() {
        let inputs = [
            format!("已找到：{BASE}/ide?questionId=7\" target=\"_blank\">反转链表</a>。。"),
            "原题 [接雨水](https://leetcode.cn/problems/trapping-rain-water/?from=x)：".to_string(),
            format!("---\n**在线练习链接** [LRU 缓存]({BASE}/ide?questionId=146)\n\n多余文字"),
            "没有链接的普通回答。".to_string(),
        ];
        for input in inputs {
            let first = sanitize(&input);
            let second = sanitize(&first.rendered());
            assert_eq!(second, first, "input: {input}");
        }
    }

    #[test]
    fn urls_glued_back_together_by_deletions_are_stripped() {
        let raw = format!(
            "ht{}{}tp://evil.example.com/x 见 [两数之和](https://leetcode.cn/problems/two-sum/)",
            "(".repeat(7),
            ")".repeat(7)
        );
        let out = sanitize(&raw);
        assert!(!out.body.contains("://"), "{}", out.body);
        assert!(!out.body.contains("evil"), "{}", out.body);
        assert_eq!(out.url.as_deref(), Some("https://leetcode.cn/problems/two-sum/"));

        let rendered = out.rendered();
        assert_eq!(url_count(&rendered), 1);
        assert_eq!(sanitize(&rendered), out);
    }

    #[test]
    fn prose_right_after_a_url_survives() {
        let out = sanitize("看这里 http://localhost:8080/ide?questionId=7这道题很好");
        assert_eq!(out.url.as_deref(), Some("http://localhost:8080/ide?questionId=7"));
        assert!(out.body.contains("这道题很好"), "{}", out.body);
        assert_eq!(url_count(&out.rendered()), 1);
    }

    #[test]
    fn balanced_brackets_stay_in_titles() {
        let out = sanitize("[最小栈 (设计)](https://leetcode.cn/problems/min-stack/)");
        assert_eq!(out.title.as_deref(), Some("最小栈 (设计)"));
        assert_eq!(clean_title("反转链表)").as_deref(), Some("反转链表"));
        assert_eq!(clean_title("（接雨水").as_deref(), Some("接雨水"));
        assert_eq!(clean_title("(两数之和)。").as_deref(), Some("(两数之和)"));
    }

    #[test]
    fn arrows_in_prose_are_not_anchor_tags() {
        let raw = format!("{BASE}/ide?questionId=5 之后 a -> b 的顺序");
        let out = sanitize(&raw);
        assert_eq!(out.url.as_deref(), Some("http://localhost:8080/ide?questionId=5"));
        assert_eq!(out.title.as_deref(), Some("在线练习"));
    }

    #[test]
    fn resolution_link_replaces_generated_links() {
        let resolution = ResolutionResult {
            title: "分糖果".to_string(),
            url: Some("https://leetcode.cn/problems/candy/".to_string()),
            source: Some(ResolutionSource::Mapped),
            found: true,
            problem: None,
        };
        let out = sanitize_with_resolution(
            "本地暂无，已匹配到力扣原题。https://leetcode.com/problems/wrong/",
            &resolution,
        );
        assert_eq!(out.url.as_deref(), Some("https://leetcode.cn/problems/candy/"));
        assert_eq!(out.body, "本地暂无，已匹配到力扣原题。");
        assert_eq!(url_count(&out.rendered()), 1);
    }

    #[test]
    fn listing_resolution_gets_its_own_label() {
        let resolution = ResolutionResult {
            title: "编辑距离".to_string(),
            url: Some(crate::link::search_listing_url("编辑距离")),
            source: Some(ResolutionSource::SearchListing),
            found: false,
            problem: None,
        };
        let out = sanitize_with_resolution("该题不在本站题库中。", &resolution);
        assert_eq!(out.link_kind, Some(LinkKind::Listing));
        assert!(out.rendered().contains("**力扣搜索** [编辑距离](https://leetcode.cn/problemset/all/?search="));
        assert_eq!(url_count(&out.rendered()), 1);
    }
}

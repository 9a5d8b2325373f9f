use practice_core::link::{classify, is_resource_page, local_resource_url};
use practice_core::{sanitize, LinkKind};

fn url_count(text: &str) -> usize {
    text.matches("http://").count() + text.matches("https://").count()
}

fn generator_outputs() -> Vec<String> {
    let local = local_resource_url("http://localhost:8080", 206);
    vec![
        format!("为你找到题目：{local}\" target=\"_blank\" rel=\"noopener noreferrer\">反转链表</a>，加油！"),
        format!("{local} {local} {local}"),
        format!("[反转链表]({local}) 以及 [反转链表]({local})"),
        "推荐 [盛最多水的容器](https://leetcode.cn/problems/container-with-most-water/?envType=study-plan-v2) 和 https://leetcode.cn/problems/container-with-most-water/".to_string(),
        "今天不写链接，先复习一下二分查找的边界条件。".to_string(),
        "<p>看看这个</p> [题库](https://leetcode.cn/problemset/all/)".to_string(),
    ]
}

#[test]
fn rendered_output_never_carries_more_than_one_url() {
    for raw in generator_outputs() {
        let rendered = sanitize(&raw).rendered();
        assert!(url_count(&rendered) <= 1, "{raw} => {rendered}");
        assert!(!rendered.contains("target="), "{rendered}");
        assert!(!rendered.contains("rel="), "{rendered}");
    }
}

#[test]
fn attached_links_always_validate() {
    for raw in generator_outputs() {
        let out = sanitize(&raw);
        if let Some(url) = out.url.as_deref() {
            assert!(is_resource_page(url), "{url}");
            assert!(out.title.is_some());
            assert_eq!(out.rendered().matches(url).count(), 1);
        }
    }
}

#[test]
fn local_links_keep_their_locator() {
    let out = sanitize(&generator_outputs()[0]);
    assert_eq!(out.link_kind, Some(LinkKind::Local));
    assert_eq!(
        out.url.as_deref(),
        Some("http://localhost:8080/ide?questionId=206")
    );
    assert_eq!(out.title.as_deref(), Some("反转链表"));
}

#[test]
fn external_links_lose_tracking_parameters() {
    let out = sanitize(&generator_outputs()[3]);
    assert_eq!(
        out.url.as_deref(),
        Some("https://leetcode.cn/problems/container-with-most-water/")
    );
    assert_eq!(classify(out.url.as_deref().unwrap_or_default()), LinkKind::ExternalPage);
}

#[test]
fn listing_only_text_yields_no_link() {
    let out = sanitize(&generator_outputs()[5]);
    assert!(out.url.is_none());
    assert!(!out.body.contains('<'));
}

#[test]
fn validator_is_stable() {
    for url in [
        "https://leetcode.cn/problems/two-sum/",
        "https://leetcode.com/problems/two-sum/description/",
        "https://www.nowcoder.com/practice/abc123",
        "http://localhost:8080/ide?questionId=1",
        "https://leetcode.cn/problemset/all/?search=dp",
        "https://leetcode.cn/tag/array/",
        "not a url",
    ] {
        assert_eq!(is_resource_page(url), is_resource_page(url), "{url}");
        assert_eq!(classify(url), classify(url), "{url}");
    }
    assert!(!is_resource_page("https://leetcode.cn/tag/array/"));
    assert!(is_resource_page("https://www.nowcoder.com/practice/abc123"));
}

#[test]
fn rendered_output_is_a_fixpoint() {
    for raw in generator_outputs() {
        let first = sanitize(&raw);
        let second = sanitize(&first.rendered());
        assert_eq!(second.rendered(), first.rendered(), "{raw}");
    }
}

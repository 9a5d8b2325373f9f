use practice_search_client::RawSearchHit;
use tracing::trace;

use crate::link::is_resource_page;

/// Picks the first hit that is a resource page and, when a keyword is given,
/// whose title contains it verbatim.
///
/// Ranking from the provider is not trusted on its own: a top hit for a
/// different problem is rejected by the title containment check.
#[must_use]
pub fn verify(hits: &[RawSearchHit], keyword: &str) -> Option<String> {
    let keyword = keyword.trim();
    hits.iter()
        .filter(|hit| {
            let page = is_resource_page(&hit.url);
            if !page {
                trace!(target: "practice_resolver", url = %hit.url, "hit is not a resource page");
            }
            page
        })
        .find(|hit| keyword.is_empty() || hit.title.contains(keyword))
        .map(|hit| hit.url.clone())
}

//! Back-reference bookkeeping for broken links
//!
//! Broken pages are terminal, so the policy never queues them again. These
//! helpers make sure every later page that links to one still lands in its
//! referrer set.

use crate::state::{PageStore, StoreResult};
use crate::url::{canonicalize, CrawlPolicy};

/// Adds `page_url` as a referrer of every already-broken link in `hrefs`
///
/// Only links the policy considers in scope are canonicalized. A relative
/// link such as `b` resolves against the page, not the origin, so it can
/// never be matched to a canonical URL here.
///
/// Returns the number of referrer sets that grew.
pub fn record_known_broken(
    store: &mut PageStore,
    policy: &CrawlPolicy,
    page_url: &str,
    hrefs: &[String],
) -> StoreResult<usize> {
    let mut grown = 0;
    for href in hrefs.iter().filter(|h| policy.is_in_scope(h)) {
        let target = canonicalize(policy.origin(), href);
        if store.status(&target).is_broken() && store.add_referrer(&target, page_url)? {
            tracing::debug!("{} also links to broken {}", page_url, target);
            grown += 1;
        }
    }
    Ok(grown)
}

/// Adds `found_on` to `target`'s referrers if `target` is broken
///
/// Used when a queued visit reaches a page that was marked broken after it
/// was queued. Returns true if the referrer set grew.
pub fn record_referrer(
    store: &mut PageStore,
    target: &str,
    found_on: Option<&str>,
) -> StoreResult<bool> {
    match found_on {
        Some(referrer) if store.status(target).is_broken() => {
            store.add_referrer(target, referrer)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::Origin;

    const ROOT: &str = "https://site.com/";
    const GONE: &str = "https://site.com/b";

    fn policy() -> CrawlPolicy {
        CrawlPolicy::new(
            Origin::parse("https://site.com").unwrap(),
            vec!["_print".to_string()],
        )
    }

    fn hrefs(links: &[&str]) -> Vec<String> {
        links.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_adds_crawling_page_as_referrer() {
        let mut store = PageStore::new();
        store.mark_broken(GONE, Some(ROOT)).unwrap();

        let grown = record_known_broken(
            &mut store,
            &policy(),
            "https://site.com/x",
            &hrefs(&["/b", "/y"]),
        )
        .unwrap();

        assert_eq!(grown, 1);
        let referrers = store.status(GONE).referrers().unwrap();
        assert!(referrers.contains(ROOT));
        assert!(referrers.contains("https://site.com/x"));
        assert!(store.status("https://site.com/y").is_unvisited());
    }

    #[test]
    fn test_repeated_links_do_not_duplicate() {
        let mut store = PageStore::new();
        store.mark_broken(GONE, Some(ROOT)).unwrap();

        let links = hrefs(&["/b", "/b#top", "https://site.com/b?x=1"]);
        let grown = record_known_broken(&mut store, &policy(), "https://site.com/x", &links).unwrap();
        assert_eq!(grown, 1);

        let grown = record_known_broken(&mut store, &policy(), "https://site.com/x", &links).unwrap();
        assert_eq!(grown, 0);
        assert_eq!(store.status(GONE).referrers().unwrap().len(), 2);
    }

    #[test]
    fn test_ignores_visited_and_unknown_links() {
        let mut store = PageStore::new();
        store.mark_visited("https://site.com/ok").unwrap();

        let grown = record_known_broken(
            &mut store,
            &policy(),
            ROOT,
            &hrefs(&["/ok", "/new", "", "https://other.com/b"]),
        )
        .unwrap();

        assert_eq!(grown, 0);
        assert!(store.status("https://site.com/ok").is_visited());
        assert!(!store.contains("https://site.com/new"));
    }

    #[test]
    fn test_out_of_scope_links_never_match() {
        let mut store = PageStore::new();
        store.mark_broken(GONE, Some(ROOT)).unwrap();

        let grown = record_known_broken(
            &mut store,
            &policy(),
            "https://site.com/docs/x/",
            &hrefs(&["b", "./b", "mailto:b@site.com", "//site.com/b", "//other.com/b"]),
        )
        .unwrap();

        assert_eq!(grown, 0);
        let referrers = store.status(GONE).referrers().unwrap();
        assert_eq!(referrers.iter().collect::<Vec<_>>(), vec![ROOT]);
    }

    #[test]
    fn test_record_referrer() {
        let mut store = PageStore::new();
        store.mark_broken(GONE, Some(ROOT)).unwrap();

        assert!(record_referrer(&mut store, GONE, Some("https://site.com/a")).unwrap());
        assert!(!record_referrer(&mut store, GONE, Some("https://site.com/a")).unwrap());
        assert!(!record_referrer(&mut store, GONE, None).unwrap());
        assert!(!record_referrer(&mut store, "https://site.com/other", Some(ROOT)).unwrap());
        assert_eq!(store.status(GONE).referrers().unwrap().len(), 2);
    }
}

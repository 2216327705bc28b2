use crate::url::Origin;

/// Canonicalizes a raw link into the key used for that page everywhere
///
/// # Canonicalization Steps
///
/// 1. Drop everything from the first `#` or `?` onward
/// 2. If what remains is already an absolute URL on `origin`, keep it as is
///    (the bare origin becomes the root URL)
/// 3. Otherwise treat it as a path on `origin` and prefix the origin,
///    inserting a `/` if the path does not start with one
///
/// Links on other hosts come out as meaningless keys under `origin`; the
/// crawl policy rejects them before they reach the store. The function is
/// idempotent: canonicalizing a canonical URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use linkrot::url::{canonicalize, Origin};
///
/// let origin = Origin::parse("https://docs.example.com").unwrap();
/// assert_eq!(
///     canonicalize(&origin, "/guide/install?lang=en#linux"),
///     "https://docs.example.com/guide/install"
/// );
/// ```
pub fn canonicalize(origin: &Origin, raw: &str) -> String {
    let clean = strip_query_and_fragment(raw);

    if clean == origin.as_str() {
        return origin.root_url();
    }

    if origin.owns(clean) {
        return clean.to_string();
    }

    if clean.starts_with('/') {
        format!("{}{}", origin, clean)
    } else {
        format!("{}/{}", origin, clean)
    }
}

/// Returns `raw` up to (not including) the first `#` or `?`
pub fn strip_query_and_fragment(raw: &str) -> &str {
    match raw.find(&['#', '?'][..]) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

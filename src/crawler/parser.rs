//! HTML parser for extracting anchor targets
//!
//! Links are returned exactly as written in the document. Resolving them
//! against the site origin is the crawl policy's job.

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a>` element, in document order
///
/// Anchors without an `href` attribute are skipped. Values are returned
/// raw, including relative paths, fragments, and foreign hosts.
///
/// # Example
///
/// ```
/// use linkrot::crawler::extract_hrefs;
///
/// let html = r#"<a href="/docs">Docs</a><a name="top"></a><a href="https://other.com">x</a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/docs", "https://other.com"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_root_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/other"]);
    }

    #[test]
    fn test_values_are_raw() {
        let html = r##"
            <html><body>
                <a href="/page?x=1#frag">With suffix</a>
                <a href="relative">Relative</a>
                <a href="https://other.com/page">Foreign</a>
                <a href="#top">Fragment</a>
            </body></html>
        "##;
        assert_eq!(
            extract_hrefs(html),
            vec!["/page?x=1#frag", "relative", "https://other.com/page", "#top"]
        );
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"
            <html>
            <head><link rel="canonical" href="/canonical"></head>
            <body>
                <nav><a href="/nav">Nav</a></nav>
                <main><a href="/main">Main</a></main>
                <footer><a href="/footer">Footer</a></footer>
            </body>
            </html>
        "#;
        assert_eq!(extract_hrefs(html), vec!["/nav", "/main", "/footer"]);
    }

    #[test]
    fn test_skip_anchor_without_href() {
        let html = r#"<html><body><a name="anchor">No href</a><a href="/x">X</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec!["/x"]);
    }

    #[test]
    fn test_empty_href_kept() {
        let html = r#"<html><body><a href="">Empty</a></body></html>"#;
        assert_eq!(extract_hrefs(html), vec![""]);
    }

    #[test]
    fn test_duplicates_kept() {
        let html = r#"<a href="/x">1</a><a href="/x">2</a>"#;
        assert_eq!(extract_hrefs(html), vec!["/x", "/x"]);
    }

    #[test]
    fn test_no_links() {
        let html = r#"<html><head><title>Empty</title></head><body></body></html>"#;
        assert!(extract_hrefs(html).is_empty());
    }
}

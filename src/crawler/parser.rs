//! HTML link extraction
//!
//! Pulls every `<a href>` out of a page and resolves it against the page's
//! own URL. Fragment-only anchors and non-navigational schemes
//! (`javascript:`, `mailto:`, `tel:`, `data:`) are dropped, as is any href
//! that does not resolve to an HTTP(S) URL.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts absolute outbound links from an HTML document, in page order
///
/// # Example
///
/// ```
/// use site_spider::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/pkg/">Packages</a></body></html>"#;
/// let base_url = Url::parse("http://golang.org/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["http://golang.org/pkg/"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .map(|url| url.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html, &base_url()), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_root_relative_link() {
        let html = r#"<html><body><a href="/other">Link</a></body></html>"#;
        assert_eq!(extract_links(html, &base_url()), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_path_relative_link() {
        let html = r#"<html><body><a href="other">Link</a></body></html>"#;
        assert_eq!(
            extract_links(html, &base_url()),
            vec!["https://example.com/docs/other"]
        );
    }

    #[test]
    fn test_skip_fragment_only() {
        let html = r##"<html><body><a href="#section">Jump</a></body></html>"##;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_fragment_stripped_from_link() {
        let html = r##"<html><body><a href="/guide#install">Guide</a></body></html>"##;
        assert_eq!(extract_links(html, &base_url()), vec!["https://example.com/guide"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>Test</h1>">Data</a>
            </body></html>
        "#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<html><body><a name="top">Top</a></body></html>"#;
        assert!(extract_links(html, &base_url()).is_empty());
    }

    #[test]
    fn test_links_keep_page_order_and_duplicates() {
        let html = r#"
            <html>
            <body>
                <a href="/page2">Link 2</a>
                <a href="/page1">Link 1</a>
                <a href="https://other.com/page3">Link 3</a>
                <a href="/page2">Link 2 again</a>
            </body>
            </html>
        "#;
        assert_eq!(
            extract_links(html, &base_url()),
            vec![
                "https://example.com/page2",
                "https://example.com/page1",
                "https://other.com/page3",
                "https://example.com/page2",
            ]
        );
    }

    #[test]
    fn test_not_html() {
        assert!(extract_links("just some text", &base_url()).is_empty());
    }
}

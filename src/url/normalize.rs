use crate::UrlError;
use url::Url;

/// Normalizes a URL into the key used by every crawl table
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
/// 5. Remove an empty query string (trailing ?)
///
/// Scheme, host case (already lowered by the parser), path and trailing
/// slashes are kept as-is: `http://` and `https://` variants of a page are
/// distinct keys, which scheme restriction relies on.
///
/// # Examples
///
/// ```
/// use site_spider::url::normalize_url;
///
/// let url = normalize_url("http://Example.COM/docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/docs/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Resolves an `href` against the page it was found on
///
/// Returns None for hrefs that never name a crawlable resource:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - anything that fails to parse or normalize
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let joined = base_url.join(href).ok()?;
    normalize_parsed(joined).ok()
}

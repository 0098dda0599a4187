use url::Url;

/// Returns the host of a URL as used for site membership
///
/// The host is lowercase and carries an explicit port when the URL names a
/// non-default one, so `127.0.0.1:8080` and `127.0.0.1:9090` are different
/// hosts. Default ports are dropped by the URL parser, which makes
/// `http://example.com:80/` and `http://example.com/` the same host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_spider::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

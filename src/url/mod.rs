//! URL handling module for Site-Spider
//!
//! This module provides URL normalization, host extraction and the crawl
//! boundary (`Site`) derived from the seed URL.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::host_key;
pub use normalize::{normalize_parsed, normalize_url, resolve_link};

/// The crawl boundary: scheme, host and path prefix of the seed URL
///
/// A URL belongs to the site when its host matches (see `host_key`) and its
/// path starts with the seed's path. Scheme only matters when the crawl is
/// restricted to the seed's scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    url: Url,
    host: String,
}

impl Site {
    /// Builds the site boundary from a seed URL string
    ///
    /// # Returns
    ///
    /// * `Ok(Site)` - The seed parsed and normalized
    /// * `Err(UrlError)` - The seed is malformed, not HTTP(S), or has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use site_spider::url::Site;
    ///
    /// let site = Site::parse("http://golang.org/cmd/").unwrap();
    /// assert_eq!(site.host(), "golang.org");
    /// assert_eq!(site.path_prefix(), "/cmd/");
    /// ```
    pub fn parse(seed: &str) -> Result<Self, UrlError> {
        let url = normalize_url(seed)?;
        let host = host_key(&url).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;
        Ok(Self { url, host })
    }

    /// The normalized seed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host with explicit port, if any
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path_prefix(&self) -> &str {
        self.url.path()
    }

    /// Returns true if the URL's host is this site's host
    pub fn same_host(&self, url: &Url) -> bool {
        host_key(url).as_deref() == Some(self.host.as_str())
    }

    /// Returns true if the URL's path lies under the seed's path
    pub fn contains_path(&self, url: &Url) -> bool {
        url.path().starts_with(self.path_prefix())
    }

    /// Returns true if the URL uses the seed's scheme
    pub fn same_scheme(&self, url: &Url) -> bool {
        url.scheme() == self.scheme()
    }

    /// Location of the site's robots.txt
    pub fn robots_url(&self) -> Result<Url, UrlError> {
        self.url
            .join("/robots.txt")
            .map_err(|e| UrlError::Parse(e.to_string()))
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

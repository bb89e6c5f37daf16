//! URL handling module for Lemma-Search
//!
//! This module decides which links stay inside a site, how a page URL maps
//! to the path stored for it, and which configured site owns a URL.

use crate::{UrlError, UrlResult};
use url::Url;

/// File extensions of links that point at images rather than pages
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".bmp", ".ico"];

/// Parses an absolute HTTP(S) URL
///
/// # Errors
///
/// * `UrlError::Parse` - The string is not a URL
/// * `UrlError::InvalidScheme` - The scheme is neither http nor https
/// * `UrlError::MissingDomain` - The URL has no host
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns true if `url` lies under the site rooted at `site_url`
///
/// `site_url` is expected without a trailing slash. The character following
/// the root must start a path or query so that `https://a.com` does not own
/// `https://a.com.evil.net`.
pub fn is_under_site(url: &str, site_url: &str) -> bool {
    let root = site_url.trim_end_matches('/');
    match url.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

/// Returns true if an anchor's href qualifies as a same-site child link
///
/// A qualifying href is root-relative (a single slash followed by at least
/// one character) and does not point at an image.
pub fn is_child_href(href: &str) -> bool {
    let href = href.trim();

    if !href.starts_with('/') || href.starts_with("//") || href.len() < 2 {
        return false;
    }

    let lower = href.to_lowercase();
    let path_part = lower.split(['?', '#']).next().unwrap_or_default();
    !IMAGE_EXTENSIONS.iter().any(|ext| path_part.ends_with(ext))
}

/// Resolves a qualifying href against the frontier URL, dropping any fragment
pub fn resolve_child(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// Returns the path and query of a URL, as stored for a page
pub fn path_of(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

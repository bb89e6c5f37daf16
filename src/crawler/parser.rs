//! HTML parser for extracting child links and page content
//!
//! This module handles parsing a fetched page to extract:
//! - Same-site child links to follow (root-relative `<a href>` only)
//! - The page title
//! - The stored content (head and body markup)

use crate::url::{is_child_href, resolve_child};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Qualifying child links, resolved against the page URL
    pub links: Vec<Url>,

    /// Head markup followed by body markup
    pub content: String,
}

/// Parses HTML content and extracts child links, title and content
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="/...">` root-relative links
///
/// **Exclude:**
/// - Absolute and protocol-relative links (`https://...`, `//host/...`)
/// - Relative links without a leading slash
/// - `<a href="..." download>`
/// - Links to images (`.png`, `.jpg`, ...)
///
/// Fragments are dropped and each URL is listed once, in document order.
///
/// # Example
///
/// ```no_run
/// use lemma_search::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: title_of(&document),
        links: child_links(&document, base_url),
        content: head_and_body(&document),
    }
}

/// Extracts the page title from raw HTML
pub fn extract_title(html: &str) -> Option<String> {
    title_of(&Html::parse_document(html))
}

fn title_of(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn child_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !is_child_href(href) {
            continue;
        }

        if let Some(url) = resolve_child(base_url, href) {
            if seen.insert(url.to_string()) {
                links.push(url);
            }
        }
    }

    links
}

fn head_and_body(document: &Html) -> String {
    let mut content = String::new();

    for name in ["head", "body"] {
        if let Ok(selector) = Selector::parse(name) {
            if let Some(element) = document.select(&selector).next() {
                content.push_str(&element.html());
            }
        }
    }

    content
}

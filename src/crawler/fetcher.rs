//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and referrer
//! - GET requests to fetch page content, bounded by the request timeout
//! - Parsing the fetched page into links and stored content

use crate::config::{CrawlerConfig, RequestConfig};
use crate::crawler::parser::parse_html;
use crate::{ConfigError, Result, SearchEngineError};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A fetched and parsed page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page title, if the page has one
    pub title: Option<String>,

    /// Head and body markup
    pub content: String,

    /// Qualifying child links
    pub links: Vec<Url>,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use lemma_search::config::{CrawlerConfig, RequestConfig};
/// use lemma_search::crawler::build_http_client;
///
/// let request = RequestConfig {
///     user_agent: "LemmaSearchBot/1.0".to_string(),
///     referrer: Some("https://www.google.com".to_string()),
/// };
///
/// let client = build_http_client(&request, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(request: &RequestConfig, crawler: &CrawlerConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(referrer) = &request.referrer {
        let value = HeaderValue::from_str(referrer).map_err(|e| {
            ConfigError::Validation(format!("Invalid referrer header '{}': {}", referrer, e))
        })?;
        headers.insert(REFERER, value);
    }

    let client = Client::builder()
        .user_agent(request.user_agent.clone())
        .default_headers(headers)
        .timeout(crawler.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a page and extracts its child links
///
/// Any HTTP status is a successful fetch; the caller decides what to do
/// with error pages. Network failures, timeouts and unreadable bodies are
/// returned as `SearchEngineError::Http`.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    let http_error = |source| SearchEngineError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url.clone()).send().await.map_err(http_error)?;
    let status_code = response.status().as_u16();
    let body = response.text().await.map_err(http_error)?;

    let parsed = parse_html(&body, url);

    Ok(FetchedPage {
        url: url.clone(),
        status_code,
        title: parsed.title,
        content: parsed.content,
        links: parsed.links,
    })
}

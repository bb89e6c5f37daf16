//! Crawler module for site crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the configured client identity
//! - HTML parsing and child-link extraction
//! - Per-session state (visited URLs, stop flag)
//! - Crawl coordination across sites

mod coordinator;
mod fetcher;
mod parser;
mod session;

pub use coordinator::{Coordinator, STOPPED_BY_USER};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use parser::{extract_title, parse_html, ParsedPage};
pub use session::CrawlSession;

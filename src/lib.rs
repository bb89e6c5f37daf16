//! Lemma-Search: a per-site lexical search engine
//!
//! This crate crawls a configured set of websites, maintains a per-site
//! inverted index of lemmas, and answers free-text queries ranked by
//! relevance with highlighted snippets.

pub mod config;
pub mod crawler;
pub mod engine;
pub mod index;
pub mod lemma;
pub mod morphology;
pub mod output;
pub mod search;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Lemma-Search operations
#[derive(Debug, Error)]
pub enum SearchEngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Morphology error: {0}")]
    Morphology(#[from] morphology::MorphologyError),

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Site is not indexed yet: {0}")]
    SiteNotIndexed(String),

    #[error("Page is outside the configured sites: {0}")]
    OutsideConfiguredSites(String),

    #[error("Crawl task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchEngineError {
    /// Returns true if the error is a rejected request rather than a failure
    ///
    /// Rejections come from validating caller input (empty query, a site that
    /// is still being indexed, a URL outside the configured sites).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyQuery
                | Self::SiteNotIndexed(_)
                | Self::OutsideConfiguredSites(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Lemma-Search operations
pub type Result<T> = std::result::Result<T, SearchEngineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::SearchEngine;
pub use search::{SearchResponse, SearchResult};
pub use state::SiteStatus;

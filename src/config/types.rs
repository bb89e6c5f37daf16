use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Lemma-Search
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub request: RequestConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
}

impl Config {
    /// Finds the configured site whose root URL prefixes `url`
    pub fn site_for_url(&self, url: &str) -> Option<&SiteEntry> {
        self.sites
            .iter()
            .find(|site| crate::url::is_under_site(url, &site.url))
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay before fetching the children of a frontier page (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Timeout applied to every single fetch (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of fetches in flight across a crawl session
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: u32,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            politeness_delay_ms: default_politeness_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

fn default_politeness_delay_ms() -> u64 {
    150
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> u32 {
    16
}

/// HTTP request identification sent with every fetch
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Referer header value
    #[serde(default)]
    pub referrer: Option<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// A site to crawl and index
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Root URL of the site, without a trailing slash once validated
    pub url: String,

    /// Display name of the site
    pub name: String,
}

/// Site status definitions for tracking indexing progress
///
/// A site is created as `Indexing` when a crawl session starts and ends in
/// either `Indexed` or `Failed`. There is no separate stopped state: a site
/// whose crawl was cancelled ends as `Failed`.
use serde::Serialize;
use std::fmt;

/// Represents the indexing state of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    /// Site is being crawled; its index is not trustworthy yet
    Indexing,

    /// Crawl completed without being cancelled
    Indexed,

    /// Crawl failed at the root or was cancelled
    Failed,
}

impl SiteStatus {
    /// Returns true if the site's index can serve queries
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Converts the status to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Indexing => "INDEXING",
            Self::Indexed => "INDEXED",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a status from a database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "INDEXING" => Some(Self::Indexing),
            "INDEXED" => Some(Self::Indexed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible site statuses
    pub fn all_statuses() -> Vec<Self> {
        vec![Self::Indexing, Self::Indexed, Self::Failed]
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

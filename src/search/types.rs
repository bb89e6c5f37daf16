//! Search request and response types

use serde::Serialize;

/// Default number of results per page
pub const DEFAULT_LIMIT: usize = 20;

/// A search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text query
    pub text: String,

    /// Restricts the search to one site, by its root URL
    pub site: Option<String>,

    /// Number of ranked results to skip
    pub offset: usize,

    /// Maximum number of results to return
    pub limit: usize,
}

impl SearchQuery {
    /// Creates a query over all indexed sites returning the first page
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            site: None,
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Restricts the query to one site
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Selects a page of results
    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}

/// One ranked page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Root URL of the page's site
    pub site: String,
    pub site_name: String,
    /// Path of the page relative to the site root
    pub uri: String,
    pub title: String,
    /// Highlighted excerpt, empty if no word of the page matched
    pub snippet: String,
    /// Relevance relative to the best page of the whole result set
    pub relevance: f64,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SearchResponse {
    /// Number of matching pages before pagination
    pub total: usize,
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// A response with no matches
    pub fn empty() -> Self {
        Self::default()
    }
}

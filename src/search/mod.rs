//! Query engine
//!
//! Ranks the pages of indexed sites against a free-text query. A page
//! matches only if it holds every distinct lemma of the query.

mod engine;
mod types;

pub use engine::search;
pub use types::{SearchQuery, SearchResponse, SearchResult, DEFAULT_LIMIT};

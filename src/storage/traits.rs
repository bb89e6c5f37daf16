//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::state::SiteStatus;
use crate::storage::{IndexEntryRecord, LemmaRecord, PageRecord, SiteRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Site not found: {0}")]
    SiteNotFound(i64),

    #[error("Page not found: {0}")]
    PageNotFound(i64),

    #[error("Lemma not found: {0}")]
    LemmaNotFound(i64),

    #[error("Storage lock poisoned")]
    Poisoned,

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines the CRUD-style operations the indexer and the query
/// engine consume. It makes no promise about uniqueness or cascading
/// deletes; callers enforce the index invariants themselves.
pub trait Storage {
    // ===== Sites =====

    /// Creates a site with the given status and the current time as status time
    fn create_site(&mut self, url: &str, name: &str, status: SiteStatus)
        -> StorageResult<SiteRecord>;

    /// Gets a site by ID
    fn get_site(&self, site_id: i64) -> StorageResult<SiteRecord>;

    /// Finds a site by its root URL
    fn find_site_by_url(&self, url: &str) -> StorageResult<Option<SiteRecord>>;

    /// Lists all sites
    fn list_sites(&self) -> StorageResult<Vec<SiteRecord>>;

    /// Lists all sites in the given status
    fn sites_with_status(&self, status: SiteStatus) -> StorageResult<Vec<SiteRecord>>;

    /// Sets a site's status and last error, refreshing its status time
    fn update_site_status(
        &mut self,
        site_id: i64,
        status: SiteStatus,
        last_error: Option<&str>,
    ) -> StorageResult<()>;

    /// Refreshes a site's status time
    fn touch_site(&mut self, site_id: i64) -> StorageResult<()>;

    // ===== Pages =====

    /// Creates a page
    fn create_page(
        &mut self,
        site_id: i64,
        path: &str,
        code: u16,
        content: &str,
    ) -> StorageResult<PageRecord>;

    /// Gets a page by ID
    fn get_page(&self, page_id: i64) -> StorageResult<PageRecord>;

    /// Finds a page by its site and path
    fn find_page_by_path(&self, site_id: i64, path: &str) -> StorageResult<Option<PageRecord>>;

    /// Lists all pages of a site
    fn find_pages_by_site(&self, site_id: i64) -> StorageResult<Vec<PageRecord>>;

    /// Counts the pages of a site
    fn count_pages_by_site(&self, site_id: i64) -> StorageResult<u64>;

    /// Deletes a page by ID
    fn delete_page(&mut self, page_id: i64) -> StorageResult<()>;

    // ===== Lemmas =====

    /// Creates a lemma for a site
    fn create_lemma(&mut self, site_id: i64, lemma: &str, frequency: i64)
        -> StorageResult<LemmaRecord>;

    /// Gets a lemma by ID
    fn get_lemma(&self, lemma_id: i64) -> StorageResult<LemmaRecord>;

    /// Finds a lemma by its site and normalized form
    fn find_lemma(&self, site_id: i64, lemma: &str) -> StorageResult<Option<LemmaRecord>>;

    /// Sets a lemma's frequency
    fn update_lemma_frequency(&mut self, lemma_id: i64, frequency: i64) -> StorageResult<()>;

    /// Deletes a lemma by ID
    fn delete_lemma(&mut self, lemma_id: i64) -> StorageResult<()>;

    /// Counts the lemmas of a site
    fn count_lemmas_by_site(&self, site_id: i64) -> StorageResult<u64>;

    // ===== Index entries =====

    /// Creates an index entry
    fn create_index_entry(
        &mut self,
        page_id: i64,
        lemma_id: i64,
        rank: f64,
    ) -> StorageResult<IndexEntryRecord>;

    /// Finds the index entry for a page and lemma
    fn find_index_entry(
        &self,
        page_id: i64,
        lemma_id: i64,
    ) -> StorageResult<Option<IndexEntryRecord>>;

    /// Sets an index entry's rank
    fn update_index_rank(&mut self, entry_id: i64, rank: f64) -> StorageResult<()>;

    /// Lists the index entries of a page
    fn find_index_entries_by_page(&self, page_id: i64) -> StorageResult<Vec<IndexEntryRecord>>;

    /// Lists the index entries referencing a lemma
    fn find_index_entries_by_lemma(&self, lemma_id: i64) -> StorageResult<Vec<IndexEntryRecord>>;

    /// Deletes all index entries of a page
    fn delete_index_entries_by_page(&mut self, page_id: i64) -> StorageResult<()>;

    // ===== Bulk reset =====

    /// Deletes every lemma and index entry of every site
    fn delete_all_lemmas_and_index_entries(&mut self) -> StorageResult<()>;

    /// Deletes every page and site
    fn delete_all_pages_and_sites(&mut self) -> StorageResult<()>;
}

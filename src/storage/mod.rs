//! Storage module for persisting the search index
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Site, page, lemma and index-entry persistence
//! - The shared storage handle used by concurrent crawl tasks
//!
//! The storage layer does not enforce the index invariants on its own;
//! callers in `index` and `crawler` maintain them.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{init_database, SqliteStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::SiteStatus;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage handle shared between the engine and crawl tasks
pub type SharedStorage = Arc<Mutex<SqliteStorage>>;

/// Opens a storage database and wraps it for sharing
pub fn open_shared_storage(path: &Path) -> StorageResult<SharedStorage> {
    Ok(Arc::new(Mutex::new(SqliteStorage::new(path)?)))
}

/// Locks the shared storage handle
///
/// A poisoned lock is reported as an error instead of panicking the caller.
pub fn lock(storage: &SharedStorage) -> StorageResult<MutexGuard<'_, SqliteStorage>> {
    storage.lock().map_err(|_| StorageError::Poisoned)
}

/// Represents a site in the database
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub id: i64,
    pub url: String,
    pub name: String,
    pub status: SiteStatus,
    pub status_time: String,
    pub last_error: Option<String>,
}

/// Represents a fetched page in the database
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: i64,
    pub site_id: i64,
    pub path: String,
    pub code: u16,
    pub content: String,
}

/// Represents a lemma of one site
///
/// `frequency` is the number of distinct pages of the site containing the
/// lemma, which equals the number of index entries referencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct LemmaRecord {
    pub id: i64,
    pub site_id: i64,
    pub lemma: String,
    pub frequency: i64,
}

/// Represents the occurrence of a lemma on a page
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntryRecord {
    pub id: i64,
    pub page_id: i64,
    pub lemma_id: i64,
    pub rank: f64,
}

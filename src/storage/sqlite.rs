//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::state::SiteStatus;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{IndexEntryRecord, LemmaRecord, PageRecord, SiteRecord};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SITE_COLUMNS: &str = "id, url, name, status, status_time, last_error";
const PAGE_COLUMNS: &str = "id, site_id, path, code, content";
const LEMMA_COLUMNS: &str = "id, site_id, lemma, frequency";
const INDEX_COLUMNS: &str = "id, page_id, lemma_id, lemma_rank";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = init_database(path)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params![id], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<SiteRecord> {
    let status: String = row.get(3)?;
    let status = SiteStatus::from_db_string(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(StorageError::Corrupt(format!("unknown site status '{}'", status))),
        )
    })?;

    Ok(SiteRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        name: row.get(2)?,
        status,
        status_time: row.get(4)?,
        last_error: row.get(5)?,
    })
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
    Ok(PageRecord {
        id: row.get(0)?,
        site_id: row.get(1)?,
        path: row.get(2)?,
        code: row.get(3)?,
        content: row.get(4)?,
    })
}

fn lemma_from_row(row: &Row<'_>) -> rusqlite::Result<LemmaRecord> {
    Ok(LemmaRecord {
        id: row.get(0)?,
        site_id: row.get(1)?,
        lemma: row.get(2)?,
        frequency: row.get(3)?,
    })
}

fn index_entry_from_row(row: &Row<'_>) -> rusqlite::Result<IndexEntryRecord> {
    Ok(IndexEntryRecord {
        id: row.get(0)?,
        page_id: row.get(1)?,
        lemma_id: row.get(2)?,
        rank: row.get(3)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Sites =====

    fn create_site(
        &mut self,
        url: &str,
        name: &str,
        status: SiteStatus,
    ) -> StorageResult<SiteRecord> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO sites (url, name, status, status_time) VALUES (?1, ?2, ?3, ?4)",
            params![url, name, status.to_db_string(), now],
        )?;

        Ok(SiteRecord {
            id: self.conn.last_insert_rowid(),
            url: url.to_string(),
            name: name.to_string(),
            status,
            status_time: now,
            last_error: None,
        })
    }

    fn get_site(&self, site_id: i64) -> StorageResult<SiteRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS),
                params![site_id],
                site_from_row,
            )
            .optional()?
            .ok_or(StorageError::SiteNotFound(site_id))
    }

    fn find_site_by_url(&self, url: &str) -> StorageResult<Option<SiteRecord>> {
        let site = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM sites WHERE url = ?1 ORDER BY id LIMIT 1",
                    SITE_COLUMNS
                ),
                params![url],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    fn list_sites(&self) -> StorageResult<Vec<SiteRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM sites ORDER BY id", SITE_COLUMNS))?;
        let sites = stmt
            .query_map([], site_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sites)
    }

    fn sites_with_status(&self, status: SiteStatus) -> StorageResult<Vec<SiteRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sites WHERE status = ?1 ORDER BY id",
            SITE_COLUMNS
        ))?;
        let sites = stmt
            .query_map(params![status.to_db_string()], site_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sites)
    }

    fn update_site_status(
        &mut self,
        site_id: i64,
        status: SiteStatus,
        last_error: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE sites SET status = ?1, status_time = ?2, last_error = ?3 WHERE id = ?4",
            params![status.to_db_string(), now, last_error, site_id],
        )?;
        if updated == 0 {
            return Err(StorageError::SiteNotFound(site_id));
        }
        Ok(())
    }

    fn touch_site(&mut self, site_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE sites SET status_time = ?1 WHERE id = ?2",
            params![now, site_id],
        )?;
        Ok(())
    }

    // ===== Pages =====

    fn create_page(
        &mut self,
        site_id: i64,
        path: &str,
        code: u16,
        content: &str,
    ) -> StorageResult<PageRecord> {
        self.conn.execute(
            "INSERT INTO pages (site_id, path, code, content) VALUES (?1, ?2, ?3, ?4)",
            params![site_id, path, code, content],
        )?;

        Ok(PageRecord {
            id: self.conn.last_insert_rowid(),
            site_id,
            path: path.to_string(),
            code,
            content: content.to_string(),
        })
    }

    fn get_page(&self, page_id: i64) -> StorageResult<PageRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM pages WHERE id = ?1", PAGE_COLUMNS),
                params![page_id],
                page_from_row,
            )
            .optional()?
            .ok_or(StorageError::PageNotFound(page_id))
    }

    fn find_page_by_path(&self, site_id: i64, path: &str) -> StorageResult<Option<PageRecord>> {
        let page = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM pages WHERE site_id = ?1 AND path = ?2 ORDER BY id LIMIT 1",
                    PAGE_COLUMNS
                ),
                params![site_id, path],
                page_from_row,
            )
            .optional()?;
        Ok(page)
    }

    fn find_pages_by_site(&self, site_id: i64) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM pages WHERE site_id = ?1 ORDER BY id",
            PAGE_COLUMNS
        ))?;
        let pages = stmt
            .query_map(params![site_id], page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages)
    }

    fn count_pages_by_site(&self, site_id: i64) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM pages WHERE site_id = ?1", site_id)
    }

    fn delete_page(&mut self, page_id: i64) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM pages WHERE id = ?1", params![page_id])?;
        Ok(())
    }

    // ===== Lemmas =====

    fn create_lemma(
        &mut self,
        site_id: i64,
        lemma: &str,
        frequency: i64,
    ) -> StorageResult<LemmaRecord> {
        self.conn.execute(
            "INSERT INTO lemmas (site_id, lemma, frequency) VALUES (?1, ?2, ?3)",
            params![site_id, lemma, frequency],
        )?;

        Ok(LemmaRecord {
            id: self.conn.last_insert_rowid(),
            site_id,
            lemma: lemma.to_string(),
            frequency,
        })
    }

    fn get_lemma(&self, lemma_id: i64) -> StorageResult<LemmaRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM lemmas WHERE id = ?1", LEMMA_COLUMNS),
                params![lemma_id],
                lemma_from_row,
            )
            .optional()?
            .ok_or(StorageError::LemmaNotFound(lemma_id))
    }

    fn find_lemma(&self, site_id: i64, lemma: &str) -> StorageResult<Option<LemmaRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM lemmas WHERE site_id = ?1 AND lemma = ?2 ORDER BY id LIMIT 1",
                    LEMMA_COLUMNS
                ),
                params![site_id, lemma],
                lemma_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn update_lemma_frequency(&mut self, lemma_id: i64, frequency: i64) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE lemmas SET frequency = ?1 WHERE id = ?2",
            params![frequency, lemma_id],
        )?;
        if updated == 0 {
            return Err(StorageError::LemmaNotFound(lemma_id));
        }
        Ok(())
    }

    fn delete_lemma(&mut self, lemma_id: i64) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM lemmas WHERE id = ?1", params![lemma_id])?;
        Ok(())
    }

    fn count_lemmas_by_site(&self, site_id: i64) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM lemmas WHERE site_id = ?1", site_id)
    }

    // ===== Index entries =====

    fn create_index_entry(
        &mut self,
        page_id: i64,
        lemma_id: i64,
        rank: f64,
    ) -> StorageResult<IndexEntryRecord> {
        self.conn.execute(
            "INSERT INTO index_entries (page_id, lemma_id, lemma_rank) VALUES (?1, ?2, ?3)",
            params![page_id, lemma_id, rank],
        )?;

        Ok(IndexEntryRecord {
            id: self.conn.last_insert_rowid(),
            page_id,
            lemma_id,
            rank,
        })
    }

    fn find_index_entry(
        &self,
        page_id: i64,
        lemma_id: i64,
    ) -> StorageResult<Option<IndexEntryRecord>> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM index_entries WHERE page_id = ?1 AND lemma_id = ?2 ORDER BY id LIMIT 1",
                    INDEX_COLUMNS
                ),
                params![page_id, lemma_id],
                index_entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn update_index_rank(&mut self, entry_id: i64, rank: f64) -> StorageResult<()> {
        self.conn.execute(
            "UPDATE index_entries SET lemma_rank = ?1 WHERE id = ?2",
            params![rank, entry_id],
        )?;
        Ok(())
    }

    fn find_index_entries_by_page(&self, page_id: i64) -> StorageResult<Vec<IndexEntryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM index_entries WHERE page_id = ?1 ORDER BY id",
            INDEX_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![page_id], index_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn find_index_entries_by_lemma(&self, lemma_id: i64) -> StorageResult<Vec<IndexEntryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM index_entries WHERE lemma_id = ?1 ORDER BY id",
            INDEX_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![lemma_id], index_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn delete_index_entries_by_page(&mut self, page_id: i64) -> StorageResult<()> {
        self.conn.execute(
            "DELETE FROM index_entries WHERE page_id = ?1",
            params![page_id],
        )?;
        Ok(())
    }

    // ===== Bulk reset =====

    fn delete_all_lemmas_and_index_entries(&mut self) -> StorageResult<()> {
        self.conn
            .execute_batch("DELETE FROM index_entries; DELETE FROM lemmas;")?;
        Ok(())
    }

    fn delete_all_pages_and_sites(&mut self) -> StorageResult<()> {
        // Index entries reference pages; they must already be gone.
        self.conn
            .execute_batch("DELETE FROM pages; DELETE FROM sites;")?;
        Ok(())
    }
}

/// Initializes or opens a database at the given path
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(Connection)` - Successfully opened/created database
/// * `Err(rusqlite::Error)` - Failed to open database
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}

//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Lemma-Search database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Configured sites and their indexing status
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL,
    status_time TEXT NOT NULL,
    last_error TEXT
);

CREATE INDEX IF NOT EXISTS idx_sites_url ON sites(url);
CREATE INDEX IF NOT EXISTS idx_sites_status ON sites(status);

-- Fetched pages, head and body markup concatenated
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    path TEXT NOT NULL,
    code INTEGER NOT NULL,
    content TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_pages_site_path ON pages(site_id, path);

-- Per-site lemmas; frequency counts the pages containing the lemma
CREATE TABLE IF NOT EXISTS lemmas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id INTEGER NOT NULL REFERENCES sites(id),
    lemma TEXT NOT NULL,
    frequency INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lemmas_site_lemma ON lemmas(site_id, lemma);

-- Occurrences of a lemma on a page
CREATE TABLE IF NOT EXISTS index_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id INTEGER NOT NULL REFERENCES pages(id),
    lemma_id INTEGER NOT NULL REFERENCES lemmas(id),
    lemma_rank REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_index_entries_page_lemma ON index_entries(page_id, lemma_id);
CREATE INDEX IF NOT EXISTS idx_index_entries_lemma ON index_entries(lemma_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

//! Index maintenance
//!
//! Applies a page's lemma counts to the lemma and index-entry tables and
//! removes them again when a page is replaced. A lemma's frequency is the
//! number of pages of its site holding an index entry for it, and every
//! function here keeps that invariant.
//!
//! Callers hold the storage lock for the whole of one page's maintenance,
//! so concurrent crawl tasks never interleave read-modify-write updates of
//! the same lemma row.

use crate::storage::{PageRecord, Storage, StorageResult};
use std::collections::HashMap;

/// Returns true if a page with this status code gets indexed
pub fn is_indexable(code: u16) -> bool {
    code < 300
}

/// Adds a page's lemma counts to the index
///
/// A lemma new to the page bumps its site-wide frequency by one (or is
/// created with frequency 1); an index entry the page already holds has
/// its rank increased instead.
pub fn index_page<S: Storage + ?Sized>(
    storage: &mut S,
    site_id: i64,
    page_id: i64,
    lemmas: &HashMap<String, usize>,
) -> StorageResult<()> {
    for (lemma, &count) in lemmas {
        let rank = count as f64;

        let lemma_id = match storage.find_lemma(site_id, lemma)? {
            Some(record) => {
                match storage.find_index_entry(page_id, record.id)? {
                    Some(entry) => {
                        storage.update_index_rank(entry.id, entry.rank + rank)?;
                        continue;
                    }
                    None => {
                        storage.update_lemma_frequency(record.id, record.frequency + 1)?;
                    }
                }
                record.id
            }
            None => storage.create_lemma(site_id, lemma, 1)?.id,
        };

        storage.create_index_entry(page_id, lemma_id, rank)?;
    }

    Ok(())
}

/// Removes a page and its contribution to the index
///
/// Every lemma the page held loses one unit of frequency; lemmas that drop
/// to zero are deleted.
pub fn remove_page<S: Storage + ?Sized>(storage: &mut S, page_id: i64) -> StorageResult<()> {
    let mut orphaned = Vec::new();

    for entry in storage.find_index_entries_by_page(page_id)? {
        let lemma = storage.get_lemma(entry.lemma_id)?;
        let frequency = lemma.frequency - 1;

        if frequency <= 0 {
            orphaned.push(lemma.id);
        } else {
            storage.update_lemma_frequency(lemma.id, frequency)?;
        }
    }

    // Entries reference lemmas, so they go first.
    storage.delete_index_entries_by_page(page_id)?;
    for lemma_id in orphaned {
        storage.delete_lemma(lemma_id)?;
    }
    storage.delete_page(page_id)
}

/// Persists a fetched page and indexes it if its status code allows
pub fn save_page<S: Storage + ?Sized>(
    storage: &mut S,
    site_id: i64,
    path: &str,
    code: u16,
    content: &str,
    lemmas: &HashMap<String, usize>,
) -> StorageResult<PageRecord> {
    let page = storage.create_page(site_id, path, code, content)?;
    if is_indexable(code) {
        index_page(storage, site_id, page.id, lemmas)?;
    }
    Ok(page)
}

/// Replaces whatever page is stored at `(site_id, path)` with a new one
///
/// The old page's index entries are withdrawn before the new page is
/// saved, so re-indexing unchanged content leaves every frequency and rank
/// as it was.
pub fn replace_page<S: Storage + ?Sized>(
    storage: &mut S,
    site_id: i64,
    path: &str,
    code: u16,
    content: &str,
    lemmas: &HashMap<String, usize>,
) -> StorageResult<PageRecord> {
    if let Some(existing) = storage.find_page_by_path(site_id, path)? {
        tracing::debug!("Removing previous version of {} (page {})", path, existing.id);
        remove_page(storage, existing.id)?;
    }
    save_page(storage, site_id, path, code, content, lemmas)
}

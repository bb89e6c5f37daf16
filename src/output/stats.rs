//! Statistics generation from the index database
//!
//! This module provides functionality for extracting and displaying
//! index statistics from the storage layer.

use crate::state::SiteStatus;
use crate::storage::{Storage, StorageResult};
use serde::Serialize;

/// Index statistics summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of stored sites
    pub sites: u64,

    /// Pages across all sites
    pub pages: u64,

    /// Lemmas across all sites
    pub lemmas: u64,

    /// Whether a crawl session is active
    pub indexing: bool,

    /// Per-site details, in storage order
    pub detailed: Vec<SiteStatistics>,
}

/// Statistics of one site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStatistics {
    pub url: String,
    pub name: String,
    pub status: SiteStatus,
    /// RFC 3339 time of the last status change or stored page
    pub status_time: String,
    pub error: Option<String>,
    pub pages: u64,
    pub lemmas: u64,
}

/// Loads statistics from storage
///
/// `indexing` is supplied by the caller, which owns the session state.
pub fn load_statistics<S: Storage + ?Sized>(
    storage: &S,
    indexing: bool,
) -> StorageResult<Statistics> {
    let mut detailed = Vec::new();

    for site in storage.list_sites()? {
        detailed.push(SiteStatistics {
            pages: storage.count_pages_by_site(site.id)?,
            lemmas: storage.count_lemmas_by_site(site.id)?,
            url: site.url,
            name: site.name,
            status: site.status,
            status_time: site.status_time,
            error: site.last_error,
        });
    }

    Ok(Statistics {
        sites: detailed.len() as u64,
        pages: detailed.iter().map(|s| s.pages).sum(),
        lemmas: detailed.iter().map(|s| s.lemmas).sum(),
        indexing,
        detailed,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &Statistics) {
    println!("=== Index Statistics ===\n");

    println!("Overview:");
    println!("  Sites: {}", stats.sites);
    println!("  Pages: {}", stats.pages);
    println!("  Lemmas: {}", stats.lemmas);
    println!(
        "  Indexing: {}",
        if stats.indexing { "in progress" } else { "idle" }
    );
    println!();

    for status in SiteStatus::all_statuses() {
        let count = stats
            .detailed
            .iter()
            .filter(|site| site.status == status)
            .count();
        if count > 0 {
            println!("  {}: {}", status, count);
        }
    }
    println!();

    for site in &stats.detailed {
        println!("{} ({})", site.name, site.url);
        println!("  Status: {} since {}", site.status, format_time(&site.status_time));
        println!("  Pages: {}, Lemmas: {}", site.pages, site.lemmas);
        if let Some(error) = &site.error {
            println!("  Last error: {}", error);
        }
        println!();
    }
}

/// Formats an RFC 3339 timestamp for display, falling back to the raw text
fn format_time(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

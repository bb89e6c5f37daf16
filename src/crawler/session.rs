//! Crawl session context
//!
//! One `CrawlSession` exists per crawl run. It owns the sites being crawled,
//! the running flag polled by every crawl task and the set of URLs already
//! fetched in this run. Nothing here outlives the session, so a second run
//! starts with an empty visited set.

use crate::config::SiteEntry;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Shared state of one crawl run
#[derive(Debug)]
pub struct CrawlSession {
    sites: Vec<SiteEntry>,
    running: AtomicBool,
    visited: Mutex<HashSet<String>>,
}

impl CrawlSession {
    /// Creates a running session over `sites`
    pub fn new(sites: Vec<SiteEntry>) -> Self {
        Self {
            sites,
            running: AtomicBool::new(true),
            visited: Mutex::new(HashSet::new()),
        }
    }

    /// The sites crawled by this session
    pub fn sites(&self) -> &[SiteEntry] {
        &self.sites
    }

    /// Returns false once a stop has been requested
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Requests a stop
    ///
    /// Returns true if the session was running.
    pub fn stop(&self) -> bool {
        self.running.swap(false, Ordering::SeqCst)
    }

    /// Records a URL as visited
    ///
    /// Returns true if the URL had not been visited before.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut visited = match self.visited.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        visited.insert(url.to_string())
    }

    /// Number of URLs visited so far
    pub fn visited_count(&self) -> usize {
        match self.visited.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

//! Search engine facade
//!
//! `SearchEngine` ties the configuration, the shared storage handle, the
//! lemma finder and the HTTP client together and exposes the operations an
//! API layer or the CLI calls: starting and stopping crawl sessions,
//! re-indexing a single page, searching and reporting statistics.

use crate::config::Config;
use crate::crawler::{build_http_client, fetch_page, Coordinator, CrawlSession};
use crate::index::{is_indexable, replace_page};
use crate::lemma::LemmaFinder;
use crate::output::{load_statistics, Statistics};
use crate::search::{search, SearchQuery, SearchResponse};
use crate::state::SiteStatus;
use crate::storage::{lock, open_shared_storage, PageRecord, SharedStorage, Storage};
use crate::url::{parse_http_url, path_of};
use crate::{Result, SearchEngineError};
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Entry point to crawling, indexing and searching
///
/// Cloning is cheap and clones share the same storage and session state.
#[derive(Clone)]
pub struct SearchEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    config: Config,
    storage: SharedStorage,
    finder: LemmaFinder,
    client: Client,
    active: Mutex<Option<Arc<CrawlSession>>>,
}

impl SearchEngine {
    /// Creates an engine over the database named in the configuration
    pub fn new(config: Config) -> Result<Self> {
        let storage = open_shared_storage(Path::new(&config.storage.database_path))?;
        Self::with_storage(config, storage, LemmaFinder::with_word_lists())
    }

    /// Creates an engine over an existing storage handle and lemma finder
    pub fn with_storage(config: Config, storage: SharedStorage, finder: LemmaFinder) -> Result<Self> {
        let client = build_http_client(&config.request, &config.crawler)?;

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                storage,
                finder,
                client,
                active: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.inner.storage
    }

    /// Returns true while a crawl session is running and not stopped
    pub fn is_indexing(&self) -> bool {
        self.active()
            .as_ref()
            .map(|session| session.is_running())
            .unwrap_or(false)
    }

    /// Starts a crawl session in the background
    ///
    /// Returns None without doing anything if a session is still active,
    /// including one that was stopped but has not drained yet.
    pub fn start_crawl_session(&self) -> Option<JoinHandle<Result<()>>> {
        let mut active = self.active();
        if active.is_some() {
            tracing::info!("Crawl session already active, ignoring start request");
            return None;
        }

        let config = &self.inner.config;
        let session = Arc::new(CrawlSession::new(config.sites.clone()));
        *active = Some(Arc::clone(&session));

        let coordinator = Coordinator::new(
            Arc::clone(&self.inner.storage),
            self.inner.finder.clone(),
            self.inner.client.clone(),
            Arc::clone(&session),
            config.crawler.max_concurrent_fetches as usize,
            config.crawler.politeness_delay(),
        );

        let engine = self.clone();
        Some(tokio::spawn(async move {
            let result = coordinator.run().await;
            engine.finish_session(&session);
            if let Err(e) = &result {
                tracing::error!("Crawl session failed: {}", e);
            }
            result
        }))
    }

    /// Runs a crawl session to completion
    ///
    /// Returns false if another session was already active.
    pub async fn run_crawl_session(&self) -> Result<bool> {
        match self.start_crawl_session() {
            Some(handle) => {
                handle.await??;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Requests the active crawl session to stop
    ///
    /// Returns false if no session was running. Sites still crawling when
    /// the session drains end as `FAILED`.
    pub fn stop_crawl_session(&self) -> bool {
        match self.active().as_ref() {
            Some(session) if session.stop() => {
                tracing::info!("Stop requested for the running crawl session");
                true
            }
            _ => false,
        }
    }

    fn finish_session(&self, session: &Arc<CrawlSession>) {
        let mut active = self.active();
        if active.as_ref().is_some_and(|current| Arc::ptr_eq(current, session)) {
            *active = None;
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<Arc<CrawlSession>>> {
        match self.inner.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fetches one page and replaces its stored version
    ///
    /// The URL must lie under a configured site, otherwise the request is
    /// rejected before anything is fetched. A site that has no row yet is
    /// created and marked `INDEXED` once the page is stored.
    pub async fn index_single_page(&self, url: &str) -> Result<PageRecord> {
        let url = url.trim();
        let entry = self
            .inner
            .config
            .site_for_url(url)
            .ok_or_else(|| SearchEngineError::OutsideConfiguredSites(url.to_string()))?;

        let parsed = parse_http_url(url)?;
        let page = fetch_page(&self.inner.client, &parsed).await?;

        let lemmas = if is_indexable(page.status_code) {
            self.inner.finder.find_all_lemmas(&page.content)
        } else {
            HashMap::new()
        };
        let path = path_of(&parsed);

        let mut storage = lock(&self.inner.storage)?;
        let (site, created) = match storage.find_site_by_url(&entry.url)? {
            Some(site) => (site, false),
            None => (
                storage.create_site(&entry.url, &entry.name, SiteStatus::Indexing)?,
                true,
            ),
        };

        let record = replace_page(
            &mut *storage,
            site.id,
            &path,
            page.status_code,
            &page.content,
            &lemmas,
        )?;
        storage.touch_site(site.id)?;
        if created {
            storage.update_site_status(site.id, SiteStatus::Indexed, None)?;
        }

        tracing::info!(
            "Indexed {} as {} on {} ({} lemmas)",
            url,
            path,
            site.url,
            lemmas.len()
        );
        Ok(record)
    }

    /// Runs a search query
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let storage = lock(&self.inner.storage)?;
        search(&*storage, &self.inner.finder, query)
    }

    /// Collects site, page and lemma counts
    pub fn statistics(&self) -> Result<Statistics> {
        let indexing = self.is_indexing();
        let storage = lock(&self.inner.storage)?;
        Ok(load_statistics(&*storage, indexing)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::storage::SqliteStorage;

    fn test_engine() -> SearchEngine {
        let config = parse_config(
            r#"
[request]
user-agent = "TestBot/1.0"

[storage]
database-path = ":memory:"

[[sites]]
url = "https://example.com/"
name = "Example"
"#,
        )
        .unwrap();
        let storage = Arc::new(Mutex::new(SqliteStorage::open_in_memory().unwrap()));
        SearchEngine::with_storage(config, storage, LemmaFinder::with_word_lists()).unwrap()
    }

    #[test]
    fn test_stop_without_session_is_noop() {
        let engine = test_engine();
        assert!(!engine.is_indexing());
        assert!(!engine.stop_crawl_session());
    }

    #[tokio::test]
    async fn test_outside_url_rejected_before_fetch() {
        let engine = test_engine();

        let result = engine.index_single_page("https://other.example/page").await;
        assert!(matches!(result, Err(SearchEngineError::OutsideConfiguredSites(_))));

        let lookalike = engine.index_single_page("https://example.com.evil.net/").await;
        assert!(matches!(lookalike, Err(SearchEngineError::OutsideConfiguredSites(_))));
    }

    #[test]
    fn test_search_and_statistics_on_empty_index() {
        let engine = test_engine();

        let response = engine.search(&SearchQuery::new("cat")).unwrap();
        assert_eq!(response.total, 0);

        let stats = engine.statistics().unwrap();
        assert_eq!(stats.sites, 0);
        assert!(!stats.indexing);
    }
}

//! Crawler coordinator - crawl session orchestration
//!
//! This module runs one crawl session across every configured site:
//! - Resetting the index and creating a Site row per configured entry
//! - Crawling all sites concurrently, one task per frontier page
//! - Persisting and indexing every fetched page
//! - Deciding each site's final status

use crate::crawler::fetcher::{fetch_page, FetchedPage};
use crate::crawler::session::CrawlSession;
use crate::index::{is_indexable, save_page};
use crate::lemma::LemmaFinder;
use crate::state::SiteStatus;
use crate::storage::{lock, SharedStorage, SiteRecord, Storage};
use crate::url::{parse_http_url, path_of};
use crate::Result;
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Error recorded for sites whose crawl was interrupted by a stop request
pub const STOPPED_BY_USER: &str = "Indexing stopped by user";

type CrawlTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Main crawler coordinator structure
///
/// Cloning is cheap; every crawl task holds its own clone.
#[derive(Clone)]
pub struct Coordinator {
    storage: SharedStorage,
    finder: LemmaFinder,
    client: Client,
    session: Arc<CrawlSession>,
    fetch_slots: Arc<Semaphore>,
    politeness_delay: Duration,
}

impl Coordinator {
    /// Creates a coordinator for one session
    ///
    /// `max_concurrent_fetches` caps the fetches in flight across all sites.
    pub fn new(
        storage: SharedStorage,
        finder: LemmaFinder,
        client: Client,
        session: Arc<CrawlSession>,
        max_concurrent_fetches: usize,
        politeness_delay: Duration,
    ) -> Self {
        Self {
            storage,
            finder,
            client,
            session,
            fetch_slots: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
            politeness_delay,
        }
    }

    /// Runs the session to completion
    ///
    /// Every site's crawl runs as its own task; this returns once all of them
    /// have finished and recorded a final status.
    pub async fn run(&self) -> Result<()> {
        let sites = self.prepare_sites()?;
        tracing::info!("Starting crawl session over {} site(s)", sites.len());

        let mut tasks = JoinSet::new();
        for site in sites {
            tasks.spawn(self.clone().crawl_site(site));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Site crawl task failed: {}", e);
            }
        }

        tracing::info!(
            "Crawl session finished, {} URL(s) visited",
            self.session.visited_count()
        );
        Ok(())
    }

    /// Clears the previous index and creates a fresh Site row per entry
    fn prepare_sites(&self) -> Result<Vec<SiteRecord>> {
        let mut storage = lock(&self.storage)?;

        storage.delete_all_lemmas_and_index_entries()?;
        storage.delete_all_pages_and_sites()?;

        let mut sites = Vec::new();
        for entry in self.session.sites() {
            sites.push(storage.create_site(&entry.url, &entry.name, SiteStatus::Indexing)?);
        }
        Ok(sites)
    }

    /// Crawls one site and records its final status
    async fn crawl_site(self, site: SiteRecord) {
        tracing::info!("Indexing {} ({})", site.name, site.url);
        let site = Arc::new(site);

        let (status, last_error) = match self.crawl_root(&site).await {
            Ok(()) if self.session.is_running() => (SiteStatus::Indexed, None),
            Ok(()) => (SiteStatus::Failed, Some(STOPPED_BY_USER.to_string())),
            Err(e) => {
                tracing::error!("Crawl of {} failed: {}", site.url, e);
                (SiteStatus::Failed, Some(e.to_string()))
            }
        };

        let update = lock(&self.storage).and_then(|mut storage| {
            storage.update_site_status(site.id, status, last_error.as_deref())
        });
        match update {
            Ok(()) => tracing::info!("Site {} finished with status {}", site.url, status),
            Err(e) => tracing::error!("Failed to record status of {}: {}", site.url, e),
        }
    }

    /// Fetches and stores the root page, then expands it
    ///
    /// A failure here fails the whole site.
    async fn crawl_root(&self, site: &Arc<SiteRecord>) -> Result<()> {
        if !self.session.is_running() {
            return Ok(());
        }

        let root = parse_http_url(&site.url)?;
        self.session.mark_visited(root.as_str());

        let page = self.fetch(&root).await?;
        self.store(site, &page)?;

        self.clone().expand(Arc::clone(site), page).await;
        Ok(())
    }

    /// Fetches the unvisited children of a frontier page and recurses into
    /// each of them as its own task
    fn expand(self, site: Arc<SiteRecord>, page: FetchedPage) -> CrawlTask {
        Box::pin(async move {
            // The parent's content is not needed while its children run.
            let FetchedPage { url, links, .. } = page;
            if !self.session.is_running() || links.is_empty() {
                return;
            }

            tokio::time::sleep(self.politeness_delay).await;

            let mut children = Vec::new();
            for link in links {
                if !self.session.is_running() {
                    break;
                }
                if !self.session.mark_visited(link.as_str()) {
                    continue;
                }

                let child = match self.fetch(&link).await {
                    Ok(child) => child,
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", link, e);
                        continue;
                    }
                };

                if let Err(e) = self.store(&site, &child) {
                    tracing::warn!("Failed to store {}: {}", link, e);
                    continue;
                }
                children.push(child);
            }

            if !self.session.is_running() {
                return;
            }

            let mut tasks = JoinSet::new();
            for child in children {
                tasks.spawn(self.clone().expand(Arc::clone(&site), child));
            }
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Crawl task under {} failed: {}", url, e);
                }
            }
        })
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        // Permit is held until the fetch completes.
        let _permit = self.fetch_slots.acquire().await;
        fetch_page(&self.client, url).await
    }

    /// Persists a fetched page, indexes it and refreshes the site's time
    fn store(&self, site: &SiteRecord, page: &FetchedPage) -> Result<()> {
        let lemmas = if is_indexable(page.status_code) {
            self.finder.find_all_lemmas(&page.content)
        } else {
            HashMap::new()
        };
        let path = path_of(&page.url);

        let mut storage = lock(&self.storage)?;
        save_page(&mut *storage, site.id, &path, page.status_code, &page.content, &lemmas)?;
        storage.touch_site(site.id)?;

        tracing::debug!(
            "Stored {} ({}, {} lemmas, title {:?})",
            page.url,
            page.status_code,
            lemmas.len(),
            page.title
        );
        Ok(())
    }
}

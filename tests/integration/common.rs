//! Shared fixtures for the integration tests

use lemma_search::config::{parse_config, Config};
use lemma_search::storage::{lock, SiteRecord, Storage};
use lemma_search::SearchEngine;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An engine over a database in a temporary directory
pub struct TestEngine {
    pub engine: SearchEngine,
    _dir: TempDir,
}

/// Creates a test configuration for the given `(url, name)` sites
pub fn create_test_config(sites: &[(&str, &str)], db_path: &Path) -> Config {
    let mut toml = format!(
        r#"
[crawler]
politeness-delay-ms = 10
request-timeout-secs = 5
max-concurrent-fetches = 4

[request]
user-agent = "TestBot/1.0"
referrer = "https://www.google.com"

[storage]
database-path = "{}"
"#,
        db_path.display()
    );

    for (url, name) in sites {
        toml.push_str(&format!("\n[[sites]]\nurl = \"{}\"\nname = \"{}\"\n", url, name));
    }

    parse_config(&toml).expect("Test config should be valid")
}

/// Creates an engine over a fresh database
pub fn create_test_engine(sites: &[(&str, &str)]) -> TestEngine {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(sites, &dir.path().join("search.db"));
    let engine = SearchEngine::new(config).expect("Failed to create engine");
    TestEngine { engine, _dir: dir }
}

/// An HTML page response
pub fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

/// Serves `response` at `page_path`, expecting exactly `calls` requests
pub async fn mount_page(server: &MockServer, page_path: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

/// Looks up a stored site by its root URL
pub fn find_site(engine: &SearchEngine, url: &str) -> SiteRecord {
    let storage = lock(engine.storage()).expect("Storage lock poisoned");
    storage
        .find_site_by_url(url)
        .expect("Failed to query site")
        .expect("Site should exist")
}

/// Returns the stored paths of a site, sorted
pub fn page_paths(engine: &SearchEngine, site_id: i64) -> Vec<String> {
    let storage = lock(engine.storage()).expect("Storage lock poisoned");
    let mut paths: Vec<String> = storage
        .find_pages_by_site(site_id)
        .expect("Failed to list pages")
        .into_iter()
        .map(|page| page.path)
        .collect();
    paths.sort();
    paths
}

/// Checks that every lemma's frequency equals the number of pages indexed
/// under it, and that no lemma is left without pages
pub fn assert_frequency_invariant(engine: &SearchEngine) {
    let storage = lock(engine.storage()).expect("Storage lock poisoned");

    for site in storage.list_sites().expect("Failed to list sites") {
        let mut pages_per_lemma: HashMap<i64, i64> = HashMap::new();
        for page in storage.find_pages_by_site(site.id).expect("Failed to list pages") {
            for entry in storage
                .find_index_entries_by_page(page.id)
                .expect("Failed to list entries")
            {
                *pages_per_lemma.entry(entry.lemma_id).or_default() += 1;
            }
        }

        assert_eq!(
            storage.count_lemmas_by_site(site.id).expect("Failed to count lemmas"),
            pages_per_lemma.len() as u64,
            "orphaned lemmas on {}",
            site.url
        );
        for (lemma_id, pages) in pages_per_lemma {
            let lemma = storage.get_lemma(lemma_id).expect("Failed to load lemma");
            assert_eq!(lemma.frequency, pages, "frequency of '{}'", lemma.lemma);
        }
    }
}

/// Waits until at least `count` pages are stored
pub async fn wait_for_pages(engine: &SearchEngine, count: u64) {
    for _ in 0..250 {
        if engine.statistics().expect("Failed to load statistics").pages >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Timed out waiting for {} stored page(s)", count);
}

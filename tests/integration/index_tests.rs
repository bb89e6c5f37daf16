//! Single-page indexing tests

use crate::common::*;
use lemma_search::storage::{lock, Storage};
use lemma_search::{SearchEngineError, SiteStatus};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_index_page_creates_site_and_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(
        &mock_server,
        "/news",
        html_page("News", "<p>Cats and more cats</p>"),
        1,
    )
    .await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let page = test
        .engine
        .index_single_page(&format!("{}/news", base_url))
        .await
        .expect("Indexing failed");

    assert_eq!(page.path, "/news");
    assert_eq!(page.code, 200);

    let site = find_site(&test.engine, &base_url);
    assert_eq!(site.status, SiteStatus::Indexed);
    assert_eq!(site.name, "Mock");

    let storage = lock(test.engine.storage()).unwrap();
    let cat = storage.find_lemma(site.id, "cat").unwrap().unwrap();
    let entry = storage.find_index_entry(page.id, cat.id).unwrap().unwrap();
    assert_eq!(cat.frequency, 1);
    assert_eq!(entry.rank, 2.0);
}

#[tokio::test]
async fn test_reindexing_unchanged_page_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/a", html_page("A", "<p>Cat door cat</p>"), 3).await;
    mount_page(&mock_server, "/b", html_page("B", "<p>Cat</p>"), 1).await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let page_a = format!("{}/a", base_url);
    test.engine.index_single_page(&page_a).await.unwrap();
    test.engine
        .index_single_page(&format!("{}/b", base_url))
        .await
        .unwrap();

    let snapshot = |engine: &lemma_search::SearchEngine| {
        let site = find_site(engine, &base_url);
        let storage = lock(engine.storage()).unwrap();
        let page = storage.find_page_by_path(site.id, "/a").unwrap().unwrap();
        let cat = storage.find_lemma(site.id, "cat").unwrap().unwrap();
        let door = storage.find_lemma(site.id, "door").unwrap().unwrap();
        let rank = storage.find_index_entry(page.id, cat.id).unwrap().unwrap().rank;
        (cat.frequency, door.frequency, rank)
    };

    let before = snapshot(&test.engine);
    test.engine.index_single_page(&page_a).await.unwrap();
    test.engine.index_single_page(&page_a).await.unwrap();
    let after = snapshot(&test.engine);

    assert_eq!(before, (2, 1, 2.0));
    assert_eq!(after, before);

    let site = find_site(&test.engine, &base_url);
    assert_eq!(page_paths(&test.engine, site.id), vec!["/a", "/b"]);
    assert_frequency_invariant(&test.engine);
}

#[tokio::test]
async fn test_reindexing_changed_page_replaces_lemmas() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(html_page("Old", "<p>Owls hoot</p>"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page("New", "<p>Cats purr</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let url = format!("{}/page", base_url);
    test.engine.index_single_page(&url).await.unwrap();
    test.engine.index_single_page(&url).await.unwrap();

    let site = find_site(&test.engine, &base_url);
    {
        let storage = lock(test.engine.storage()).unwrap();
        assert!(storage.find_lemma(site.id, "owl").unwrap().is_none());
        assert!(storage.find_lemma(site.id, "hoot").unwrap().is_none());
        assert_eq!(storage.find_lemma(site.id, "cat").unwrap().unwrap().frequency, 1);
        assert_eq!(storage.count_pages_by_site(site.id).unwrap(), 1);
    }
    assert_frequency_invariant(&test.engine);
}

#[tokio::test]
async fn test_outside_url_is_rejected_without_fetching() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let site_url = format!("{}/docs", base_url);
    let test = create_test_engine(&[(site_url.as_str(), "Docs")]);

    let result = test
        .engine
        .index_single_page(&format!("{}/blog/post", base_url))
        .await;

    assert!(matches!(result, Err(SearchEngineError::OutsideConfiguredSites(_))));
    assert!(result.as_ref().is_err_and(|e| e.is_rejection()));
    assert_eq!(test.engine.statistics().unwrap().sites, 0);
}

#[tokio::test]
async fn test_failed_fetch_changes_nothing() {
    let test = create_test_engine(&[("http://127.0.0.1:9", "Dead")]);

    let result = test.engine.index_single_page("http://127.0.0.1:9/page").await;

    assert!(matches!(result, Err(SearchEngineError::Http { .. })));
    assert_eq!(test.engine.statistics().unwrap().sites, 0);
}

//! End-to-end search tests

use crate::common::*;
use lemma_search::search::SearchQuery;
use lemma_search::SearchEngineError;
use wiremock::MockServer;

async fn crawl_cat_site(mock_server: &MockServer) {
    mount_page(
        mock_server,
        "/",
        html_page(
            "Home",
            r#"<p>Welcome</p><a href="/tabby">Tabby</a><a href="/siamese">Siamese</a><a href="/dogs">Dogs</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        mock_server,
        "/tabby",
        html_page("Tabby", "<p>The tabby cat sleeps. Cats love a warm cat bed.</p>"),
        1,
    )
    .await;
    mount_page(
        mock_server,
        "/siamese",
        html_page("Siamese", "<p>A siamese cat talks.</p>"),
        1,
    )
    .await;
    mount_page(
        mock_server,
        "/dogs",
        html_page("Dogs", "<p>Dogs chase the cat and the ball.</p>"),
        1,
    )
    .await;
}

#[tokio::test]
async fn test_search_after_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    crawl_cat_site(&mock_server).await;

    let test = create_test_engine(&[(base_url.as_str(), "Cats")]);
    test.engine.run_crawl_session().await.unwrap();

    let response = test.engine.search(&SearchQuery::new("cats")).unwrap();

    assert_eq!(response.total, 3);
    let uris: Vec<&str> = response.results.iter().map(|r| r.uri.as_str()).collect();
    assert_eq!(uris[0], "/tabby");
    assert_eq!(response.results[0].relevance, 1.0);
    assert_eq!(response.results[0].title, "Tabby");
    assert_eq!(response.results[0].site, base_url);
    assert_eq!(response.results[0].site_name, "Cats");
    assert!(response.results[0].snippet.contains("<b>cat</b>"));
    assert!(response.results[0].snippet.ends_with(". . ."));

    for result in &response.results[1..] {
        assert!((result.relevance - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_search_requires_every_lemma() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    crawl_cat_site(&mock_server).await;

    let test = create_test_engine(&[(base_url.as_str(), "Cats")]);
    test.engine.run_crawl_session().await.unwrap();

    let both = test.engine.search(&SearchQuery::new("dog cat")).unwrap();
    assert_eq!(both.total, 1);
    assert_eq!(both.results[0].uri, "/dogs");
    let snippet = &both.results[0].snippet;
    assert_eq!(snippet.matches(". . .").count(), 2, "one window expected: {}", snippet);
    assert!(snippet.contains("<b>cat</b>"));
    assert!(snippet.contains("<b>Dogs</b>"));

    let apart = test.engine.search(&SearchQuery::new("siamese ball")).unwrap();
    assert_eq!(apart.total, 0);
    assert!(apart.results.is_empty());
}

#[tokio::test]
async fn test_search_pagination_and_site_filter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    crawl_cat_site(&mock_server).await;

    let test = create_test_engine(&[(base_url.as_str(), "Cats")]);
    test.engine.run_crawl_session().await.unwrap();

    let page = test
        .engine
        .search(&SearchQuery::new("cat").with_site(format!("{}/", base_url)).with_page(1, 5))
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.results.len(), 2);

    let beyond = test
        .engine
        .search(&SearchQuery::new("cat").with_page(3, 5))
        .unwrap();
    assert_eq!(beyond.total, 3);
    assert!(beyond.results.is_empty());
}

#[tokio::test]
async fn test_search_rejections() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let test = create_test_engine(&[(base_url.as_str(), "Cats")]);

    let empty = test.engine.search(&SearchQuery::new(""));
    assert!(matches!(empty, Err(SearchEngineError::EmptyQuery)));
    assert!(empty.as_ref().is_err_and(|e| e.is_rejection()));

    let blank = test.engine.search(&SearchQuery::new("   "));
    assert!(matches!(blank, Err(SearchEngineError::EmptyQuery)));
}

#[tokio::test]
async fn test_unknown_site_filter_falls_back_to_indexed_sites() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    crawl_cat_site(&mock_server).await;

    let test = create_test_engine(&[(base_url.as_str(), "Cats")]);
    test.engine.run_crawl_session().await.unwrap();

    let response = test
        .engine
        .search(&SearchQuery::new("cat").with_site("https://unknown.example"))
        .unwrap();
    assert_eq!(response.total, 3);
}

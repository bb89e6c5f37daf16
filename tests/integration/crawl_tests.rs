//! Crawl session tests

use crate::common::*;
use lemma_search::crawler::STOPPED_BY_USER;
use lemma_search::search::SearchQuery;
use lemma_search::storage::{lock, Storage};
use lemma_search::{SearchEngineError, SiteStatus};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_with_back_links_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every page is fetched exactly once even though pages link back.
    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<p>Cats and dogs</p><a href="/a">A</a><a href="/b">B</a><a href="/a#top">A again</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        html_page(
            "A",
            r#"<p>A cat sat near the door</p><a href="/">Home</a><a href="/b">B</a><a href="/a">Self</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        html_page(
            "B",
            r#"<p>Dogs bark at cats</p>
            <a href="/a">A</a>
            <a href="/photo.png">Photo</a>
            <a href="https://other.example/x">Elsewhere</a>
            <a href="/missing">Missing</a>"#,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/missing",
        ResponseTemplate::new(404).set_body_string("<p>Nothing about cats here</p>"),
        1,
    )
    .await;
    mount_page(&mock_server, "/photo.png", ResponseTemplate::new(200), 0).await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let ran = test.engine.run_crawl_session().await.expect("Crawl failed");
    assert!(ran);

    let site = find_site(&test.engine, &base_url);
    assert_eq!(site.status, SiteStatus::Indexed);
    assert_eq!(site.last_error, None);
    assert_eq!(page_paths(&test.engine, site.id), vec!["/", "/a", "/b", "/missing"]);

    {
        let storage = lock(test.engine.storage()).unwrap();
        let missing = storage
            .find_page_by_path(site.id, "/missing")
            .unwrap()
            .unwrap();
        assert_eq!(missing.code, 404);
        assert!(storage.find_index_entries_by_page(missing.id).unwrap().is_empty());

        let cat = storage.find_lemma(site.id, "cat").unwrap().unwrap();
        assert_eq!(cat.frequency, 3);
        let dog = storage.find_lemma(site.id, "dog").unwrap().unwrap();
        assert_eq!(dog.frequency, 2);
        assert!(storage.find_lemma(site.id, "and").unwrap().is_none());
    }

    assert_frequency_invariant(&test.engine);
    assert!(!test.engine.is_indexing());
}

#[tokio::test]
async fn test_sibling_subtrees_keep_frequencies_exact() {
    const HUBS: usize = 3;
    const LEAVES: usize = 4;

    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hub_links: String = (0..HUBS)
        .map(|h| format!(r#"<a href="/hub{}">Hub</a>"#, h))
        .collect();
    mount_page(
        &mock_server,
        "/",
        html_page("Home", &format!("<p>Welcome</p>{}", hub_links)),
        1,
    )
    .await;

    for h in 0..HUBS {
        let leaf_links: String = (0..LEAVES)
            .map(|l| format!(r#"<a href="/hub{}/leaf{}">Leaf</a>"#, h, l))
            .collect();
        mount_page(
            &mock_server,
            &format!("/hub{}", h),
            html_page("Hub", &format!("<p>A hub about a cat</p>{}", leaf_links)),
            1,
        )
        .await;

        for l in 0..LEAVES {
            mount_page(
                &mock_server,
                &format!("/hub{}/leaf{}", h, l),
                html_page("Leaf", "<p>Every leaf has a cat and cats</p>"),
                1,
            )
            .await;
        }
    }

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    test.engine.run_crawl_session().await.expect("Crawl failed");

    let site = find_site(&test.engine, &base_url);
    assert_eq!(site.status, SiteStatus::Indexed);
    assert_eq!(page_paths(&test.engine, site.id).len(), 1 + HUBS + HUBS * LEAVES);

    {
        let storage = lock(test.engine.storage()).unwrap();
        let cat = storage.find_lemma(site.id, "cat").unwrap().unwrap();
        assert_eq!(cat.frequency, (HUBS * LEAVES + HUBS) as i64);

        let leaf = storage.find_page_by_path(site.id, "/hub2/leaf3").unwrap().unwrap();
        let entry = storage.find_index_entry(leaf.id, cat.id).unwrap().unwrap();
        assert_eq!(entry.rank, 2.0);
    }

    assert_frequency_invariant(&test.engine);
}

#[tokio::test]
async fn test_root_failure_fails_only_that_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(&mock_server, "/", html_page("Home", "<p>Working site</p>"), 1).await;

    let dead_url = "http://127.0.0.1:9";
    let test = create_test_engine(&[(dead_url, "Dead"), (base_url.as_str(), "Alive")]);
    test.engine.run_crawl_session().await.expect("Crawl failed");

    let dead = find_site(&test.engine, dead_url);
    assert_eq!(dead.status, SiteStatus::Failed);
    assert!(dead.last_error.is_some());
    assert!(page_paths(&test.engine, dead.id).is_empty());

    let alive = find_site(&test.engine, &base_url);
    assert_eq!(alive.status, SiteStatus::Indexed);
    assert_eq!(page_paths(&test.engine, alive.id), vec!["/"]);
}

#[tokio::test]
async fn test_stop_marks_site_failed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", r#"<p>Cats</p><a href="/slow">Slow</a><a href="/later">Later</a>"#),
        1,
    )
    .await;
    // Whether /slow is requested depends on when the stop lands.
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Slow", "<p>Slow cats</p>").set_delay(Duration::from_millis(800)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/later", html_page("Later", "<p>Later cats</p>"), 0).await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let handle = test
        .engine
        .start_crawl_session()
        .expect("Session should start");

    wait_for_pages(&test.engine, 1).await;
    assert!(test.engine.is_indexing());
    assert!(test.engine.stop_crawl_session());
    assert!(!test.engine.stop_crawl_session());
    assert!(!test.engine.is_indexing());

    handle
        .await
        .expect("Crawl task panicked")
        .expect("Crawl failed");

    let site = find_site(&test.engine, &base_url);
    assert_eq!(site.status, SiteStatus::Failed);
    assert_eq!(site.last_error.as_deref(), Some(STOPPED_BY_USER));
    assert!(page_paths(&test.engine, site.id).contains(&"/".to_string()));
    assert_frequency_invariant(&test.engine);

    let filtered = test
        .engine
        .search(&SearchQuery::new("cats").with_site(base_url.as_str()));
    assert!(matches!(filtered, Err(SearchEngineError::SiteNotIndexed(_))));
}

#[tokio::test]
async fn test_start_is_noop_while_running() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        html_page("Home", "<p>Cats</p>").set_delay(Duration::from_millis(300)),
        1,
    )
    .await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    let handle = test
        .engine
        .start_crawl_session()
        .expect("Session should start");

    assert!(test.engine.start_crawl_session().is_none());
    assert!(!test.engine.run_crawl_session().await.expect("No-op start failed"));

    handle.await.unwrap().unwrap();
    assert!(!test.engine.is_indexing());
    assert_eq!(find_site(&test.engine, &base_url).status, SiteStatus::Indexed);
}

#[tokio::test]
async fn test_second_session_recrawls_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", r#"<p>Cats</p><a href="/a">A</a>"#),
        2,
    )
    .await;
    mount_page(&mock_server, "/a", html_page("A", "<p>More cats</p>"), 2).await;

    let test = create_test_engine(&[(base_url.as_str(), "Mock")]);
    assert!(test.engine.run_crawl_session().await.unwrap());
    assert!(test.engine.run_crawl_session().await.unwrap());

    let site = find_site(&test.engine, &base_url);
    assert_eq!(site.status, SiteStatus::Indexed);
    assert_eq!(page_paths(&test.engine, site.id), vec!["/", "/a"]);

    let stats = test.engine.statistics().unwrap();
    assert_eq!(stats.sites, 1);
    assert_eq!(stats.pages, 2);
    assert_frequency_invariant(&test.engine);
}

//! Integration tests for the search pipeline
//!
//! These tests use wiremock to stand in for both the canonical search site
//! and a satellite blog, and run complete searches through the real HTTP
//! fetcher.

use greylit::config::{load_config, parse_config, Config};
use greylit::engine::{FetchError, HttpFetcher};
use greylit::{
    run_search, search, AggregationRequest, Attribution, GreyLitError, SearchOutcome,
    SearchParams, SortOrder,
};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration pointing the canonical site and one blog at `base_url`
fn create_test_config(base_url: &str) -> Config {
    parse_config(&config_toml(base_url)).expect("test config should be valid")
}

fn config_toml(base_url: &str) -> String {
    format!(
        r#"
[client]
user-agent = "greylit-tests"
timeout-secs = 5
connect-timeout-secs = 2

[search]
max-concurrent-requests = 2
max-failed-fetches = 1

[canonical]
base-url = "{base}"

[[department]]
title = "Department for Testing"
link = "{base}/government/organisations/department-for-testing"

[[source]]
name = "testing-blog"
title = "Department for Testing"
base-url = "{base}/blog/"
search-path = "page/1/"
search-query-key = "s"
listing = {{ tag = "main", class = "site-main" }}
item = {{ tag = "a", class = "entry-link" }}
date = {{ element = {{ tag = "time", class = "entry-date" }} }}
pagination = {{ scheme = "marker-increment", marker = "page/", delta = 1 }}
counting = {{ mode = "manual" }}
"#,
        base = base_url
    )
}

fn params(max_results: usize) -> SearchParams {
    SearchParams {
        keywords: "flood risk".to_string(),
        departments: Vec::new(),
        from: None,
        to: None,
        sort: SortOrder::Relevance,
        max_results,
    }
}

fn canonical_listing(total: u64) -> String {
    format!(
        r#"<html><body>
        <div class="result-info__header">{} results</div>
        <div class="finder-results js-finder-results"><ul>
            <li class="gem-c-document-list__item">
                <a class="govuk-link" href="/guidance/flood-risk">Flood risk assessments</a>
                <p class="gem-c-document-list__item-description">Guidance for developers</p>
                <ul class="gem-c-document-list__item-metadata"><li>Updated: 4 March 2024</li></ul>
            </li>
            <li class="gem-c-document-list__item">
                <a class="govuk-link" href="/government/organisations/department-for-testing">Department for Testing</a>
            </li>
        </ul></div>
        </body></html>"#,
        total
    )
}

fn blog_listing(base_url: &str) -> String {
    format!(
        r#"<html><body>
        <nav><a class="entry-link" href="{base}/blog/about/">About</a></nav>
        <main class="site-main">
            <article>
                <a class="entry-link" href="{base}/blog/2024/01/flood-plan/">Our flood
                    plan</a>
                <time class="entry-date">5 Jan 24</time>
            </article>
            <article>
                <a class="entry-link" href="{base}/blog/2023/11/river-survey/">River survey</a>
                <time class="entry-date">20 November 2023</time>
            </article>
        </main>
        </body></html>"#,
        base = base_url
    )
}

const EMPTY_BLOG_PAGE: &str = r#"<html><body><main class="site-main"></main></body></html>"#;

/// Mounts the canonical search page, one detail page and a two-page blog
async fn mount_sources(server: &MockServer, canonical_total: u64) {
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/search/all"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(canonical_listing(canonical_total)))
        // Counting and the first round share one fetch
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/guidance/flood-risk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="govuk:first-published-at" content="2019-07-01T09:30:00.000+01:00"></head>
            <body><ul><li class="organisation-logos__logo">Department for Testing</li></ul></body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/page/1/"))
        .and(query_param("s", "flood risk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(blog_listing(&base_url)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_BLOG_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_search_with_shortfall() {
    let server = MockServer::start().await;
    mount_sources(&server, 2).await;
    let base_url = server.uri();

    let outcome = search(&create_test_config(&base_url), &params(10))
        .await
        .expect("search should succeed");

    let SearchOutcome::Found(report) = outcome else {
        panic!("expected results");
    };

    assert_eq!(report.total_estimate, 4);
    assert_eq!(report.items.len(), 4);
    assert!(report.shortfall);

    let first = &report.items[0];
    assert_eq!(first.title, "Flood risk assessments");
    assert_eq!(first.url, format!("{}/guidance/flood-risk", base_url));
    assert_eq!(
        first.attribution,
        Attribution::Many(vec!["Department for Testing".to_string()])
    );
    assert_eq!(first.abstract_text, "Guidance for developers");
    assert_eq!(first.last_updated, "4 March 2024");
    assert_eq!(first.date_published, "01/07/2019");

    // The department's own page has no detail metadata; it is attributed to
    // the department that owns it
    let second = &report.items[1];
    assert_eq!(
        second.attribution,
        Attribution::Single("Department for Testing".to_string())
    );
    assert_eq!(second.date_published, "N/A");

    let third = &report.items[2];
    assert_eq!(third.title, "Our flood plan");
    assert_eq!(third.url, format!("{}/blog/2024/01/flood-plan/", base_url));
    assert_eq!(third.date_published, "05/01/2024");
    assert_eq!(third.abstract_text, "N/A");

    assert_eq!(report.items[3].date_published, "20/11/2023");
}

#[tokio::test]
async fn test_search_stops_at_max_results() {
    let server = MockServer::start().await;
    mount_sources(&server, 2).await;

    let outcome = search(&create_test_config(&server.uri()), &params(3))
        .await
        .expect("search should succeed");

    let SearchOutcome::Found(report) = outcome else {
        panic!("expected results");
    };

    let titles: Vec<&str> = report.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Flood risk assessments", "Department for Testing", "Our flood plan"]
    );
    assert_eq!(report.rounds, 1);
    assert!(!report.shortfall);
}

#[tokio::test]
async fn test_canonical_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="result-info__header">0 results</div>"#),
        )
        .mount(&server)
        .await;

    let outcome = search(&create_test_config(&server.uri()), &params(10))
        .await
        .expect("search should succeed");

    assert_eq!(outcome, SearchOutcome::NoResults);
}

#[tokio::test]
async fn test_canonical_server_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/all"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = search(&create_test_config(&server.uri()), &params(10)).await;

    assert!(matches!(
        result,
        Err(GreyLitError::Fetch(FetchError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn test_broken_satellite_is_pruned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string(canonical_listing(2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blog/page/1/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let request = AggregationRequest::from_config(&config, &params(10)).unwrap();
    let fetcher = Arc::new(HttpFetcher::new(&config.client).unwrap());

    let outcome = run_search(fetcher, &config, &request).await.unwrap();
    let SearchOutcome::Found(report) = outcome else {
        panic!("expected results");
    };

    assert_eq!(report.total_estimate, 2);
    assert_eq!(report.items.len(), 2);
    assert!(report.shortfall);
}

#[tokio::test]
async fn test_department_filter_selects_canonical_organisations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/all"))
        .and(query_param("organisations[]", "department-for-testing"))
        .and(query_param("order", "updated-oldest"))
        .and(query_param("keywords", "flood risk"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="result-info__header">0 results</div>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut params = params(5);
    params.departments = vec!["Department for Testing".to_string()];
    params.sort = SortOrder::OldestFirst;

    let outcome = search(&create_test_config(&server.uri()), &params)
        .await
        .unwrap();
    assert_eq!(outcome, SearchOutcome::NoResults);
}

#[tokio::test]
async fn test_search_from_config_file() {
    let server = MockServer::start().await;
    mount_sources(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("greylit.toml");
    std::fs::write(&config_path, config_toml(&server.uri())).unwrap();

    let config = load_config(&config_path).unwrap();
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.search.max_concurrent_requests, 2);

    let outcome = search(&config, &params(4)).await.unwrap();
    let SearchOutcome::Found(report) = outcome else {
        panic!("expected results");
    };
    assert_eq!(report.items.len(), 4);
}

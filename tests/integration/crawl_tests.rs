//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through `HttpFetcher`.

use site_spider::config::{parse_config, Config, CrawlerConfig, UserAgentConfig};
use site_spider::output::{generate_markdown_report, CrawlReport};
use site_spider::{HttpFetcher, SkipReason, Spider};
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings with pacing disabled
fn test_crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        fetch_interval: 0,
        jitter: 0,
        request_timeout: 5,
        ..CrawlerConfig::default()
    }
}

fn test_spider(seed: &str, config: CrawlerConfig) -> Spider<HttpFetcher> {
    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), &config).expect("Failed to build fetcher");
    Spider::new(seed, config, fetcher).expect("Failed to create spider")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

fn distances(spider: &Spider<HttpFetcher>) -> HashMap<String, u32> {
    spider
        .pages()
        .into_iter()
        .map(|p| (p.url.path().to_string(), p.distance))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a> <a href="page2">Page 2</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        &format!(r#"<a href="{}/page3">Page 3</a> <a href="/">Home</a>"#, base_url),
    )
    .await;
    mount_page(&mock_server, "/page2", r#"<a href="/page1#top">Page 1</a>"#).await;
    mount_page(&mock_server, "/page3", "Leaf").await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    let summary = spider.crawl(None).await.expect("Crawl failed");

    let found = distances(&spider);
    assert_eq!(found.len(), 4);
    assert_eq!(found["/"], 0);
    assert_eq!(found["/page1"], 1);
    assert_eq!(found["/page2"], 1);
    assert_eq!(found["/page3"], 2);

    assert_eq!(summary.pages_processed, 4);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.external_links, 0);
    // Each `.expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /private/\n"),
        )
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/public">Public</a> <a href="/private/secret">Secret</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", "Public page").await;

    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(html("Secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    spider.crawl(None).await.expect("Crawl failed");

    assert_eq!(spider.pages().len(), 2);
    let skipped: HashMap<String, SkipReason> = spider.skipped().into_iter().collect();
    assert_eq!(
        skipped.get(&format!("{}/private/secret", base_url)),
        Some(&SkipReason::Robots)
    );
}

#[tokio::test]
async fn test_missing_robots_txt_allows_all() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No robots.txt mounted: wiremock answers 404
    mount_page(&mock_server, "/", r#"<a href="/private/page">Private</a>"#).await;
    mount_page(&mock_server, "/private/page", "Reachable").await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    spider.crawl(None).await.expect("Crawl failed");

    assert_eq!(spider.pages().len(), 2);
    assert!(spider.skipped().is_empty());
}

#[tokio::test]
async fn test_external_links_checked_not_followed() {
    let site = MockServer::start().await;
    let external = MockServer::start().await;
    let base_url = site.uri();
    let external_url = external.uri();

    mount_page(
        &site,
        "/",
        &format!(
            r#"<a href="{ext}/alive">Alive</a> <a href="{ext}/gone">Gone</a> <a href="/about">About</a>"#,
            ext = external_url
        ),
    )
    .await;
    mount_page(
        &site,
        "/about",
        &format!(r#"<a href="{}/alive">Alive again</a>"#, external_url),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&external)
        .await;
    Mock::given(method("GET"))
        .respond_with(html("never fetched"))
        .expect(0)
        .mount(&external)
        .await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    let summary = spider.crawl(None).await.expect("Crawl failed");

    let external_host = url::Url::parse(&external_url).unwrap();
    let external_host = format!(
        "{}:{}",
        external_host.host_str().unwrap(),
        external_host.port().unwrap()
    );
    assert_eq!(spider.external_hosts(), vec![external_host]);
    assert_eq!(
        spider.external_links(),
        vec![format!("{}/alive", external_url), format!("{}/gone", external_url)]
    );
    assert_eq!(summary.external_links, 2);
    assert_eq!(summary.external_hosts, 1);

    let alive = spider
        .external_link_status(&format!("{}/alive", external_url))
        .expect("alive link was not checked");
    assert_eq!(alive.status_code, 200);
    assert!(!alive.is_broken());

    let gone = spider
        .external_link_status(&format!("{}/gone", external_url))
        .expect("gone link was not checked");
    assert_eq!(gone.status_code, 404);
    assert!(gone.is_broken());
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html(r#"<a href="/level3">Level 3</a>"#))
        .expect(0)
        .mount(&mock_server)
        .await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    let summary = spider.crawl(Some(1)).await.expect("Crawl failed");

    let found = distances(&spider);
    assert_eq!(found.len(), 2);
    assert!(found.values().all(|&d| d <= 1));
    assert!(summary.depth_limit_hit);
}

#[tokio::test]
async fn test_failed_page_recorded_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a> <a href="/missing">Missing</a> <a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "Fine").await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    let summary = spider.crawl(None).await.expect("Crawl failed");

    assert_eq!(summary.pages_processed, 4);
    assert_eq!(summary.pages_failed, 2);
    assert_eq!(spider.pages().len(), 2);

    let fetched: HashMap<String, _> = spider.fetched().into_iter().collect();
    let broken = &fetched[&format!("{}/broken", base_url)];
    assert_eq!(broken.status_code, 500);
    assert_eq!(broken.error.as_deref(), Some("HTTP 500"));
    let missing = &fetched[&format!("{}/missing", base_url)];
    assert_eq!(missing.status_code, 404);
}

#[tokio::test]
async fn test_stop_on_fetch_error_aborts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/broken">Broken</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = CrawlerConfig {
        stop_on_fetch_error: true,
        ..test_crawler_config()
    };
    let spider = test_spider(&format!("{}/", base_url), config);
    let err = spider.crawl(None).await.unwrap_err();

    assert!(matches!(err, site_spider::SpiderError::FetchAborted { .. }));
    assert_eq!(spider.pages().len(), 1);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/notes.txt">Notes</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"plain text mentioning <a href="/hidden">a link</a>"#)
                .insert_header("content-type", "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html("Hidden"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let spider = test_spider(&format!("{}/", base_url), test_crawler_config());
    spider.crawl(None).await.expect("Crawl failed");

    let notes = spider
        .page(&format!("{}/notes.txt", base_url))
        .expect("text page should be recorded");
    assert!(notes.links.is_empty());
    assert!(notes.body.starts_with("plain text"));
}

#[tokio::test]
async fn test_seed_path_bounds_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs/",
        r#"<a href="/docs/guide">Guide</a> <a href="/blog/">Blog</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/guide", "Guide").await;
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .respond_with(html("Blog"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let spider = test_spider(&format!("{}/docs/", base_url), test_crawler_config());
    spider.crawl(None).await.expect("Crawl failed");

    assert_eq!(spider.pages().len(), 2);
    assert_eq!(
        spider.skipped(),
        vec![(format!("{}/blog/", base_url), SkipReason::OutsidePath)]
    );
}

#[tokio::test]
async fn test_config_to_markdown_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/about">About</a>"#).await;
    mount_page(&mock_server, "/about", "About us").await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.md");
    let toml = format!(
        r#"
[site]
seed = "{}/"
max-depth = 3

[crawler]
fetch-interval = 0
jitter = 0
workers = 2

[output]
report-path = "{}"
"#,
        base_url,
        report_path.display()
    );
    let config: Config = parse_config(&toml).expect("Failed to parse config");

    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler).unwrap();
    let spider = Spider::from_config(&config, fetcher).unwrap();
    let summary = spider.crawl(config.site.max_depth).await.unwrap();
    assert_eq!(
        summary.to_string(),
        "2 pages were processed; 0 external links linking to 0 external hosts were not processed"
    );

    let report = CrawlReport::from_spider(&spider, &summary, config.site.max_depth);
    let path = config.output.report_path.as_deref().unwrap();
    generate_markdown_report(&report, std::path::Path::new(path)).unwrap();

    let markdown = std::fs::read_to_string(&report_path).unwrap();
    assert!(markdown.contains("# Site-Spider Crawl Report"));
    assert!(markdown.contains(&format!("{}/about", base_url)));
}

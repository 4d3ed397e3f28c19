//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for both the search engine and the
//! news sites, and run days and whole windows end-to-end.

use crate::support::{results_page, strings, HtmlSessionFactory, RewritingFetcher, NEWS_HOST};
use chrono::NaiveDate;
use news_sweep::crawler::{Coordinator, DailyPipeline, InstantPacer, Pacer, SearchSettings};
use news_sweep::output::{read_metadata, read_report, CsvReportWriter, ReportWriter};
use news_sweep::search::{DateWindow, ResilientSearchRunner};
use news_sweep::{KeywordMatcher, SweepError};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 12, d).unwrap()
}

/// The `tbs` value the engine receives for a single-day search
fn tbs(date: NaiveDate) -> String {
    let formatted = date.format("%m/%d/%Y");
    format!("cdr:1,cd_min:{},cd_max:{}", formatted, formatted)
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

async fn mount_articles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/flood-main-street"))
        .respond_with(html(
            "<html><body><h1>Flooding</h1><p>Water reached Main Street.</p></body></html>",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/football"))
        .respond_with(html("<html><body><p>Fortaleza won again.</p></body></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rua-principal"))
        .respond_with(html(
            "<html><body><script>var s = 'main street';</script><p>Nada aqui</p></body></html>",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

fn pipeline(
    factory: HtmlSessionFactory,
    server: &MockServer,
    max_pages: u32,
    max_attempts: u32,
) -> DailyPipeline<HtmlSessionFactory> {
    let pacer: Arc<dyn Pacer> = Arc::new(InstantPacer);
    DailyPipeline::new(
        ResilientSearchRunner::new(factory, pacer),
        Arc::new(RewritingFetcher::new(&server.uri())),
        Arc::new(KeywordMatcher::new(&strings(&["main street"]))),
        SearchSettings {
            required_keywords: strings(&["fortaleza", "flood"]),
            optional_keywords: vec![],
            max_pages,
            max_attempts,
            concurrency: 2,
        },
    )
}

#[tokio::test]
async fn test_single_day_end_to_end() {
    let server = MockServer::start().await;
    mount_articles(&server).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", r#""fortaleza" "flood""#))
        .and(query_param("tbs", tbs(day(31)).as_str()))
        .respond_with(html(results_page(
            &["/flood-main-street", "/football"],
            &[],
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let factory = HtmlSessionFactory::new(&format!("{}/search", server.uri()));
    let mut pipeline = pipeline(factory.clone(), &server, 3, 3);

    let result = pipeline.run_day(day(31)).await.unwrap();
    pipeline.shutdown().await;

    assert_eq!(
        result.urls,
        vec![
            format!("{}/flood-main-street", NEWS_HOST),
            format!("{}/football", NEWS_HOST),
        ]
    );
    assert_eq!(result.match_counts.get("main street"), Some(1));
    assert_eq!(factory.launches(), 1);
}

#[tokio::test]
async fn test_pagination_follows_pager_links() {
    let server = MockServer::start().await;
    mount_articles(&server).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(results_page(
            &["/flood-main-street"],
            &[(2, "/results?start=10"), (3, "/results?start=20")],
            false,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("start", "10"))
        .respond_with(html(results_page(
            &["/rua-principal", "/gone"],
            &[(3, "/results?start=20")],
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Page 3 exists but lies beyond max-pages
    Mock::given(method("GET"))
        .and(path("/results"))
        .and(query_param("start", "20"))
        .respond_with(html(results_page(&["/football"], &[], false)))
        .expect(0)
        .mount(&server)
        .await;

    let factory = HtmlSessionFactory::new(&format!("{}/search", server.uri()));
    let mut pipeline = pipeline(factory, &server, 2, 3);

    let result = pipeline.run_day(day(31)).await.unwrap();

    assert_eq!(result.urls.len(), 3);
    // Script text and 404 bodies never count
    assert_eq!(result.match_counts.get("main street"), Some(1));
}

#[tokio::test]
async fn test_bot_block_exhausts_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html(results_page(
            &["/flood-main-street"],
            &[(2, "/results?start=10")],
            true,
        )))
        .mount(&server)
        .await;

    let factory = HtmlSessionFactory::new(&format!("{}/search", server.uri()));
    let mut pipeline = pipeline(factory.clone(), &server, 3, 3);

    let result = pipeline.run_day(day(31)).await;

    assert!(matches!(
        result,
        Err(SweepError::MaxTrialsReached { attempts: 3, .. })
    ));
    assert_eq!(factory.launches(), 3);
    assert_eq!(factory.navigations().len(), 3);
}

#[tokio::test]
async fn test_window_truncated_and_persisted() {
    let server = MockServer::start().await;
    mount_articles(&server).await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("tbs", tbs(day(1)).as_str()))
        .respond_with(html(results_page(
            &["/flood-main-street", "/football"],
            &[],
            false,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("tbs", tbs(day(2)).as_str()))
        .respond_with(html(results_page(&["/football"], &[], false)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("tbs", tbs(day(3)).as_str()))
        .respond_with(html(results_page(
            &["/flood-main-street"],
            &[(2, "/results?start=10")],
            true,
        )))
        .mount(&server)
        .await;

    let factory = HtmlSessionFactory::new(&format!("{}/search", server.uri()));
    let pacer: Arc<dyn Pacer> = Arc::new(InstantPacer);
    let mut coordinator = Coordinator::new(pipeline(factory.clone(), &server, 2, 2), pacer)
        .with_config_hash("0123abcd");

    let report = coordinator
        .run(DateWindow::new(day(1), day(5)).unwrap())
        .await;

    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.metadata.actual_to, day(2));
    assert_eq!(report.metadata.requested_to, day(5));
    // One session for days 1-2, one restart on day 3
    assert_eq!(factory.launches(), 2);

    let dir = TempDir::new().unwrap();
    let paths = CsvReportWriter::new(dir.path())
        .write_report(&report)
        .unwrap();

    let file_name = paths.csv.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("01-12-2021_02-12-2021_"));
    assert!(file_name.ends_with(".csv"));

    let read = read_report(&paths.csv).unwrap();
    assert_eq!(read.keywords, vec!["main street"]);
    assert_eq!(read.rows.len(), 2);
    assert_eq!(read.rows[0].date, day(1));
    assert_eq!(read.rows[0].url_quantity, 2);
    assert_eq!(read.rows[0].match_counts.get("main street"), Some(1));
    assert_eq!(read.rows[1].date, day(2));
    assert_eq!(read.rows[1].match_counts.get("main street"), Some(0));

    let metadata = read_metadata(&paths.metadata).unwrap();
    assert_eq!(metadata.required_keywords, vec!["fortaleza", "flood"]);
    assert_eq!(metadata.actual_to, day(2));
    assert_eq!(metadata.config_hash.as_deref(), Some("0123abcd"));

    let raw = std::fs::read_to_string(&paths.metadata).unwrap();
    assert!(raw.contains("\"search keywords\""));
    assert!(raw.contains("\"optional search keywords\""));
    assert!(raw.contains("\"content keywords\""));
}

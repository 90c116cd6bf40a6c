//! Tests for the extract module

use super::*;
use crate::config::ApiConfig;
use crate::error::Error;
use crate::http::HttpClient;
use crate::types::StringMap;
use chrono::NaiveDate;
use tempfile::tempdir;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RAW_BODY: &str = r#"{"data":{"2024-02":[{"host":"a"}]}}"#;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn api(server: &MockServer, key: &str) -> ApiConfig {
    ApiConfig {
        url: Url::parse(&format!("{}/report", server.uri())).unwrap(),
        key: key.to_string(),
    }
}

#[tokio::test]
async fn test_fetch_and_save_writes_body_verbatim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report"))
        .and(query_param("report", "earnings"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RAW_BODY))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let destination = dir.path().join("raw/2024-03-15_earnings.json");
    let params = build_earnings_params("2024-02-01", "2024-02-29", None);

    fetch_and_save(
        &HttpClient::new().unwrap(),
        &format!("{}/report", mock_server.uri()),
        &params,
        &StringMap::new(),
        &destination,
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read_to_string(&destination).unwrap(), RAW_BODY);
}

#[tokio::test]
async fn test_fetch_and_save_500_leaves_no_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let destination = dir.path().join("2024-03-15_earnings.json");

    let result = fetch_and_save(
        &HttpClient::new().unwrap(),
        &mock_server.uri(),
        &StringMap::new(),
        &StringMap::new(),
        &destination,
    )
    .await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_fetch_and_save_500_keeps_previous_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let destination = dir.path().join("2024-03-15_earnings.json");
    std::fs::write(&destination, "previous").unwrap();

    let result = fetch_and_save(
        &HttpClient::new().unwrap(),
        &mock_server.uri(),
        &StringMap::new(),
        &StringMap::new(),
        &destination,
    )
    .await;

    assert!(result.unwrap_err().is_transport());
    assert_eq!(std::fs::read_to_string(&destination).unwrap(), "previous");
}

#[tokio::test]
async fn test_fetch_and_save_write_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RAW_BODY))
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    // A directory cannot be overwritten by a file write
    let destination = dir.path().to_path_buf();

    let err = fetch_and_save(
        &HttpClient::new().unwrap(),
        &mock_server.uri(),
        &StringMap::new(),
        &StringMap::new(),
        &destination,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn test_http_fetcher_sends_last_month_and_bearer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report"))
        .and(header("Authorization", "Bearer api-secret"))
        .and(query_param("start", "2024-02-01"))
        .and(query_param("end", "2024-02-29"))
        .and(query_param("breakdown_level", "earnings"))
        .and(query_param("export", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RAW_BODY))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let destination = dir.path().join("raw/report.json");
    let fetcher = HttpReportFetcher::new(
        HttpClient::new().unwrap(),
        api(&mock_server, "api-secret"),
    );

    fetcher.fetch(&destination, run_date()).await.unwrap();
    assert_eq!(std::fs::read_to_string(&destination).unwrap(), RAW_BODY);
}

#[test]
fn test_http_fetcher_extra_params() {
    let mut extra = StringMap::new();
    extra.insert("structure".to_string(), "nested".to_string());

    let fetcher = HttpReportFetcher::new(
        HttpClient::new().unwrap(),
        ApiConfig {
            url: Url::parse("https://api.example.com/report").unwrap(),
            key: "k".to_string(),
        },
    )
    .with_params(extra);

    let params = fetcher.params_for(run_date());
    assert_eq!(params["structure"], "nested");
    assert_eq!(params["start"], "2024-02-01");
}

#[tokio::test]
async fn test_fixture_fetcher_requires_existing_file() {
    let dir = tempdir().unwrap();
    let destination = dir.path().join("raw/2024-03-15_earnings.json");

    let err = FixtureReportFetcher::new()
        .fetch(&destination, run_date())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));

    std::fs::create_dir_all(destination.parent().unwrap()).unwrap();
    std::fs::write(&destination, RAW_BODY).unwrap();
    FixtureReportFetcher::new()
        .fetch(&destination, run_date())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fixture_fetcher_copies_source() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("fixture.json");
    std::fs::write(&source, RAW_BODY).unwrap();
    let destination = dir.path().join("raw/2024-03-15_earnings.json");

    let fetcher = FixtureReportFetcher::from_file(&source);
    assert_eq!(fetcher.name(), "fixture");
    fetcher.fetch(&destination, run_date()).await.unwrap();

    assert_eq!(std::fs::read_to_string(&destination).unwrap(), RAW_BODY);
}

// src/wayback/cdx.rs
// =============================================================================
// This module talks to the Wayback Machine CDX server.
//
// Strategy:
// - Ask the CDX endpoint for captures of a URL, JSON output, capped by limit
// - The first JSON row is a header naming the columns
// - Build archive URLs as <archive_base>/<timestamp>/<original>
// - Rows are read in order; a bad row stops the listing but keeps what came before
//
// The endpoints are configurable so tests can point at a local mock server.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::crawl::user_agent;

pub const DEFAULT_CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";
pub const DEFAULT_ARCHIVE_BASE: &str = "https://web.archive.org/web";

// Archive lookups are slow; give them more room than page fetches
pub const ARCHIVE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("archive request failed: {0}")]
    Request(String),
    #[error("archive returned HTTP {0}")]
    Status(u16),
    #[error("malformed archive response: {0}")]
    Malformed(String),
}

// Result of a snapshot lookup
//
// `urls` holds whatever was collected. If the archive failed part way,
// `error` says why and `urls` keeps the snapshots read before the failure
// (empty when the request itself failed).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotReport {
    pub urls: Vec<String>,
    pub error: Option<ArchiveError>,
}

impl SnapshotReport {
    // A lookup that produced nothing at all
    pub fn failed(error: ArchiveError) -> Self {
        Self {
            urls: Vec::new(),
            error: Some(error),
        }
    }
}

// Something that can list historical snapshot URLs for a page
//
// Implementations return at most `limit` archive URLs, in whatever order
// the index itself uses, along with any error that cut the listing short.
#[async_trait]
pub trait ArchiveIndex {
    async fn snapshot_urls(&self, url: &str, limit: usize) -> SnapshotReport;
}

// CDX server client
#[derive(Debug, Clone)]
pub struct CdxClient {
    client: Client,
    endpoint: String,
    archive_base: String,
}

impl CdxClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()
            .context("Failed to create archive HTTP client")?;

        Ok(Self {
            client,
            endpoint: DEFAULT_CDX_ENDPOINT.to_string(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
        })
    }

    // Points the client at a different CDX server and replay base
    pub fn with_endpoints(mut self, endpoint: &str, archive_base: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self.archive_base = archive_base.trim_end_matches('/').to_string();
        self
    }

    // Fetches the raw listing body
    async fn fetch_listing(&self, url: &str, limit: usize) -> Result<String, ArchiveError> {
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url), ("output", "json"), ("limit", limit_param.as_str())])
            .send()
            .await
            .map_err(|e| ArchiveError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArchiveError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ArchiveError::Request(e.to_string()))
    }
}

#[async_trait]
impl ArchiveIndex for CdxClient {
    async fn snapshot_urls(&self, url: &str, limit: usize) -> SnapshotReport {
        let body = match self.fetch_listing(url, limit).await {
            Ok(body) => body,
            Err(e) => return SnapshotReport::failed(e),
        };

        let mut report = parse_cdx_json(&body, &self.archive_base);
        report.urls.truncate(limit);
        report
    }
}

// Turns a CDX JSON listing into archive URLs
//
// Example body:
//   [["urlkey","timestamp","original",...],
//    ["com,example)/","20200101000000","https://example.com/",...]]
//
// Returns: ["<archive_base>/20200101000000/https://example.com/"]
//
// A row missing a needed column stops the listing: rows before it are kept
// and the report carries a Malformed error.
fn parse_cdx_json(body: &str, archive_base: &str) -> SnapshotReport {
    if body.trim().is_empty() {
        return SnapshotReport::default();
    }

    let rows: Vec<Vec<String>> = match serde_json::from_str(body) {
        Ok(rows) => rows,
        Err(e) => return SnapshotReport::failed(ArchiveError::Malformed(e.to_string())),
    };

    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return SnapshotReport::default();
    };

    let column = |name: &str| {
        header
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ArchiveError::Malformed(format!("missing '{}' column", name)))
    };
    let (timestamp_col, original_col) = match (column("timestamp"), column("original")) {
        (Ok(timestamp), Ok(original)) => (timestamp, original),
        (Err(e), _) | (_, Err(e)) => return SnapshotReport::failed(e),
    };

    let mut report = SnapshotReport::default();
    for row in rows.filter(|row| !row.is_empty()) {
        match (row.get(timestamp_col), row.get(original_col)) {
            (Some(timestamp), Some(original)) => {
                report
                    .urls
                    .push(format!("{}/{}/{}", archive_base, timestamp, original));
            }
            _ => {
                report.error = Some(ArchiveError::Malformed(format!(
                    "row has {} columns, header has {}",
                    row.len(),
                    header.len()
                )));
                break;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};

    const BASE: &str = "https://web.archive.org/web";

    fn is_malformed(report: &SnapshotReport) -> bool {
        matches!(report.error, Some(ArchiveError::Malformed(_)))
    }

    #[test]
    fn test_parse_rows_in_order() {
        let body = r#"[
            ["urlkey","timestamp","original","mimetype","statuscode","digest","length"],
            ["com,example)/","19990101000000","http://example.com/","text/html","200","AAA","100"],
            ["com,example)/","20200101000000","https://example.com/","text/html","200","BBB","200"]
        ]"#;

        let report = parse_cdx_json(body, BASE);

        assert_eq!(
            report.urls,
            vec![
                "https://web.archive.org/web/19990101000000/http://example.com/",
                "https://web.archive.org/web/20200101000000/https://example.com/",
            ]
        );
        assert!(report.error.is_none());
    }

    #[test]
    fn test_columns_found_by_name() {
        let body = r#"[["original","timestamp"],["http://a.com/","20010101000000"]]"#;
        let report = parse_cdx_json(body, BASE);
        assert_eq!(report.urls, vec!["https://web.archive.org/web/20010101000000/http://a.com/"]);
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(parse_cdx_json("", BASE), SnapshotReport::default());
        assert_eq!(parse_cdx_json("  \n", BASE), SnapshotReport::default());
        assert_eq!(parse_cdx_json("[]", BASE), SnapshotReport::default());
    }

    #[test]
    fn test_malformed_body() {
        let report = parse_cdx_json("<html>busy</html>", BASE);
        assert!(report.urls.is_empty());
        assert!(is_malformed(&report));

        let report = parse_cdx_json(r#"[["urlkey","digest"],["x","y"]]"#, BASE);
        assert!(report.urls.is_empty());
        assert!(is_malformed(&report));

        let report = parse_cdx_json(r#"[["timestamp","original"],["2020"]]"#, BASE);
        assert!(report.urls.is_empty());
        assert!(is_malformed(&report));
    }

    #[test]
    fn test_short_row_keeps_earlier_snapshots() {
        let body = r#"[["urlkey","timestamp","original"],
            ["k","2000","http://a.com/"],
            ["k","2001","http://a.com/"],
            ["k"],
            ["k","2002","http://a.com/"]]"#;

        let report = parse_cdx_json(body, BASE);

        assert_eq!(
            report.urls,
            vec![
                "https://web.archive.org/web/2000/http://a.com/",
                "https://web.archive.org/web/2001/http://a.com/",
            ]
        );
        assert_eq!(
            report.error,
            Some(ArchiveError::Malformed(
                "row has 1 columns, header has 3".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_client_queries_cdx_and_truncates() {
        let server = MockServer::start_async().await;
        let body = r#"[["urlkey","timestamp","original"],
            ["k","20000101000000","http://example.com/"],
            ["k","20010101000000","http://example.com/"],
            ["k","20020101000000","http://example.com/"]]"#;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/cdx/search/cdx")
                    .query_param("url", "https://example.com")
                    .query_param("output", "json")
                    .query_param("limit", "2");
                then.status(200).body(body);
            })
            .await;

        let client = CdxClient::new(Duration::from_secs(5))
            .unwrap()
            .with_endpoints(&server.url("/cdx/search/cdx"), &server.url("/web/"));
        let report = client.snapshot_urls("https://example.com", 2).await;

        mock.assert_async().await;
        assert!(report.error.is_none());
        assert_eq!(
            report.urls,
            vec![
                format!("{}/20000101000000/http://example.com/", server.url("/web")),
                format!("{}/20010101000000/http://example.com/", server.url("/web")),
            ]
        );
    }

    #[tokio::test]
    async fn test_client_reports_bad_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cdx");
                then.status(503);
            })
            .await;

        let client = CdxClient::new(Duration::from_secs(5))
            .unwrap()
            .with_endpoints(&server.url("/cdx"), BASE);
        let report = client.snapshot_urls("https://example.com", 10).await;

        assert_eq!(report, SnapshotReport::failed(ArchiveError::Status(503)));
    }

    #[tokio::test]
    async fn test_client_keeps_partial_listing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cdx");
                then.status(200)
                    .body(r#"[["timestamp","original"],["2000","http://a.com/"],["2001"]]"#);
            })
            .await;

        let client = CdxClient::new(Duration::from_secs(5))
            .unwrap()
            .with_endpoints(&server.url("/cdx"), BASE);
        let report = client.snapshot_urls("http://a.com", 10).await;

        assert_eq!(report.urls, vec!["https://web.archive.org/web/2000/http://a.com/"]);
        assert!(is_malformed(&report));
    }
}

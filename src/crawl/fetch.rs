// src/crawl/fetch.rs
// =============================================================================
// This module fetches pages for the crawler.
//
// Key functionality:
// - PageFetcher: the seam between the crawl loop and the network
// - ReqwestFetcher: the real implementation, GET with a per-request timeout
// - FetchError: why a page could not be used (timeout, bad status, network)
//
// Only HTTP 200 counts as success. Anything else becomes a FetchError that
// the crawler records and skips.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

// Default per-request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Why a single page fetch failed
//
// Every variant carries the URL so a list of failures reads on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request did not finish within the timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// Server answered with something other than 200 OK
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// Connection, TLS, redirect or body read failure
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// The URL that failed
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Status { url, .. }
            | FetchError::Network { url, .. } => url,
        }
    }
}

// Anything that can turn a URL into an HTML body
//
// The crawler only talks to this trait, so tests can hand it canned pages.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

// Production fetcher backed by a shared reqwest Client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    // Builds a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| categorize_error(url, e))
    }
}

// User-Agent sent with every request
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

// Maps a reqwest error onto our smaller error type
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        let message = if error.is_redirect() {
            "Too many redirects".to_string()
        } else if error.is_connect() {
            format!("Connection failed: {}", error)
        } else {
            error.to_string()
        };

        FetchError::Network {
            url: url.to_string(),
            message,
        }
    }
}

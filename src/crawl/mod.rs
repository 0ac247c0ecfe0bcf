// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a URL, one level at a time
// - Configurable depth limit and optional page cap
// - One request in flight at a time
// - Per-URL failures are collected, never fatal
// =============================================================================

mod fetch;
mod queue;

pub use fetch::{FetchError, PageFetcher, ReqwestFetcher, DEFAULT_TIMEOUT_SECS};
pub use queue::{crawl, CrawlConfig, DEFAULT_MAX_DEPTH};

pub(crate) use fetch::user_agent;

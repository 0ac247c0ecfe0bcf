// src/wayback/mod.rs
// =============================================================================
// This module collects historical snapshots of the target site.
//
// Currently implements:
// - Listing captures through the Wayback Machine CDX server (cdx.rs)
// - get_snapshots: bounded collection that never fails the run
// =============================================================================

mod cdx;

use tracing::{info, warn};

pub use cdx::{
    ArchiveError, ArchiveIndex, CdxClient, SnapshotReport, ARCHIVE_TIMEOUT_SECS,
    DEFAULT_ARCHIVE_BASE, DEFAULT_CDX_ENDPOINT,
};

// Default number of snapshots to keep
pub const DEFAULT_MAX_SNAPSHOTS: usize = 10;

// Retrieves up to `max_snapshots` archive URLs for `url`, in archive order
//
// Never fails: an archive error is logged and handed back in the report
// next to whatever snapshots were collected before it happened.
pub async fn get_snapshots<A>(index: &A, url: &str, max_snapshots: usize) -> SnapshotReport
where
    A: ArchiveIndex + ?Sized,
{
    info!("Fetching Wayback Machine snapshots for: {}", url);

    if max_snapshots == 0 {
        return SnapshotReport::default();
    }

    let mut report = index.snapshot_urls(url, max_snapshots).await;
    report.urls.truncate(max_snapshots);

    if let Some(e) = &report.error {
        warn!(
            "Error fetching snapshots ({} collected before it): {}",
            report.urls.len(),
            e
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Index that ignores the limit and returns a fixed report
    struct FixedIndex {
        report: SnapshotReport,
        calls: AtomicUsize,
    }

    impl FixedIndex {
        fn new(urls: Vec<String>, error: Option<ArchiveError>) -> Self {
            Self {
                report: SnapshotReport { urls, error },
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArchiveIndex for FixedIndex {
        async fn snapshot_urls(&self, _url: &str, _limit: usize) -> SnapshotReport {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.report.clone()
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://web.archive.org/web/{}/x", i)).collect()
    }

    #[tokio::test]
    async fn test_truncates_in_order() {
        let index = FixedIndex::new(urls(5), None);

        let report = get_snapshots(&index, "https://x.com", 3).await;

        assert_eq!(report.urls, urls(3));
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_fewer_than_max() {
        let index = FixedIndex::new(urls(2), None);
        let report = get_snapshots(&index, "https://x.com", 10).await;
        assert_eq!(report.urls.len(), 2);
    }

    #[tokio::test]
    async fn test_error_is_reported_not_raised() {
        let index = FixedIndex::new(Vec::new(), Some(ArchiveError::Status(500)));

        let report = get_snapshots(&index, "https://x.com", 10).await;

        assert!(report.urls.is_empty());
        assert_eq!(report.error, Some(ArchiveError::Status(500)));
    }

    #[tokio::test]
    async fn test_partial_listing_keeps_snapshots_and_error() {
        let error = ArchiveError::Malformed("row has 1 columns, header has 3".to_string());
        let index = FixedIndex::new(urls(2), Some(error.clone()));

        let report = get_snapshots(&index, "https://x.com", 10).await;

        assert_eq!(report.urls, urls(2));
        assert_eq!(report.error, Some(error));
    }

    #[tokio::test]
    async fn test_zero_max_skips_lookup() {
        let index = FixedIndex::new(urls(3), None);

        let report = get_snapshots(&index, "https://x.com", 0).await;

        assert!(report.urls.is_empty());
        assert_eq!(index.calls.load(Ordering::SeqCst), 0);
    }
}

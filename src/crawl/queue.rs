// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling level by level (breadth-first).
//
// How it works:
// 1. Start with the seed URL as the only frontier entry
// 2. Fetch every frontier URL we haven't visited yet, one at a time
// 3. Extract links and files from each page into the global sets
// 4. Links not yet visited become the next frontier
// 5. Repeat for max_depth levels (or until the frontier runs dry)
//
// There is no same-domain restriction: any http/https link is followed.
// Failed fetches are recorded, never fatal, and the URL is not marked
// visited, so it may be tried again if a later level rediscovers it.
//
// Rust concepts:
// - HashSet: To track visited URLs and collect results (O(1) lookup)
// - BTreeSet: Sorted set for the frontier, so crawl order is repeatable
// - Ownership: CrawlState is moved into each level and moved back out
// =============================================================================

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use super::fetch::{FetchError, PageFetcher};
use crate::extract::{extract_files, extract_links};

// Default number of breadth-first levels
pub const DEFAULT_MAX_DEPTH: usize = 2;

// Knobs for a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Number of levels to crawl (0 = fetch nothing)
    pub max_depth: usize,
    /// Optional cap on successfully fetched pages across the whole crawl
    pub max_pages: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: None,
        }
    }
}

// Everything the crawl knows between levels
//
// `visited` only ever grows. `frontier` is replaced wholesale every level.
#[derive(Debug, Default, Clone)]
pub struct CrawlState {
    pub visited: HashSet<String>,
    pub frontier: BTreeSet<String>,
    pub links: HashSet<String>,
    pub files: HashSet<String>,
    pub failures: Vec<FetchError>,
}

impl CrawlState {
    // Fresh state with only the seed scheduled
    pub fn seeded(seed: &str) -> Self {
        Self {
            frontier: BTreeSet::from([seed.to_string()]),
            ..Self::default()
        }
    }

    fn page_budget_spent(&self, max_pages: Option<usize>) -> bool {
        max_pages.is_some_and(|max| self.visited.len() >= max)
    }

    pub fn into_report(self) -> CrawlReport {
        CrawlReport {
            pages_visited: self.visited.len(),
            links: self.links,
            files: self.files,
            failures: self.failures,
        }
    }
}

// What a finished crawl hands back
#[derive(Debug, Default, Clone)]
pub struct CrawlReport {
    pub links: HashSet<String>,
    pub files: HashSet<String>,
    pub pages_visited: usize,
    pub failures: Vec<FetchError>,
}

// Crawls a website starting from a URL
//
// Parameters:
//   fetcher: where pages come from (real HTTP or a test double)
//   seed: The URL to start crawling from
//   config: depth and page limits
//
// Returns: every link and file URL discovered, plus the fetch failures
//
// Example:
//   max_depth=1: Only fetch the seed page
//   max_depth=2: Fetch the seed + every page it links to
pub async fn crawl<F>(fetcher: &F, seed: &str, config: &CrawlConfig) -> CrawlReport
where
    F: PageFetcher + ?Sized,
{
    let mut state = CrawlState::seeded(seed);

    for depth in 0..config.max_depth {
        if state.frontier.is_empty() {
            debug!("Frontier empty after depth {}, stopping early", depth);
            break;
        }
        info!("Crawling depth {}...", depth + 1);
        state = crawl_level(fetcher, state, config).await;
    }

    state.into_report()
}

// Runs one breadth-first level
//
// Takes ownership of the state, fetches its frontier and returns the state
// with the next frontier installed.
pub async fn crawl_level<F>(fetcher: &F, mut state: CrawlState, config: &CrawlConfig) -> CrawlState
where
    F: PageFetcher + ?Sized,
{
    let frontier = std::mem::take(&mut state.frontier);
    let mut next_frontier = BTreeSet::new();

    for url in frontier {
        if state.visited.contains(&url) {
            continue;
        }
        if state.page_budget_spent(config.max_pages) {
            warn!(
                "Page limit of {} reached, skipping the rest of this level",
                state.visited.len()
            );
            break;
        }

        debug!("Fetching {}", url);
        match fetcher.fetch_page(&url).await {
            Ok(body) => {
                let page_links = extract_links(&url, &body);
                let page_files = extract_files(&url, &body);
                debug!(
                    "{} links and {} files found on {}",
                    page_links.len(),
                    page_files.len(),
                    url
                );

                state.visited.insert(url);
                next_frontier.extend(
                    page_links
                        .iter()
                        .filter(|link| !state.visited.contains(*link))
                        .cloned(),
                );
                state.links.extend(page_links);
                state.files.extend(page_files);
            }
            Err(e) => {
                warn!("Error fetching {}: {}", e.url(), e);
                state.failures.push(e);
            }
        }
    }

    state.frontier = next_frontier;
    state
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why move CrawlState in and out instead of using &mut?
//    - Each level is a plain function from one state to the next
//    - Tests can build any state by hand and run a single level
//    - Nothing global, nothing shared
//
// 2. What is std::mem::take?
//    - Swaps a value out and leaves Default::default() behind
//    - Here it empties state.frontier so we can iterate it by value
//      while still mutating the rest of state
//
// 3. Why can't a URL be fetched twice in one level?
//    - The frontier is a set, so each URL appears once
//    - Across levels, `visited` is checked before every fetch
//
// 4. What does ?Sized mean on F?
//    - It allows F to be a trait object like `dyn PageFetcher`
//    - Without it, only concrete types could be passed
// -----------------------------------------------------------------------------

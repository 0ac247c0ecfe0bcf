// src/analyze.rs
// =============================================================================
// The whole analysis pipeline, start to finish.
//
// What happens here:
// 1. Strip the trailing slash from the target URL
// 2. Work out the output folder from the domain (minus "www.")
// 3. Fetch Wayback snapshots -> <folder>/wayback_snapshots.txt
// 4. Crawl the site
// 5. Save filtered links -> <folder>/links.txt
// 6. Save files -> <folder>/files.txt
//
// Network collaborators come in as traits so the pipeline runs in tests
// without touching the internet.
//
// Rust concepts:
// - Generics with trait bounds: analyze() works with any fetcher/archive
// - The ? operator: file system errors bubble straight up to main
// - Option combinators: ok()?, strip_prefix, unwrap_or
// =============================================================================

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use url::Url;

use crate::crawl::{crawl, CrawlConfig, FetchError, PageFetcher};
use crate::report::save;
use crate::wayback::{get_snapshots, ArchiveError, ArchiveIndex};

// Output file names, all inside the <domain>/ folder
pub const SNAPSHOTS_FILE: &str = "wayback_snapshots.txt";
pub const LINKS_FILE: &str = "links.txt";
pub const FILES_FILE: &str = "files.txt";

// links.txt keeps only links containing one of these...
pub const LINK_INCLUDE: &[&str] = &[".com", ".org"];
// ...and then drops links containing one of these
pub const LINK_EXCLUDE: &[&str] = &["facebook", "twitter"];

// Everything a run needs, already parsed from the command line
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Target site, exactly as given on the command line
    pub url: String,
    /// The `<domain>/` folder is created inside this directory
    pub output_root: PathBuf,
    pub max_snapshots: usize,
    pub crawl: CrawlConfig,
}

// Counts and locations from a finished run
#[derive(Debug, Clone)]
pub struct Summary {
    pub output_dir: PathBuf,
    pub snapshots_saved: usize,
    pub archive_error: Option<ArchiveError>,
    pub pages_crawled: usize,
    pub fetch_failures: usize,
    pub fetch_timeouts: usize,
    pub links_found: usize,
    pub links_saved: usize,
    pub files_found: usize,
    pub files_saved: usize,
}

impl Summary {
    // Prints the human-readable summary to stdout
    //
    // Logs go to stderr, so this stays readable even with RUST_LOG=debug
    pub fn print(&self) {
        println!("Analysis complete!");
        println!("Output saved in folder: {}", self.output_dir.display());
        println!("Wayback snapshots: {} saved.", self.snapshots_saved);
        // A failed lookup still saves whatever came back before the failure
        if let Some(e) = &self.archive_error {
            println!("   (snapshot lookup failed: {})", e);
        }
        println!(
            "Pages crawled: {} ({} failed fetches, {} timed out).",
            self.pages_crawled, self.fetch_failures, self.fetch_timeouts
        );
        // "found" is before the links.txt filters, "saved" is after
        println!(
            "Links: {} found, {} saved after filtering.",
            self.links_found, self.links_saved
        );
        println!(
            "Files: {} found, {} saved.",
            self.files_found, self.files_saved
        );
    }
}

// Extracts the domain name from a URL, dropping a leading "www."
//
// The host keeps the letter case it was typed with (Url::parse would
// lowercase it), and the "www." check is case-sensitive. The port is
// never part of the name.
//
// Example:
//   "https://www.example.com/about" -> Some("example.com")
//   "https://WWW.Example.com"       -> Some("WWW.Example.com")
//   "not a url"                     -> None
pub fn domain_name(url: &str) -> Option<String> {
    // Parse first: this is what decides whether there is a host at all
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    // Prefer the raw spelling, but only if it is the same host
    let typed = typed_host(url)
        .filter(|raw| raw.eq_ignore_ascii_case(host))
        .unwrap_or(host);

    Some(typed.strip_prefix("www.").unwrap_or(typed).to_string())
}

// The host exactly as it appears in the input, without userinfo or port
//
// Example:
//   "https://user@Example.com:8080/a?b" -> Some("Example.com")
fn typed_host(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    // Only a trailing ":<digits>" is a port; "[::1]" keeps its colons
    match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => Some(host),
        _ => Some(host_port),
    }
}

// Runs the snapshot lookup, the crawl and the three file writes
//
// Parameters:
//   fetcher: where pages come from (ReqwestFetcher in main, fakes in tests)
//   archive: where snapshots come from (CdxClient in main)
//   options: URL, limits and output location
//
// Fetch and archive failures are counted in the summary. Only file system
// errors (or a URL without a host) make this return Err.
pub async fn analyze<F, A>(fetcher: &F, archive: &A, options: &AnalyzeOptions) -> Result<Summary>
where
    F: PageFetcher + ?Sized,
    A: ArchiveIndex + ?Sized,
{
    // "https://example.com/" and "https://example.com" are the same target
    let base_url = options.url.trim_end_matches('/');
    let domain =
        domain_name(base_url).ok_or_else(|| anyhow!("URL has no domain: {}", options.url))?;
    let output_dir = options.output_root.join(&domain);

    // Step 1: snapshots, saved unfiltered and in archive order
    let snapshots = get_snapshots(archive, base_url, options.max_snapshots).await;
    let snapshots_saved = save(
        &output_dir.join(SNAPSHOTS_FILE),
        &snapshots.urls,
        None,
        None,
    )?;

    // Step 2: the crawl itself (never fails, failures come back in the report)
    let report = crawl(fetcher, base_url, &options.crawl).await;

    // Step 3: links, sorted for stable output, then filtered by save()
    let links = sorted(report.links.iter());
    let links_saved = save(
        &output_dir.join(LINKS_FILE),
        &links,
        Some(LINK_INCLUDE),
        Some(LINK_EXCLUDE),
    )?;

    // Step 4: files, sorted and unfiltered
    let files = sorted(report.files.iter());
    let files_saved = save(&output_dir.join(FILES_FILE), &files, None, None)?;

    Ok(Summary {
        output_dir,
        snapshots_saved,
        archive_error: snapshots.error,
        pages_crawled: report.pages_visited,
        fetch_failures: report.failures.len(),
        fetch_timeouts: report
            .failures
            .iter()
            .filter(|e| matches!(e, FetchError::Timeout { .. }))
            .count(),
        links_found: report.links.len(),
        links_saved,
        files_found: report.files.len(),
        files_saved,
    })
}

// Borrows the set's strings into a sorted Vec (no cloning)
fn sorted<'a>(items: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut items: Vec<&str> = items.map(String::as_str).collect();
    items.sort_unstable();
    items
}

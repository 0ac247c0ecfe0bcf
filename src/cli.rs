// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   wayback-analyzer <url> [--max-depth N] [--max-snapshots N]
//                          [--timeout SECS] [--max-pages N] [--output-root DIR]
//                          [--cdx-endpoint URL] [--archive-base URL]
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

use crate::crawl::{DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS};
use crate::extract::is_valid_http_url;
use crate::wayback::{DEFAULT_ARCHIVE_BASE, DEFAULT_CDX_ENDPOINT, DEFAULT_MAX_SNAPSHOTS};

// #[derive(Parser)] generates the argument parsing code for this struct
// Each field becomes an argument, and its /// doc comment becomes the help text
#[derive(Parser, Debug)]
#[command(
    name = "wayback-analyzer",
    version,
    about = "Deep analyze a website for files, folders, and historical data",
    long_about = "wayback-analyzer crawls a website breadth-first, collecting every link and \
                  file URL it finds, and lists the site's Wayback Machine snapshots. \
                  Results are written to <domain>/wayback_snapshots.txt, links.txt and files.txt."
)]
pub struct Cli {
    /// Target website URL (e.g., https://example.com)
    ///
    /// Must be an absolute http:// or https:// URL
    // No `long`, so this is a positional argument; bad URLs are rejected here
    #[arg(value_parser = parse_target_url)]
    pub url: String,

    /// Max crawl depth (default: 2)
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    // `long` gives --max-depth (clap converts snake_case to kebab-case)
    // `default_value_t` takes a typed value, so the constant is used directly
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Max Wayback Machine snapshots to retrieve
    #[arg(long, default_value_t = DEFAULT_MAX_SNAPSHOTS)]
    pub max_snapshots: usize,

    /// Per-request timeout for page fetches, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Stop after fetching this many pages (default: no limit)
    // Option<T> makes the flag optional: None when it isn't passed
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Directory in which the <domain>/ output folder is created
    // `default_value` is a string that clap parses like user input
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// CDX server used to list snapshots
    #[arg(long, default_value = DEFAULT_CDX_ENDPOINT)]
    pub cdx_endpoint: String,

    /// Prefix for archive URLs: <archive-base>/<timestamp>/<original>
    #[arg(long, default_value = DEFAULT_ARCHIVE_BASE)]
    pub archive_base: String,
}

// Rejects anything that isn't an absolute http/https URL
//
// clap turns the Err into a usage error and exits non-zero
fn parse_target_url(value: &str) -> Result<String, String> {
    if is_valid_http_url(value) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not an http:// or https:// URL", value))
    }
}

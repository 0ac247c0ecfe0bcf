// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr, RUST_LOG overrides the default "info" level)
// 2. Parse command-line arguments using clap
// 3. Build the real page fetcher and archive client
// 4. Run the analysis pipeline and print the summary
// 5. Exit 0 when the pipeline completes, 2 if it hit a fatal error
//
// Fetch and archive failures are not fatal. Only file system errors are.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod analyze; // src/analyze.rs - the pipeline: snapshots, crawl, output files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - breadth-first crawler and page fetching
mod extract; // src/extract/ - link/file extraction and URL checks
mod report; // src/report.rs - filtering and writing the output files
mod wayback; // src/wayback/ - Wayback Machine snapshot lookup

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use analyze::AnalyzeOptions;
use cli::Cli;
use crawl::{CrawlConfig, ReqwestFetcher};
use wayback::{CdxClient, ARCHIVE_TIMEOUT_SECS};

// #[tokio::main] turns our async main into a regular main that starts
// the tokio runtime and blocks on it.
// flavor = "current_thread": one thread, so one request in flight at a time
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logging first, so client setup problems are visible too
    init_logging();

    // run() returns Result; turn it into a process exit code
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // Only fatal errors (file system, client setup) end up here
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Sends tracing output to stderr, keeping stdout for the summary
//
// RUST_LOG=debug (or any EnvFilter directive) overrides the "info" default
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// The actual program, separated out so errors can use the ? operator
async fn run() -> Result<()> {
    // Cli::parse() exits by itself on --help or bad arguments
    let cli = Cli::parse();

    // Flatten the CLI into the options the pipeline understands

    let options = AnalyzeOptions {
        url: cli.url,
        output_root: cli.output_root,
        max_snapshots: cli.max_snapshots,
        crawl: CrawlConfig {
            max_depth: cli.max_depth,
            max_pages: cli.max_pages,
        },
    };

    // The real network clients; tests swap these for in-memory fakes
    let fetcher = ReqwestFetcher::new(Duration::from_secs(cli.timeout))?;
    let archive = CdxClient::new(Duration::from_secs(ARCHIVE_TIMEOUT_SECS))?
        .with_endpoints(&cli.cdx_endpoint, &cli.archive_base);

    // Only file system errors come back as Err here
    let summary = analyze::analyze(&fetcher, &archive, &options).await?;
    summary.print();

    Ok(())
}

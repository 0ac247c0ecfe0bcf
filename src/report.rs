// src/report.rs
// =============================================================================
// This module writes result lists to text files.
//
// Each file is one item per line, newline-joined, no escaping. Before writing
// we can keep only items containing any "include" substring, then drop items
// containing any "exclude" substring.
//
// The parent directory is created if it doesn't exist. Existing files are
// overwritten. Write failures are returned to the caller.
// =============================================================================

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

// Applies include-then-exclude substring filters
//
// Parameters:
//   items: the strings to filter
//   include: if given (and non-empty), an item must contain one of these
//   exclude: if given (and non-empty), an item must contain none of these
//
// Example:
//   items   = ["http://a.com/x", "http://b.org/y", "http://facebook.com/z"]
//   include = [".com"]
//   exclude = ["facebook"]
//   result  = ["http://a.com/x"]
pub fn filter_items<I, S>(items: I, include: Option<&[&str]>, exclude: Option<&[&str]>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let contains_any = |item: &str, needles: &[&str]| needles.iter().any(|n| item.contains(*n));

    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .filter(|item| match include {
            Some(needles) if !needles.is_empty() => contains_any(item.as_str(), needles),
            _ => true,
        })
        .filter(|item| match exclude {
            Some(needles) if !needles.is_empty() => !contains_any(item.as_str(), needles),
            _ => true,
        })
        .collect()
}

// Filters `items` and writes them to `path`, one per line
//
// Returns: how many items were written
pub fn save<I, S>(
    path: &Path,
    items: I,
    include: Option<&[&str]>,
    exclude: Option<&[&str]>,
) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let lines = filter_items(items, include, exclude);
    fs::write(path, lines.join("\n"))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Saved to {}", path.display());
    Ok(lines.len())
}

// src/extract/mod.rs
// =============================================================================
// URL classification and HTML extraction.
//
// Submodules:
// - classify: is a string a fetchable http/https URL, does a path look like a file
// - html: pulls link and file URLs out of a page
// =============================================================================

mod classify;
mod html;

pub use classify::is_valid_http_url;
pub use html::{extract_files, extract_links};

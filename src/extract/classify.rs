// src/extract/classify.rs
// =============================================================================
// This module decides which URLs we care about.
//
// Two questions get answered here:
// - Is this string an absolute http/https URL we could fetch?
// - Does a URL path look like a downloadable file (pdf, image, script...)?
//
// Both checks are total: a malformed string is simply "no", never an error.
// =============================================================================

use url::Url;

// Path suffixes that mark a URL as a "file" rather than a page.
//
// The trailing "=" is not an extension. It catches paths like
// "/download.php?id=" style endpoints whose path itself ends in '='.
// Keep it exactly as is.
pub const FILE_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".zip", ".jpg", ".png", ".js", ".css", ".php", "=",
];

// Returns true if the string parses as a URL whose scheme is http or https
//
// Examples:
//   "https://example.com/page" -> true
//   "ftp://example.com/file"   -> false
//   "not a url"                -> false
pub fn is_valid_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => is_http_scheme(&parsed),
        Err(_) => false,
    }
}

// Scheme check on an already parsed URL
pub fn is_http_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// Returns true if the given URL *path* ends with one of FILE_EXTENSIONS
//
// Pass only the path component (Url::path()), not the full URL, so that
// query strings never count: "/doc.pdf" matches, "/page" with "?a=b" does not.
pub fn matches_file_extension(path: &str) -> bool {
    FILE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

// src/extract/html.rs
// =============================================================================
// This module pulls URLs out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever, so unclosed tags and junk markup never fail
//
// We also use the `url` crate to:
// - Resolve relative URLs (/p, ../x, //host/path) against the page URL
//
// Two extractors live here:
// - extract_links: every <a href> that resolves to an http/https URL
// - extract_files: <a>, <img>, <script>, <link> URLs whose path looks like a file
//
// Neither does any network I/O.
// =============================================================================

use std::collections::HashSet;

use scraper::{ElementRef, Html};
use url::Url;

use super::classify::{is_http_scheme, matches_file_extension};

// Elements that can reference a file
const FILE_ELEMENTS: &[&str] = &["a", "img", "script", "link"];

// Extracts all hyperlinks from HTML content
//
// Parameters:
//   base: the URL of the page (for resolving relative links)
//   html: the HTML content to parse
//
// Returns: the set of absolute http/https URLs found in <a href>
//
// Example:
//   base = "http://ex.com/a/b"
//   html = "<a href='/p'>P</a>"
//   result = {"http://ex.com/p"}
pub fn extract_links(base: &str, html: &str) -> HashSet<String> {
    let Some(base) = parse_base(base) else {
        return HashSet::new();
    };

    let document = Html::parse_document(html);

    elements(&document)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve(&base, href))
        .map(String::from)
        .collect()
}

// Extracts all file URLs (documents, images, scripts, stylesheets...)
//
// For each candidate element we take href if it is present and non-empty,
// otherwise src. An element carrying both is only looked at once, via href.
pub fn extract_files(base: &str, html: &str) -> HashSet<String> {
    let Some(base) = parse_base(base) else {
        return HashSet::new();
    };

    let document = Html::parse_document(html);

    elements(&document)
        .filter(|element| FILE_ELEMENTS.contains(&element.value().name()))
        .filter_map(|element| {
            let value = element.value();
            value
                .attr("href")
                .filter(|href| !href.is_empty())
                .or_else(|| value.attr("src").filter(|src| !src.is_empty()))
        })
        .filter_map(|reference| resolve(&base, reference))
        .filter(|url| matches_file_extension(url.path()))
        .map(String::from)
        .collect()
}

// Walks every element of the document in tree order
fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.tree.nodes().filter_map(ElementRef::wrap)
}

fn parse_base(base: &str) -> Option<Url> {
    match Url::parse(base) {
        Ok(url) => Some(url),
        Err(e) => {
            // If base URL is invalid, we can't resolve relative links
            tracing::warn!("Invalid base URL {}: {}", base, e);
            None
        }
    }
}

// Resolves a possibly-relative reference against the page URL
//
// Returns None for anything that doesn't end up as http/https
// (mailto:, javascript:, data:, unparseable junk...)
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"            -> Some("https://example.com/docs")
//   href = "//cdn.example/x"  -> Some("https://cdn.example/x")
//   href = "?q=1#top"         -> Some("https://example.com/page?q=1#top")
//   href = "mailto:a@b.c"     -> None
fn resolve(base: &Url, reference: &str) -> Option<Url> {
    base.join(reference).ok().filter(is_http_scheme)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why walk document.tree instead of using CSS selectors?
//    - We need several tag names and a per-element "href else src" rule
//    - ElementRef::wrap turns a tree node into an element (or None for text)
//    - No selector string means nothing to parse and nothing to unwrap
//
// 2. What does base.join() do?
//    - Standard URL resolution, the same thing a browser does
//    - "http://ex.com/a/b" + "/p" = "http://ex.com/p" (not ".../a/b/p")
//    - Absolute references replace the base entirely
//
// 3. Why HashSet<String>?
//    - The same link often appears many times on a page
//    - A set keeps one copy of each exact string
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_relevant_elements() {
        let html = "<html><body><p>Hello</p><div>world</div></body></html>";
        assert!(extract_links("https://example.com", html).is_empty());
        assert!(extract_files("https://example.com", html).is_empty());
    }

    #[test]
    fn test_root_relative_join() {
        let html = r#"<a href="/p">P</a>"#;
        assert_eq!(extract_links("http://ex.com/a/b", html), set(&["http://ex.com/p"]));
    }

    #[test]
    fn test_relative_and_protocol_relative() {
        let html = r#"
            <a href="c">sibling</a>
            <a href="//cdn.ex.com/lib">cdn</a>
            <a href="?q=1#frag">self</a>
        "#;
        let links = extract_links("https://ex.com/a/b", html);
        assert_eq!(
            links,
            set(&[
                "https://ex.com/a/c",
                "https://cdn.ex.com/lib",
                "https://ex.com/a/b?q=1#frag",
            ])
        );
    }

    #[test]
    fn test_skips_non_http_links() {
        let html = r#"
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">JS</a>
            <a href="ftp://files.example.com/a.zip">FTP</a>
        "#;
        assert!(extract_links("https://example.com", html).is_empty());
        assert!(extract_files("https://example.com", html).is_empty());
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let html = r#"<a href="/x">1</a><a href="/x">2</a><a href="https://example.com/x">3</a>"#;
        assert_eq!(extract_links("https://example.com/", html).len(), 1);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="top">Top</a><a href="/ok">ok</a>"#;
        assert_eq!(extract_links("https://example.com", html), set(&["https://example.com/ok"]));
    }

    #[test]
    fn test_files_from_all_element_kinds() {
        let html = r#"
            <link rel="stylesheet" href="/style.css">
            <script src="app.js"></script>
            <img src="https://img.example.com/logo.png">
            <a href="/report.pdf">Report</a>
            <a href="/about">About</a>
        "#;
        let files = extract_files("https://example.com/", html);
        assert_eq!(
            files,
            set(&[
                "https://example.com/style.css",
                "https://example.com/app.js",
                "https://img.example.com/logo.png",
                "https://example.com/report.pdf",
            ])
        );
    }

    #[test]
    fn test_href_wins_over_src() {
        let html = r#"<a href="/page" src="/file.pdf">odd</a>"#;
        assert!(extract_files("https://example.com", html).is_empty());
    }

    #[test]
    fn test_query_does_not_make_a_file() {
        let html = r#"<a href="/export?format=pdf">x</a><a href="/doc.pdf?x=1">y</a>"#;
        assert_eq!(
            extract_files("http://x.com", html),
            set(&["http://x.com/doc.pdf?x=1"])
        );
    }

    #[test]
    fn test_broken_markup_is_tolerated() {
        let html = r#"<div><a href="/one">one<p><img src="/pic.jpg"></div></span><a href"#;
        let links = extract_links("https://example.com", html);
        assert!(links.contains("https://example.com/one"));
        assert!(extract_files("https://example.com", html).contains("https://example.com/pic.jpg"));
    }

    #[test]
    fn test_invalid_base_yields_nothing() {
        let html = r#"<a href="/p">P</a>"#;
        assert!(extract_links("not a url", html).is_empty());
    }
}

// src/checker/html.rs
// =============================================================================
// This module extracts outbound links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM with html5ever
// - Recovers from malformed markup the same way browsers do
// - Supports CSS selectors for finding elements
//
// Only absolute http(s) links are kept. Relative paths, fragments, mailto:,
// javascript: and friends are dropped on purpose: the verifier should only
// probe links that can be dereferenced on their own.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Every element that carries an href, not just <a>
const HREF_SELECTOR: &str = "[href]";

// Extracts all absolute links from HTML content
//
// Returns the raw attribute values (trimmed) in document order. Duplicates are
// kept; each occurrence is verified on its own.
//
// Example:
//   html = "<a href='https://rust-lang.org'>Rust</a><a href='/docs'>Docs</a>"
//   result = ["https://rust-lang.org"]
pub fn extract_html_links(html: &str) -> Vec<String> {
    let selector = match Selector::parse(HREF_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_absolute_http(href))
        .map(str::to_string)
        .collect()
}

// Checks that a link is an absolute http:// or https:// URL
//
// Url::parse fails for relative references, so "/docs" and "#top" are out.
// Scheme comparison is case-insensitive because Url lowercases it.
pub(crate) fn is_absolute_http(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

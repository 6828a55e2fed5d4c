// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown source pages.
//
// Some source URLs point at raw Markdown (a README served as text/markdown,
// for example). Running those through the HTML parser would find nothing, so
// they go through `pulldown-cmark` instead, a streaming CommonMark parser.
// =============================================================================

use super::html::is_absolute_http;
use pulldown_cmark::{Event, Parser, Tag};

// Extracts all absolute HTTP/HTTPS links from Markdown text
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   vec!["https://www.rust-lang.org"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    Parser::new(markdown)
        .filter_map(|event| match event {
            // pulldown-cmark 0.9: Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_link_type, dest_url, _title)) => Some(dest_url.to_string()),
            _ => None,
        })
        .filter(|url| is_absolute_http(url))
        .collect()
}

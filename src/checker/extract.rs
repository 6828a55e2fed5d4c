// src/checker/extract.rs
// =============================================================================
// Picks the right link extractor for a fetched page.
// =============================================================================

use super::html::extract_html_links;
use super::markdown::extract_markdown_links;
use url::Url;

/// How a page body should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    #[default]
    Html,
    Markdown,
}

impl PageKind {
    // Content-Type wins when it says something useful; otherwise fall back to
    // the URL's file extension, and finally to HTML.
    pub fn detect(url: &str, content_type: Option<&str>) -> Self {
        let content_type = content_type.map(str::to_ascii_lowercase);

        match content_type.as_deref() {
            Some(ct) if ct.contains("markdown") => return PageKind::Markdown,
            Some(ct) if ct.contains("html") => return PageKind::Html,
            _ => {}
        }

        let has_markdown_extension = Url::parse(url)
            .map(|u| {
                let path = u.path().to_ascii_lowercase();
                path.ends_with(".md") || path.ends_with(".markdown")
            })
            .unwrap_or(false);

        if has_markdown_extension {
            PageKind::Markdown
        } else {
            PageKind::Html
        }
    }
}

/// Returns the absolute outbound links of `body`, in document order.
pub fn extract_links(body: &str, kind: PageKind) -> Vec<String> {
    match kind {
        PageKind::Html => extract_html_links(body),
        PageKind::Markdown => extract_markdown_links(body),
    }
}

// src/checker/fetch.rs
// =============================================================================
// This module fetches source pages.
//
// One GET per source URL, bounded by a timeout, no retries. Failures are
// captured as PageFetchResult::Err so the caller never has to handle an error
// path: a page that can't be fetched simply becomes an error row.
// =============================================================================

use super::extract::PageKind;
use super::http::HttpClient;
use std::time::Duration;
use tracing::debug;

/// Outcome of fetching one source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetchResult {
    Ok {
        body: String,
        status: u16,
        kind: PageKind,
    },
    Err {
        message: String,
        status: Option<u16>,
    },
}

// Fetches a source page and returns its body or a captured failure
pub async fn fetch_page(client: &dyn HttpClient, url: &str, timeout: Duration) -> PageFetchResult {
    match client.get(url, timeout).await {
        Ok(response) => {
            debug!(url, status = response.status, bytes = response.body.len(), "fetched page");
            let kind = PageKind::detect(url, response.content_type.as_deref());
            PageFetchResult::Ok {
                body: response.body,
                status: response.status,
                kind,
            }
        }
        Err(error) => {
            debug!(url, %error, "page fetch failed");
            PageFetchResult::Err {
                status: error.status(),
                message: error.message,
            }
        }
    }
}

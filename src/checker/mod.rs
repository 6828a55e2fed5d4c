// src/checker/mod.rs
// =============================================================================
// Everything that touches a single page or a single link.
//
// Submodules:
// - http: the HttpClient trait and its reqwest implementation
// - fetch: Page Fetcher (GET a source page)
// - extract / html / markdown: Link Extractor
// - verify: Link Verifier (HEAD probe + classification)
// =============================================================================

mod extract;
mod fetch;
mod html;
mod http;
mod markdown;
mod verify;

#[cfg(test)]
pub(crate) mod mock;

pub use extract::extract_links;
pub use fetch::{fetch_page, PageFetchResult};
pub use http::{HttpClient, HttpError, HttpResponse, ReqwestClient};
pub use verify::{verify_link, LinkOutcome, BROKEN_MESSAGE, REDIRECT_MESSAGE};

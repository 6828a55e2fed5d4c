// src/crawl/mod.rs
// =============================================================================
// The verification pass over a list of source URLs.
//
// This is a single hop: each source page is fetched, its links are probed,
// and nothing found on a page is crawled further.
// =============================================================================

mod pipeline;

pub use pipeline::{Pipeline, SourceReport, SourceState, VerifiedLink};

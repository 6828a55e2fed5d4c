// src/crawl/pipeline.rs
// =============================================================================
// This module drives the whole verification pass.
//
// How it works:
// 1. Fetch every source page concurrently and wait for all of them
// 2. Extract the outbound links of each page that was fetched
// 3. Probe every extracted link (across all pages) concurrently and wait
// 4. Merge: put every outcome back under the page it came from
//
// Both fan-out stages go through the same bounded pool (fan_out) and restore
// input order by index afterwards. Completion order never leaks into the
// result, and no task writes to shared state: each returns its own value and
// the merge happens on one task once everything is in.
//
// Optional dedupe: when enabled, each distinct link (after normalization) is
// probed once and its outcome is copied to every occurrence.
// =============================================================================

use crate::checker::{
    extract_links, fetch_page, verify_link, HttpClient, LinkOutcome, PageFetchResult,
};
use crate::config::CheckerConfig;
use crate::report::{self, ReportRow};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// A link found on a source page and what probing it showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedLink {
    pub link: String,
    pub outcome: LinkOutcome,
}

/// Where a source URL ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// The page couldn't be fetched; nothing was extracted or probed.
    FetchFailed { message: String, status: Option<u16> },
    /// The page was fetched and every link on it was probed.
    Verified { status: u16, links: Vec<VerifiedLink> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub url: String,
    pub state: SourceState,
}

// Per-source state between extraction and verification
enum Extracted {
    Failed { message: String, status: Option<u16> },
    Page { status: u16, links: Vec<String> },
}

pub struct Pipeline {
    client: Arc<dyn HttpClient>,
    config: CheckerConfig,
}

impl Pipeline {
    pub fn new(client: Arc<dyn HttpClient>, config: CheckerConfig) -> Self {
        Self { client, config }
    }

    /// Runs the full pass and shapes the result into report rows.
    ///
    /// Rows follow the order of `urls`; within a source, problem rows follow
    /// the order the links appeared on the page.
    pub async fn run(&self, urls: &[String]) -> Vec<ReportRow> {
        let sources = self.verify_sources(urls).await;
        report::assemble(&sources)
    }

    pub async fn verify_sources(&self, urls: &[String]) -> Vec<SourceReport> {
        info!(sources = urls.len(), "fetching source pages");
        let pages = self.fetch_all(urls).await;

        let mut extracted = Vec::with_capacity(pages.len());
        for (url, page) in urls.iter().zip(pages) {
            extracted.push(match page {
                PageFetchResult::Ok { body, status, kind } => Extracted::Page {
                    status,
                    links: extract_contained(url, move || extract_links(&body, kind)).await,
                },
                PageFetchResult::Err { message, status } => Extracted::Failed { message, status },
            });
        }

        let candidates: Vec<String> = extracted
            .iter()
            .flat_map(|source| match source {
                Extracted::Page { links, .. } => links.as_slice(),
                Extracted::Failed { .. } => &[][..],
            })
            .cloned()
            .collect();

        info!(links = candidates.len(), "verifying links");
        let mut outcomes = self.verify_all(candidates).await.into_iter();

        urls.iter()
            .zip(extracted)
            .map(|(url, source)| {
                let state = match source {
                    Extracted::Failed { message, status } => {
                        SourceState::FetchFailed { message, status }
                    }
                    // Outcomes come back in candidate order, so each page
                    // takes the next links.len() of them. zip stops pulling
                    // from `outcomes` once `links` runs out.
                    Extracted::Page { status, links } => SourceState::Verified {
                        status,
                        links: links
                            .into_iter()
                            .zip(outcomes.by_ref())
                            .map(|(link, outcome)| VerifiedLink { link, outcome })
                            .collect(),
                    },
                };

                SourceReport {
                    url: url.clone(),
                    state,
                }
            })
            .collect()
    }

    async fn fetch_all(&self, urls: &[String]) -> Vec<PageFetchResult> {
        let timeout = self.config.fetch_timeout();
        let client = Arc::clone(&self.client);

        fan_out(urls.to_vec(), self.config.worker_limit(), |url| {
            let client = Arc::clone(&client);
            async move { fetch_page(client.as_ref(), &url, timeout).await }
        })
        .await
    }

    async fn verify_all(&self, links: Vec<String>) -> Vec<LinkOutcome> {
        if !self.config.dedupe {
            return self.probe_each(links).await;
        }

        // slot[i] = index into `distinct` for the i-th occurrence
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut distinct: Vec<String> = Vec::new();
        let slots: Vec<usize> = links
            .into_iter()
            .map(|link| {
                *seen.entry(normalize_link(&link)).or_insert_with(|| {
                    distinct.push(link);
                    distinct.len() - 1
                })
            })
            .collect();

        info!(occurrences = slots.len(), distinct = distinct.len(), "deduplicated links");

        let outcomes = self.probe_each(distinct).await;
        slots.into_iter().map(|slot| outcomes[slot].clone()).collect()
    }

    async fn probe_each(&self, links: Vec<String>) -> Vec<LinkOutcome> {
        let timeout = self.config.probe_timeout();
        let client = Arc::clone(&self.client);

        fan_out(links, self.config.worker_limit(), |link| {
            let client = Arc::clone(&client);
            async move { verify_link(client.as_ref(), &link, timeout).await }
        })
        .await
    }
}

// Runs `task` over `items` with at most `limit` in flight and returns the
// results in input order.
//
// The futures are built up front (they don't start until polled), so the
// stream owns them outright instead of borrowing `task`.
async fn fan_out<T, R, F, Fut>(items: Vec<T>, limit: usize, task: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let pending: Vec<_> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let work = task(item);
            async move { (index, work.await) }
        })
        .collect();

    let mut finished: Vec<(usize, R)> = stream::iter(pending)
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    finished.sort_unstable_by_key(|(index, _)| *index);
    finished.into_iter().map(|(_, result)| result).collect()
}

// Runs an extraction job off the async workers. If it panics the page is
// treated as having no links instead of failing the batch.
async fn extract_contained<F>(url: &str, job: F) -> Vec<String>
where
    F: FnOnce() -> Vec<String> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(links) => {
            debug!(url, links = links.len(), "extracted links");
            links
        }
        Err(error) => {
            warn!(url, %error, "link extraction failed, treating page as having no links");
            Vec::new()
        }
    }
}

// Dedupe key: parsed and re-serialized (lowercase scheme/host, default port
// dropped), without the fragment since it never reaches the server.
fn normalize_link(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => link.to_string(),
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why buffer_unordered + sort instead of buffered?
//    - buffered() would also keep order, but holds finished results behind a
//      slow head-of-line item. Sorting by index after the barrier is the
//      deterministic merge and keeps every worker slot busy.
//
// 2. Why spawn_blocking for extraction?
//    - html5ever parsing is CPU work; keeping it off the async workers lets
//      other fetches make progress. The JoinError also gives us panic
//      containment for free.
// -----------------------------------------------------------------------------

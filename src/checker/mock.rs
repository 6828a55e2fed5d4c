// src/checker/mock.rs
// =============================================================================
// In-memory HttpClient for tests.
//
// Routes are registered per URL for pages (GET) and probes (HEAD). A route can
// carry a delay so tests can make completion order differ from input order.
// A delay longer than the request timeout fails the request the way a real
// client times out. Unrouted URLs fail like an unreachable host.
// =============================================================================

use super::http::{HttpClient, HttpError, HttpResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Route {
    result: Result<HttpResponse, HttpError>,
    delay: Duration,
}

#[derive(Debug, Default)]
pub struct MockHttpClient {
    pages: HashMap<String, Route>,
    probes: HashMap<String, Route>,
    probe_calls: AtomicUsize,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` as an HTML page with the given status.
    pub fn page(self, url: &str, status: u16, body: &str) -> Self {
        self.page_with_type(url, status, "text/html; charset=utf-8", body)
    }

    pub fn page_with_type(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        let response = HttpResponse {
            status,
            location: None,
            content_type: Some(content_type.to_string()),
            body: body.to_string(),
        };
        self.pages.insert(url.to_string(), Route::ok(response));
        self
    }

    pub fn page_error(mut self, url: &str, message: &str, status: Option<u16>) -> Self {
        let error = match status {
            Some(status) => HttpError::with_response(message, HttpResponse::with_status(status)),
            None => HttpError::new(message),
        };
        self.pages.insert(url.to_string(), Route::err(error));
        self
    }

    pub fn probe(mut self, url: &str, status: u16) -> Self {
        self.probes
            .insert(url.to_string(), Route::ok(HttpResponse::with_status(status)));
        self
    }

    pub fn probe_redirect(mut self, url: &str, status: u16, location: Option<&str>) -> Self {
        let response = HttpResponse {
            status,
            location: location.map(str::to_string),
            ..HttpResponse::default()
        };
        self.probes.insert(url.to_string(), Route::ok(response));
        self
    }

    pub fn probe_error(mut self, url: &str, error: HttpError) -> Self {
        self.probes.insert(url.to_string(), Route::err(error));
        self
    }

    /// Delays whichever routes exist for `url`.
    pub fn delay(mut self, url: &str, millis: u64) -> Self {
        let delay = Duration::from_millis(millis);
        for routes in [&mut self.pages, &mut self.probes] {
            if let Some(route) = routes.get_mut(url) {
                route.delay = delay;
            }
        }
        self
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

impl Route {
    fn ok(response: HttpResponse) -> Self {
        Self {
            result: Ok(response),
            delay: Duration::ZERO,
        }
    }

    fn err(error: HttpError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    async fn serve(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        if !self.delay.is_zero() {
            tokio::time::timeout(timeout, tokio::time::sleep(self.delay))
                .await
                .map_err(|_| HttpError::new(format!("error sending request for url ({url}): operation timed out")))?;
        }
        self.result.clone()
    }
}

fn unreachable(url: &str) -> HttpError {
    HttpError::new(format!("getaddrinfo ENOTFOUND {url}"))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        match self.pages.get(url) {
            Some(route) => route.serve(url, timeout).await,
            None => Err(unreachable(url)),
        }
    }

    async fn probe(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        match self.probes.get(url) {
            Some(route) => route.serve(url, timeout).await,
            None => Err(unreachable(url)),
        }
    }
}

// src/checker/http.rs
// =============================================================================
// The HTTP capability the pipeline depends on.
//
// The fetcher and verifier never talk to reqwest directly. They go through the
// HttpClient trait, which only promises:
// - a GET that follows redirects and reports non-2xx as an error
// - a HEAD probe that does NOT follow redirects
// - per-request timeouts
// - access to the status code and the Location / Content-Type headers
//
// ReqwestClient is the real implementation. Tests plug in checker::mock.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::{redirect, Client};
use std::time::Duration;
use thiserror::Error;

// Redirect hops a page fetch will follow before giving up
const MAX_PAGE_REDIRECTS: usize = 10;

/// What the pipeline needs to know about a response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// A response with only a status code.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

/// A failed request, optionally carrying the response it failed on.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpError {
    pub message: String,
    pub response: Option<HttpResponse>,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(message: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        // reqwest only exposes a status on errors built from a response
        let response = error.status().map(|s| HttpResponse::with_status(s.as_u16()));
        Self {
            message: error.to_string(),
            response,
        }
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url`, following redirects. Non-2xx statuses come back as `Err`.
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError>;

    /// HEAD `url` with redirect-following disabled. Any status is `Ok`.
    async fn probe(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError>;
}

// Production client backed by reqwest
//
// Two reqwest clients are kept because the redirect policy is fixed when a
// client is built, not per request. Both share the same User-Agent.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    pages: Client,
    probes: Client,
}

impl ReqwestClient {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let pages = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_PAGE_REDIRECTS))
            .build()?;

        let probes = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { pages, probes })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        let response = self.pages.get(url).timeout(timeout).send().await?;

        let status = response.status();
        let location = header_value(response.headers(), LOCATION);
        let content_type = header_value(response.headers(), CONTENT_TYPE);

        if !status.is_success() {
            return Err(HttpError::with_response(
                format!("Request failed with status code {}", status.as_u16()),
                HttpResponse {
                    status: status.as_u16(),
                    location,
                    content_type,
                    body: String::new(),
                },
            ));
        }

        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            location,
            content_type,
            body,
        })
    }

    async fn probe(&self, url: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
        let response = self.probes.head(url).timeout(timeout).send().await?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
            location: header_value(response.headers(), LOCATION),
            content_type: header_value(response.headers(), CONTENT_TYPE),
            body: String::new(),
        })
    }
}

// Reads a header as a string, ignoring values that aren't valid UTF-8
fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{fetch_page, verify_link, LinkOutcome, PageFetchResult};
    use reqwest::header::HeaderValue;
    use std::net::SocketAddr;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_secs(5);

    // Local HTTP/1.1 server: one request per connection, answered by
    // `respond(path)` and then closed.
    async fn serve(respond: fn(&str) -> String) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => read += n,
                        }
                        if read == buf.len() {
                            return;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let _ = socket.write_all(respond(&path).as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        addr
    }

    // Accepts connections and never answers
    async fn serve_nothing() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        addr
    }

    fn response(status_line: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\n{headers}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn moved_site(path: &str) -> String {
        match path {
            "/old" => response("301 Moved Permanently", "Location: /new\r\n", ""),
            "/new" => response(
                "200 OK",
                "Content-Type: text/html\r\n",
                r#"<a href="http://b.test/">b</a>"#,
            ),
            _ => response("404 Not Found", "", ""),
        }
    }

    fn client() -> ReqwestClient {
        ReqwestClient::new("link-sentinel/test").unwrap()
    }

    #[tokio::test]
    async fn test_probe_reports_redirect_instead_of_following_it() {
        let addr = serve(moved_site).await;

        let outcome = verify_link(&client(), &format!("http://{addr}/old"), TIMEOUT).await;

        assert_eq!(
            outcome,
            LinkOutcome::Redirect {
                status: 301,
                location: Some("/new".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_get_follows_redirects() {
        let addr = serve(moved_site).await;

        let response = client().get(&format!("http://{addr}/old"), TIMEOUT).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("text/html"));
        assert!(response.body.contains("http://b.test/"));
    }

    #[tokio::test]
    async fn test_get_reports_non_success_as_error() {
        let addr = serve(moved_site).await;

        let error = client()
            .get(&format!("http://{addr}/missing"), TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(404));
        assert_eq!(error.message, "Request failed with status code 404");
    }

    #[tokio::test]
    async fn test_probe_timeout_is_unreachable() {
        let addr = serve_nothing().await;

        let started = Instant::now();
        let outcome = verify_link(&client(), &format!("http://{addr}/"), Duration::from_millis(300)).await;

        assert!(started.elapsed() < Duration::from_secs(3));
        match outcome {
            LinkOutcome::Unreachable { message, status } => {
                assert!(message.contains("timed out"), "{message}");
                assert_eq!(status, None);
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_fetch_timeout_is_captured() {
        let addr = serve_nothing().await;

        let result = fetch_page(&client(), &format!("http://{addr}/"), Duration::from_millis(300)).await;

        assert!(matches!(result, PageFetchResult::Err { status: None, .. }));
    }

    #[test]
    fn test_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static("http://b.test/y"));

        assert_eq!(
            header_value(&headers, LOCATION),
            Some("http://b.test/y".to_string())
        );
        assert_eq!(header_value(&headers, CONTENT_TYPE), None);
    }

    #[test]
    fn test_error_status() {
        let bare = HttpError::new("connection refused");
        assert_eq!(bare.status(), None);
        assert_eq!(bare.to_string(), "connection refused");

        let with_response = HttpError::with_response("moved", HttpResponse::with_status(301));
        assert_eq!(with_response.status(), Some(301));
    }

    #[test]
    fn test_client_builds() {
        assert!(ReqwestClient::new("link-sentinel/test").is_ok());
    }
}

// src/checker/verify.rs
// =============================================================================
// This module decides whether a single link is healthy.
//
// Key functionality:
// - Sends one HEAD probe with redirect-following turned off
// - Classifies the status: 301/302 are redirects, >= 400 is broken
// - Converts transport failures into an Unreachable outcome
//
// There are no retries. One probe per link, one outcome per probe.
// =============================================================================

use super::http::{HttpClient, HttpError, HttpResponse};
use std::time::Duration;
use tracing::debug;

pub const REDIRECT_MESSAGE: &str = "Redirecting to a different URL";
pub const BROKEN_MESSAGE: &str = "Broken link";

/// Classification of one probed link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// 2xx, or a 3xx other than 301/302
    Healthy,
    /// 301 or 302, with the Location header if the server sent one
    Redirect {
        status: u16,
        location: Option<String>,
    },
    /// Any status >= 400
    ClientOrServerError { status: u16 },
    /// The probe failed without a response we could classify
    Unreachable {
        message: String,
        status: Option<u16>,
    },
}

impl LinkOutcome {
    /// Everything except `Healthy` ends up in the report.
    pub fn is_problem(&self) -> bool {
        !matches!(self, LinkOutcome::Healthy)
    }
}

// Probes a single link and classifies the result
//
// The HttpClient contract says probe() never follows redirects, so a
// Redirect outcome always reflects the first hop the server answered with.
pub async fn verify_link(client: &dyn HttpClient, link: &str, timeout: Duration) -> LinkOutcome {
    let outcome = match client.probe(link, timeout).await {
        Ok(response) => classify_response(&response),
        Err(error) => classify_error(error),
    };

    debug!(link, ?outcome, "probed link");
    outcome
}

fn classify_response(response: &HttpResponse) -> LinkOutcome {
    match response.status {
        301 | 302 => LinkOutcome::Redirect {
            status: response.status,
            location: response.location.clone(),
        },
        status if status >= 400 => LinkOutcome::ClientOrServerError { status },
        _ => LinkOutcome::Healthy,
    }
}

// Some clients raise an error for a response they didn't like instead of
// returning it. When the error still carries that response we run it through
// the same rules, so a 301 or 302 is a Redirect on either path.
fn classify_error(error: HttpError) -> LinkOutcome {
    let HttpError { message, response } = error;

    match response {
        Some(response) => match classify_response(&response) {
            LinkOutcome::Healthy => LinkOutcome::Unreachable {
                message,
                status: Some(response.status),
            },
            outcome => outcome,
        },
        None => LinkOutcome::Unreachable {
            message,
            status: None,
        },
    }
}

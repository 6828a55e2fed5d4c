// src/errors.rs
// =============================================================================
// Top-level failures of a check request.
//
// Only two things can fail a whole request:
// - the input could not be turned into a list of source URLs (400)
// - something escaped per-row containment (500)
//
// Everything that goes wrong for a single page or link is recorded as data in
// the report instead (see checker::PageFetchResult and checker::LinkOutcome).
// =============================================================================

use thiserror::Error;

/// A failure of the entire check request.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Missing or unparseable input.
    #[error("Invalid input: {0}")]
    Input(String),

    /// An unexpected failure; no partial results are returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckError {
    /// HTTP-equivalent status for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::Input(_) => 400,
            CheckError::Internal(_) => 500,
        }
    }
}

// src/report.rs
// =============================================================================
// Turns per-source results into report rows, and rows into an export.
//
// Row rules:
// - fetch failed           -> one row: Error = fetch message, no BrokenLink
// - fetched, no problems   -> one clean row with the page's status
// - fetched, with problems -> one row per problem link, in discovery order
//
// Absent values are written as the literal "None" when serialized, and a
// status of "No Response" means the request never got an answer.
// =============================================================================

use crate::checker::{LinkOutcome, BROKEN_MESSAGE, REDIRECT_MESSAGE};
use crate::crawl::{SourceReport, SourceState, VerifiedLink};
use serde::{Serialize, Serializer};
use std::fmt;

pub const ABSENT: &str = "None";
pub const NO_RESPONSE: &str = "No Response";

const COLUMNS: [&str; 5] = ["URL", "BrokenLink", "Status", "Error", "RedirectTo"];

/// HTTP status of a row, or the marker for "no response at all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Code(u16),
    NoResponse,
}

impl From<Option<u16>> for RowStatus {
    fn from(status: Option<u16>) -> Self {
        status.map_or(RowStatus::NoResponse, RowStatus::Code)
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Code(code) => write!(f, "{code}"),
            RowStatus::NoResponse => f.write_str(NO_RESPONSE),
        }
    }
}

// Numbers stay numbers in JSON; only the marker is a string
impl Serialize for RowStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowStatus::Code(code) => serializer.serialize_u16(*code),
            RowStatus::NoResponse => serializer.serialize_str(NO_RESPONSE),
        }
    }
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "BrokenLink", serialize_with = "absent_as_marker")]
    pub broken_link: Option<String>,
    #[serde(rename = "Status")]
    pub status: RowStatus,
    #[serde(rename = "Error", serialize_with = "absent_as_marker")]
    pub error: Option<String>,
    #[serde(rename = "RedirectTo", serialize_with = "absent_as_marker")]
    pub redirect_to: Option<String>,
}

fn absent_as_marker<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(ABSENT))
}

impl ReportRow {
    pub fn clean(url: &str, status: u16) -> Self {
        Self {
            url: url.to_string(),
            broken_link: None,
            status: RowStatus::Code(status),
            error: None,
            redirect_to: None,
        }
    }

    pub fn fetch_failed(url: &str, message: &str, status: Option<u16>) -> Self {
        Self {
            url: url.to_string(),
            broken_link: None,
            status: status.into(),
            error: Some(message.to_string()),
            redirect_to: None,
        }
    }

    // Returns None for healthy links
    pub fn problem(url: &str, verified: &VerifiedLink) -> Option<Self> {
        let (status, error, redirect_to) = match &verified.outcome {
            LinkOutcome::Healthy => return None,
            LinkOutcome::Redirect { status, location } => (
                RowStatus::Code(*status),
                REDIRECT_MESSAGE.to_string(),
                location.clone(),
            ),
            LinkOutcome::ClientOrServerError { status } => {
                (RowStatus::Code(*status), BROKEN_MESSAGE.to_string(), None)
            }
            LinkOutcome::Unreachable { message, status } => ((*status).into(), message.clone(), None),
        };

        Some(Self {
            url: url.to_string(),
            broken_link: Some(verified.link.clone()),
            status,
            error: Some(error),
            redirect_to,
        })
    }

    /// True for every row except a clean one.
    pub fn is_problem(&self) -> bool {
        self.error.is_some()
    }

    fn cells(&self) -> [String; 5] {
        let or_absent = |value: &Option<String>| value.clone().unwrap_or_else(|| ABSENT.to_string());
        [
            self.url.clone(),
            or_absent(&self.broken_link),
            self.status.to_string(),
            or_absent(&self.error),
            or_absent(&self.redirect_to),
        ]
    }
}

/// Flattens source results into rows, keeping source order.
pub fn assemble(sources: &[SourceReport]) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for source in sources {
        match &source.state {
            SourceState::FetchFailed { message, status } => {
                rows.push(ReportRow::fetch_failed(&source.url, message, *status));
            }
            SourceState::Verified { status, links } => {
                let before = rows.len();
                rows.extend(links.iter().filter_map(|link| ReportRow::problem(&source.url, link)));
                if rows.len() == before {
                    rows.push(ReportRow::clean(&source.url, *status));
                }
            }
        }
    }

    rows
}

// Serializes rows as tab-separated text with a header line
//
// Tabs and line breaks inside values are flattened to spaces so every row
// stays on one line.
pub fn export_tsv(rows: &[ReportRow]) -> String {
    let mut out = COLUMNS.join("\t");
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|cell| flatten(cell)).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }

    out
}

fn flatten(cell: &str) -> String {
    cell.replace(['\t', '\r', '\n'], " ")
}

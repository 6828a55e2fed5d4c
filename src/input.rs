// src/input.rs
// =============================================================================
// Reads source records and pulls out the URL list.
//
// Records are JSON objects with a "URL" field. Any other fields are ignored,
// so an exported spreadsheet with extra columns works as-is.
// =============================================================================

use crate::errors::CheckError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

pub fn parse_records(json: &str) -> Result<Vec<SourceRecord>, CheckError> {
    serde_json::from_str(json)
        .map_err(|e| CheckError::Input(format!("expected a JSON array of records: {e}")))
}

pub fn read_records(path: &Path) -> Result<Vec<SourceRecord>, CheckError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CheckError::Input(format!("cannot read {}: {e}", path.display())))?;
    parse_records(&json)
}

// Builds the ordered source list: record URLs first, then `extra` (the
// positional CLI arguments). An empty result is an input error.
pub fn source_urls(records: Vec<SourceRecord>, extra: Vec<String>) -> Result<Vec<String>, CheckError> {
    let mut urls = Vec::with_capacity(records.len() + extra.len());

    for (index, record) in records.into_iter().enumerate() {
        match record.url.map(|u| u.trim().to_string()) {
            Some(url) if !url.is_empty() => urls.push(url),
            _ => {
                return Err(CheckError::Input(format!(
                    "record {} has no URL field",
                    index + 1
                )))
            }
        }
    }

    urls.extend(
        extra
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty()),
    );

    if urls.is_empty() {
        return Err(CheckError::Input("no source URLs were provided".to_string()));
    }

    Ok(urls)
}

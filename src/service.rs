// src/service.rs
// =============================================================================
// One check request, end to end: URL list in, rows plus export out.
//
// Per-row failures never reach this level. If something does escape (a panic
// anywhere in the pass), the request fails as a whole with a 500 and no
// partial results.
// =============================================================================

use crate::crawl::Pipeline;
use crate::errors::CheckError;
use crate::report::{export_tsv, ReportRow};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub results: Vec<ReportRow>,
    /// Tab-separated rendering of `results`.
    pub export: String,
}

impl CheckResponse {
    pub fn new(results: Vec<ReportRow>) -> Self {
        let export = export_tsv(&results);
        Self { results, export }
    }

    pub fn problem_count(&self) -> usize {
        self.results.iter().filter(|row| row.is_problem()).count()
    }
}

pub async fn check_sources(pipeline: Arc<Pipeline>, urls: Vec<String>) -> Result<CheckResponse, CheckError> {
    if urls.is_empty() {
        return Err(CheckError::Input("no source URLs were provided".to_string()));
    }

    let handle = tokio::spawn(async move { pipeline.run(&urls).await });

    let results = handle.await.map_err(|e| {
        error!(error = %e, "verification pass aborted");
        CheckError::Internal(e.to_string())
    })?;

    info!(rows = results.len(), "verification pass finished");
    Ok(CheckResponse::new(results))
}

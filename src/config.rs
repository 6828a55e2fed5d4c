// src/config.rs
// =============================================================================
// Runtime settings for the verification pipeline.
//
// Built from CLI flags in main.rs; every field has a default so tests can use
// CheckerConfig::default() and override only what they care about.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by the fetch and probe stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Timeout for fetching a source page, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Timeout for probing a single link, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Maximum number of requests in flight per stage.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Probe each distinct link once and share the outcome.
    #[serde(default)]
    pub dedupe: bool,
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_concurrency() -> usize {
    50
}

fn default_user_agent() -> String {
    format!("link-sentinel/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            concurrency: default_concurrency(),
            dedupe: false,
            user_agent: default_user_agent(),
        }
    }
}

impl CheckerConfig {
    #[must_use]
    pub fn with_fetch_timeout(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_probe_timeout(mut self, secs: u64) -> Self {
        self.probe_timeout_secs = secs;
        self
    }

    /// Sets the worker limit. Zero is clamped to one.
    #[must_use]
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    // A hand-built config may still carry 0 here
    pub fn worker_limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.worker_limit(), 50);
        assert!(!config.dedupe);
        assert!(config.user_agent.starts_with("link-sentinel/"));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let config = CheckerConfig::default().with_concurrency(0);
        assert_eq!(config.worker_limit(), 1);

        let raw = CheckerConfig {
            concurrency: 0,
            ..CheckerConfig::default()
        };
        assert_eq!(raw.worker_limit(), 1);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CheckerConfig = serde_json::from_str(r#"{"dedupe": true}"#).unwrap();
        assert!(config.dedupe);
        assert_eq!(config.probe_timeout_secs, 5);
    }
}

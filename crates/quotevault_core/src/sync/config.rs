//! Sync configuration.
//!
//! Values come from `Default` and can be overridden by embedders or loaded
//! from any serde source.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_REMOTE_CATEGORY: &str = "Server";
pub const DEFAULT_FETCH_LIMIT: usize = 5;
pub const DEFAULT_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Remote source and scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// HTTP endpoint returning a JSON array of `{ "title": ... }` records.
    pub endpoint: String,
    /// Number of leading records consumed per fetch.
    pub fetch_limit: usize,
    /// Category assigned to every fetched quote.
    pub remote_category: String,
    /// Period between ticks.
    pub interval_ms: u64,
    /// Per-request timeout for the remote fetch.
    pub request_timeout_ms: u64,
    /// Whether the scheduler runs a tick as soon as it starts.
    pub sync_on_start: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            remote_category: DEFAULT_REMOTE_CATEGORY.to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            sync_on_start: true,
        }
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::SyncConfig;
    use std::time::Duration;

    #[test]
    fn defaults_match_remote_contract() {
        let config = SyncConfig::default();
        assert_eq!(config.fetch_limit, 5);
        assert_eq!(config.remote_category, "Server");
        assert_eq!(config.interval(), Duration::from_secs(60));
        assert!(config.sync_on_start);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SyncConfig =
            serde_json::from_str(r#"{ "interval_ms": 250, "remote_category": "Feed" }"#)
                .expect("partial config should deserialize");
        assert_eq!(config.interval_ms, 250);
        assert_eq!(config.remote_category, "Feed");
        assert_eq!(config.fetch_limit, 5);
    }
}

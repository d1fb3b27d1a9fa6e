//! Remote quote source contract and HTTP implementation.
//!
//! # Responsibility
//! - Fetch a bounded batch of quotes from an external provider.
//! - Map provider records (`title` only) into quotes with a fixed category.
//!
//! # Invariants
//! - `fetch` is the only blocking call of a sync tick.
//! - A failed fetch yields `NetworkError`, never a partial batch.

use crate::model::quote::Quote;
use crate::sync::config::SyncConfig;
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Remote fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Endpoint unreachable, connection reset or timed out.
    Transport(String),
    /// Endpoint answered with a non-success HTTP status.
    Status(u16),
    /// Body was not JSON or not an array of records.
    InvalidPayload(String),
}

impl Display for NetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "remote unreachable: {message}"),
            Self::Status(code) => write!(f, "remote returned HTTP {code}"),
            Self::InvalidPayload(message) => write!(f, "invalid remote payload: {message}"),
        }
    }
}

impl Error for NetworkError {}

/// Source of remote quotes.
pub trait RemoteSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Quote>, NetworkError>;
}

/// Blocking HTTP source reading a JSON array of `{ "title": ... }` records.
pub struct HttpRemoteSource {
    agent: ureq::Agent,
    endpoint: String,
    fetch_limit: usize,
    category: String,
}

impl HttpRemoteSource {
    pub fn new(config: &SyncConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout())
            .build();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            fetch_limit: config.fetch_limit,
            category: config.remote_category.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteSource for HttpRemoteSource {
    fn fetch(&self) -> Result<Vec<Quote>, NetworkError> {
        let started_at = Instant::now();
        let response = self.agent.get(&self.endpoint).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => NetworkError::Status(code),
            ureq::Error::Transport(transport) => NetworkError::Transport(transport.to_string()),
        })?;

        let payload: Value = response
            .into_json()
            .map_err(|err| NetworkError::InvalidPayload(err.to_string()))?;

        let quotes = quotes_from_payload(&payload, self.fetch_limit, &self.category)?;
        debug!(
            "event=remote_fetch module=sync status=ok count={} duration_ms={}",
            quotes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(quotes)
    }
}

/// Maps a provider payload to quotes.
///
/// Only the first `limit` records are considered. Records without a
/// non-empty string `title` are skipped.
///
/// # Errors
/// - `InvalidPayload` when `category` is blank, since every quote needs one.
/// - `InvalidPayload` when `payload` is not a JSON array.
pub fn quotes_from_payload(
    payload: &Value,
    limit: usize,
    category: &str,
) -> Result<Vec<Quote>, NetworkError> {
    if category.trim().is_empty() {
        return Err(NetworkError::InvalidPayload(
            "remote category cannot be empty".to_string(),
        ));
    }

    let records = payload
        .as_array()
        .ok_or_else(|| NetworkError::InvalidPayload("expected a JSON array".to_string()))?;

    let mut skipped = 0usize;
    let quotes: Vec<Quote> = records
        .iter()
        .take(limit)
        .filter_map(|record| {
            let title = record.get("title").and_then(Value::as_str);
            match title {
                Some(title) if !title.is_empty() => Some(Quote {
                    text: title.to_string(),
                    category: category.to_string(),
                }),
                _ => {
                    skipped += 1;
                    None
                }
            }
        })
        .collect();

    if skipped > 0 {
        warn!("event=remote_map module=sync status=partial skipped={skipped}");
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::{quotes_from_payload, HttpRemoteSource, NetworkError, RemoteSource};
    use crate::sync::config::SyncConfig;
    use serde_json::json;

    #[test]
    fn maps_first_records_with_fixed_category() {
        let payload = json!([
            {"id": 1, "title": "one"},
            {"id": 2, "title": "two"},
            {"id": 3, "title": "three"}
        ]);
        let quotes = quotes_from_payload(&payload, 2, "Server").unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, "one");
        assert_eq!(quotes[1].text, "two");
        assert!(quotes.iter().all(|quote| quote.category == "Server"));
    }

    #[test]
    fn skips_records_without_title() {
        let payload = json!([{"title": ""}, {"body": "x"}, {"title": 7}, {"title": "ok"}]);
        let quotes = quotes_from_payload(&payload, 5, "Server").unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "ok");
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = quotes_from_payload(&json!({"title": "x"}), 5, "Server").unwrap_err();
        assert!(matches!(err, NetworkError::InvalidPayload(_)));
    }

    #[test]
    fn blank_remote_category_is_rejected() {
        let payload = json!([{"title": "x"}]);
        for category in ["", "   "] {
            let err = quotes_from_payload(&payload, 5, category).unwrap_err();
            assert!(matches!(err, NetworkError::InvalidPayload(_)));
        }
    }

    #[test]
    fn unreachable_endpoint_returns_network_error() {
        let config = SyncConfig {
            // Port 9 (discard) on localhost is expected to refuse connections.
            endpoint: "http://127.0.0.1:9/posts".to_string(),
            request_timeout_ms: 500,
            ..SyncConfig::default()
        };
        let source = HttpRemoteSource::new(&config);
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/posts");
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, NetworkError::Transport(_)));
    }
}

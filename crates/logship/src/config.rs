//! Sink configuration.

use std::time::Duration;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::{Map, Value};

/// Default number of records per request.
pub const DEFAULT_LOGS_PER_CALL: usize = 100;

/// Default wait between drain passes.
pub const DEFAULT_POLL_TIME: Duration = Duration::from_secs(30);

/// Immutable configuration for one sink: where batches go, how they
/// authenticate, and how draining is paced.
///
/// Built once, handed to the dispatcher in an `Arc`, never mutated.
/// `logs_per_call` bounds the size of a single request, which matters when
/// the ingest endpoint sits behind WAF request limits; the dispatcher still
/// makes as many requests as needed to exhaust the queue every `poll_time`.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    base_url: String,
    org: String,
    stream: String,
    username: String,
    password: String,
    /// Maximum records per request. Always at least 1.
    pub logs_per_call: usize,
    /// Wait between drain passes.
    pub poll_time: Duration,
    /// Metadata merged into every record at drain time.
    pub metadata: Option<Map<String, Value>>,
}

impl SinkConfig {
    /// Configuration for `{base_url}/api/{org}/{stream}/_json` with Basic
    /// auth credentials and default batching knobs.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        org: impl Into<String>,
        stream: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        SinkConfig {
            base_url: base_url.into(),
            org: org.into(),
            stream: stream.into(),
            username: username.into(),
            password: password.into(),
            logs_per_call: DEFAULT_LOGS_PER_CALL,
            poll_time: DEFAULT_POLL_TIME,
            metadata: None,
        }
    }

    /// Caps records per request. Zero is clamped to 1.
    #[must_use]
    pub fn with_logs_per_call(mut self, logs_per_call: usize) -> Self {
        self.logs_per_call = logs_per_call.max(1);
        self
    }

    #[must_use]
    pub fn with_poll_time(mut self, poll_time: Duration) -> Self {
        self.poll_time = poll_time;
        self
    }

    /// Sink-wide metadata, merged into every record at drain time. Keys a
    /// record already carries are left untouched.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The fixed ingest URL for this sink.
    #[must_use]
    pub fn ingest_url(&self) -> String {
        format!(
            "{}/api/{}/{}/_json",
            self.base_url.trim_end_matches('/'),
            self.org,
            self.stream
        )
    }

    /// The precomputed `Authorization` header value.
    #[must_use]
    pub fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SinkConfig {
        SinkConfig::new("https://logs.example.com", "default", "app", "user", "pass")
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.logs_per_call, 100);
        assert_eq!(config.poll_time, Duration::from_secs(30));
        assert!(config.metadata.is_none());
    }

    #[test]
    fn test_ingest_url() {
        assert_eq!(
            config().ingest_url(),
            "https://logs.example.com/api/default/app/_json"
        );
    }

    #[test]
    fn test_ingest_url_tolerates_trailing_slash() {
        let config = SinkConfig::new("https://logs.example.com/", "default", "app", "u", "p");
        assert_eq!(
            config.ingest_url(),
            "https://logs.example.com/api/default/app/_json"
        );
    }

    #[test]
    fn test_basic_auth_value() {
        // base64("user:pass")
        assert_eq!(config().basic_auth(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_logs_per_call_clamped_to_positive() {
        let config = config().with_logs_per_call(0);
        assert_eq!(config.logs_per_call, 1);
    }
}

//! HTTP transport for shipping batches to the ingest endpoint.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::SinkConfig;
use crate::error::SinkError;
use crate::record::LogRecord;

/// One reusable HTTP client bound to a fixed URL and fixed headers.
///
/// The transport performs exactly one POST per batch and no retries;
/// retry and recovery policy live in the dispatch loop, which discards a
/// faulted transport and constructs a fresh one with the same
/// configuration. Dropping the old instance releases its connections even
/// when the fault left them in an unknown state.
#[derive(Debug)]
pub struct Transport {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl Transport {
    #[must_use]
    pub fn new(config: &SinkConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            config
                .basic_auth()
                .parse()
                .expect("base64 credentials are always a valid header value"),
        );
        Transport {
            client: reqwest::Client::new(),
            url: config.ingest_url(),
            headers,
        }
    }

    /// Serializes `batch` as a JSON array of flat objects and POSTs it.
    ///
    /// Returns the response status and body text; classification of the
    /// status and body is the caller's job.
    pub async fn send(&self, batch: &[LogRecord]) -> Result<(StatusCode, String), SinkError> {
        let payload = serde_json::to_vec(batch).map_err(SinkError::Serialize)?;
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Body of a 200 ingest response.
///
/// The endpoint reports an overall `code` plus one entry per stream with
/// counts of accepted and rejected records.
#[derive(Debug, Deserialize)]
pub struct IngestResponse {
    pub code: i64,
    #[serde(default)]
    pub status: Vec<StreamStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StreamStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub error: Option<String>,
}

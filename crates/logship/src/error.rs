//! Faults that escape a send attempt to the dispatch loop's recovery
//! boundary.
//!
//! Not every failure is an error here: a non-200 status and a 200 response
//! whose body reports a non-success code are handled inside the loop (the
//! batch is logged and dropped, draining continues). Only the variants
//! below abort the current drain pass and cause the transport to be
//! rebuilt.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Connection, timeout, or DNS failure while talking to the ingest
    /// endpoint.
    #[error("transport fault: {0}")]
    Transport(#[from] reqwest::Error),

    /// The batch payload could not be encoded as JSON.
    #[error("serialization fault: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The endpoint answered 200 with a body that does not parse as an
    /// ingest response.
    #[error("unexpected response body for status {status}: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

//! Log record construction and severity normalization.
//!
//! A [`LogRecord`] is a flat, insertion-ordered map of field names to JSON
//! values. Every record carries the same base fields:
//!
//! ```json
//! {
//!   "level": "ERROR",
//!   "message": "connection lost",
//!   "source": "worker",
//!   "_timestamp.timezone": "UTC",
//!   "_timestamp": "2024-05-01T12:00:00.000000+00:00",
//!   "_timestamp.iso_format": "2024-05-01T12:00:00.000000+00:00"
//! }
//! ```
//!
//! The timestamp appears twice because the ingest backend rewrites
//! `_timestamp` to microseconds in its UI; `_timestamp.iso_format` keeps the
//! readable form.
//!
//! # Metadata precedence
//!
//! Metadata is layered over the base fields in a fixed order, last write
//! wins: base fields, then sink-wide metadata, then logger-level metadata,
//! then per-call metadata. Sink-wide metadata is merged during the drain
//! pass and never replaces a key the record already carries.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Log severity, named after the classic numeric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    NotSet,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// The uppercase severity name stored in the record's `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Critical => "CRITICAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::NotSet => "NOTSET",
        }
    }

    /// Normalizes a numeric severity (50/40/30/20/10/0) to a [`Level`].
    ///
    /// Values between the standard steps round down to the nearest standard
    /// level; anything at or above 50 is `Critical` and anything below 10 is
    /// `NotSet`.
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        match value {
            v if v >= 50 => Level::Critical,
            v if v >= 40 => Level::Error,
            v if v >= 30 => Level::Warning,
            v if v >= 20 => Level::Info,
            v if v >= 10 => Level::Debug,
            _ => Level::NotSet,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log entry, serialized as a flat JSON object.
///
/// Records are built by [`Logger`](crate::logger::Logger) call sites, owned
/// by the queue until dequeued, and consumed by exactly one send attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

impl LogRecord {
    /// Builds a record with the base field set and a fresh UTC timestamp.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>, source: &str) -> Self {
        let iso = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        let mut fields = Map::new();
        fields.insert("level".to_owned(), Value::String(level.as_str().to_owned()));
        fields.insert("message".to_owned(), Value::String(message.into()));
        fields.insert("source".to_owned(), Value::String(source.to_owned()));
        fields.insert(
            "_timestamp.timezone".to_owned(),
            Value::String("UTC".to_owned()),
        );
        fields.insert("_timestamp".to_owned(), Value::String(iso.clone()));
        fields.insert("_timestamp.iso_format".to_owned(), Value::String(iso));
        LogRecord { fields }
    }

    /// Layers `metadata` over the record; colliding keys are replaced.
    pub fn merge(&mut self, metadata: &Map<String, Value>) {
        for (key, value) in metadata {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Fills in `metadata` keys the record does not already carry.
    ///
    /// Used for the sink-wide map so record-level values win collisions.
    pub(crate) fn merge_missing(&mut self, metadata: &Map<String, Value>) {
        for (key, value) in metadata {
            self.fields
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The record's fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

//! Producer-facing logging handles.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::queue::RecordQueue;
use crate::record::{Level, LogRecord};

/// A named producer of log records.
///
/// Loggers are cheap to clone and hand out; every record they build is
/// enqueued without blocking and without feedback; producers never observe
/// whether dispatch later succeeds. Obtain one from
/// [`Sink::logger`](crate::dispatcher::Sink::logger) so it shares the
/// sink's queue.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    metadata: Option<Map<String, Value>>,
    queue: Arc<RecordQueue>,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>, queue: Arc<RecordQueue>) -> Self {
        Logger {
            name: name.into(),
            metadata: None,
            queue,
        }
    }

    /// Metadata added to every record this logger produces.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }

    /// Builds and enqueues one record.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.enqueue(level, message.into(), None);
    }

    /// Builds and enqueues one record with per-call metadata, which wins
    /// collisions against logger-level and sink-wide metadata.
    pub fn log_with(&self, level: Level, message: impl Into<String>, metadata: Map<String, Value>) {
        self.enqueue(level, message.into(), Some(metadata));
    }

    fn enqueue(&self, level: Level, message: String, call_metadata: Option<Map<String, Value>>) {
        let mut record = LogRecord::new(level, message, &self.name);
        if let Some(metadata) = &self.metadata {
            record.merge(metadata);
        }
        if let Some(metadata) = call_metadata {
            record.merge(&metadata);
        }
        self.queue.push(record);
    }
}

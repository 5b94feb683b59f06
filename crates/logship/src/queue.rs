//! The shared record queue between producers and the dispatch loop.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::record::LogRecord;

/// Unbounded FIFO queue of pending log records.
///
/// Many producers push concurrently; exactly one consumer (the dispatch
/// loop) pops. `push` never blocks beyond the lock and never fails, so
/// producers cannot observe dispatch state. The queue is owned by a
/// [`Sink`](crate::dispatcher::Sink) and shared by reference, which keeps
/// multiple independent sinks in one process possible.
#[derive(Debug, Default)]
pub struct RecordQueue {
    inner: Mutex<VecDeque<LogRecord>>,
}

impl RecordQueue {
    #[must_use]
    pub fn new() -> Self {
        RecordQueue::default()
    }

    /// Appends a record. Non-blocking, infallible.
    pub fn push(&self, record: LogRecord) {
        self.lock().push_back(record);
    }

    /// Removes and returns the oldest pending record, or `None` when empty.
    #[must_use]
    pub fn pop(&self) -> Option<LogRecord> {
        self.lock().pop_front()
    }

    /// Number of records currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A poisoned lock only means a producer panicked mid-push; the deque
    // itself is still valid.
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

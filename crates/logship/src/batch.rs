//! Bounded batch extraction from the record queue.

use serde_json::{Map, Value};

use crate::queue::RecordQueue;
use crate::record::LogRecord;

/// Removes up to `limit` records from `queue`, merging the sink-wide
/// metadata into each record as it is pulled.
///
/// Wholly synchronous: a drain pass never suspends, so it is atomic with
/// respect to the single consumer. Producers enqueuing concurrently may or
/// may not land in this pass; anything missed is picked up by a later one.
/// Returns an empty batch when the queue is empty.
#[must_use]
pub fn drain(
    queue: &RecordQueue,
    limit: usize,
    sink_metadata: Option<&Map<String, Value>>,
) -> Vec<LogRecord> {
    let mut batch = Vec::with_capacity(limit.min(queue.len()));
    for _ in 0..limit {
        let Some(mut record) = queue.pop() else {
            break;
        };
        if let Some(metadata) = sink_metadata {
            record.merge_missing(metadata);
        }
        batch.push(record);
    }
    batch
}

//! The sink and its background dispatch loop.
//!
//! One loop per sink. Each iteration waits out the poll interval, then
//! drains the queue in bounded batches and ships each batch:
//!
//! ```text
//!   Idle --(interval elapses)--> Draining
//!   Draining --(queue non-empty)--> Sending --(response handled)--> Draining
//!   Draining --(queue empty)--> Idle
//!   Sending --(escaped fault)--> Recovering --(new transport)--> Idle
//! ```
//!
//! The loop is the one component that must never terminate on its own: a
//! rejected batch is logged and dropped, an escaped fault tears down and
//! rebuilds the transport, and only cancelling the token stops the task.
//! Producers are never blocked and never see any of this.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::batch;
use crate::config::SinkConfig;
use crate::error::SinkError;
use crate::logger::Logger;
use crate::queue::RecordQueue;
use crate::record::LogRecord;
use crate::transport::{IngestResponse, Transport};

/// Lifecycle of a sink's dispatch loop.
///
/// `NotStarted → Running` happens once, on the first [`Sink::start`] call.
/// There is no `Stopped` state: the loop runs until its cancellation token
/// fires or the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    NotStarted,
    Running,
}

/// One configured destination: endpoint, credentials, batching policy, and
/// the queue feeding its dispatch loop.
#[derive(Debug)]
pub struct Sink {
    config: Arc<SinkConfig>,
    queue: Arc<RecordQueue>,
    state: Mutex<DispatcherState>,
    cancel_token: CancellationToken,
}

impl Sink {
    #[must_use]
    pub fn new(config: SinkConfig) -> Self {
        Sink {
            config: Arc::new(config),
            queue: Arc::new(RecordQueue::new()),
            state: Mutex::new(DispatcherState::NotStarted),
            cancel_token: CancellationToken::new(),
        }
    }

    /// A producer handle sharing this sink's queue.
    #[must_use]
    pub fn logger(&self, name: impl Into<String>) -> Logger {
        Logger::new(name, Arc::clone(&self.queue))
    }

    /// The shared record queue, for callers that build records themselves.
    #[must_use]
    pub fn queue(&self) -> Arc<RecordQueue> {
        Arc::clone(&self.queue)
    }

    /// Token that stops the dispatch loop when cancelled. Cancellation is
    /// the only supported shutdown path; it aborts the interval sleep or
    /// the in-flight send without corrupting shared state.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    #[must_use]
    pub fn state(&self) -> DispatcherState {
        *self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the dispatch loop and returns its task handle.
    ///
    /// Idempotent: only the first call spawns anything; later calls return
    /// `None` so at most one loop ever runs per sink.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *state == DispatcherState::Running {
            debug!("dispatch loop already running, ignoring start");
            return None;
        }
        *state = DispatcherState::Running;

        let dispatch = DispatchLoop {
            config: Arc::clone(&self.config),
            queue: Arc::clone(&self.queue),
            cancel_token: self.cancel_token.clone(),
        };
        Some(tokio::spawn(dispatch.run()))
    }
}

struct DispatchLoop {
    config: Arc<SinkConfig>,
    queue: Arc<RecordQueue>,
    cancel_token: CancellationToken,
}

impl DispatchLoop {
    async fn run(self) {
        let mut transport = Transport::new(&self.config);
        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => break,
                () = tokio::time::sleep(self.config.poll_time) => {}
            }

            if let Err(fault) = self.drain_pass(&transport).await {
                // Transport, serialization, and decode faults all land
                // here; the batch that hit the fault is gone. Replace the
                // transport (the old client drops first) and go back to
                // waiting out the interval.
                error!(error = %fault, "dispatch pass failed, rebuilding transport");
                transport = Transport::new(&self.config);
            }
        }
        debug!("dispatch loop cancelled");
    }

    /// One interval's worth of work: drain and send until the queue is
    /// exhausted or a fault escapes.
    async fn drain_pass(&self, transport: &Transport) -> Result<(), SinkError> {
        loop {
            let records = batch::drain(
                &self.queue,
                self.config.logs_per_call,
                self.config.metadata.as_ref(),
            );
            if records.is_empty() {
                return Ok(());
            }

            debug!(count = records.len(), "sending batch");
            tokio::select! {
                () = self.cancel_token.cancelled() => return Ok(()),
                outcome = self.dispatch_batch(transport, &records) => outcome?,
            }
        }
    }

    /// Sends one batch and classifies the response. The batch is consumed
    /// by this single attempt; it is never requeued.
    async fn dispatch_batch(
        &self,
        transport: &Transport,
        records: &[LogRecord],
    ) -> Result<(), SinkError> {
        let (status, body) = transport.send(records).await?;

        if status != StatusCode::OK {
            error!(
                status = %status,
                body = %body,
                "ingest endpoint rejected batch, dropping it"
            );
            return Ok(());
        }

        let response: IngestResponse =
            serde_json::from_str(&body).map_err(|source| SinkError::Decode { status, source })?;

        if response.code == 200 {
            for stream in &response.status {
                debug!(
                    stream = %stream.name,
                    successful = stream.successful,
                    failed = stream.failed,
                    error = stream.error.as_deref().unwrap_or_default(),
                    "batch ingested"
                );
            }
        } else {
            error!(
                code = response.code,
                body = %body,
                "ingest endpoint reported failure, dropping batch"
            );
        }
        Ok(())
    }
}

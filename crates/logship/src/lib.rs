//! # logship
//!
//! Batched structured log shipping to OpenObserve-style ingest endpoints.
//!
//! Call sites enqueue structured records without blocking; a single
//! background task per sink drains the queue on a fixed interval and ships
//! bounded batches over HTTP, surviving transport failures by rebuilding
//! its client.
//!
//! ```text
//!   Loggers (many producers)
//!       │ non-blocking enqueue
//!       v
//!   ┌──────────────┐
//!   │ RecordQueue  │ (unbounded FIFO)
//!   └──────┬───────┘
//!          │ drain up to logs_per_call, merge sink metadata
//!          v
//!   ┌──────────────┐
//!   │ DispatchLoop │ (one task per sink, wakes every poll_time)
//!   └──────┬───────┘
//!          │ JSON array POST, Basic auth
//!          v
//!   ┌──────────────┐
//!   │  Transport   │ (rebuilt on escaped faults)
//!   └──────────────┘
//! ```
//!
//! Delivery is best-effort: a rejected batch is logged and dropped, and
//! nothing is persisted across process restarts. Producers never observe
//! dispatch outcomes; failures surface only on the `tracing` side-channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use logship::{Sink, SinkConfig};
//! use std::time::Duration;
//!
//! # async fn run() {
//! let sink = Sink::new(
//!     SinkConfig::new("https://logs.example.com", "default", "app", "user", "pass")
//!         .with_poll_time(Duration::from_secs(5)),
//! );
//! let handle = sink.start();
//!
//! let logger = sink.logger("worker");
//! logger.info("Hello world!");
//! # }
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]

pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod queue;
pub mod record;
pub mod transport;

pub use config::SinkConfig;
pub use dispatcher::{DispatcherState, Sink};
pub use error::SinkError;
pub use logger::Logger;
pub use queue::RecordQueue;
pub use record::{Level, LogRecord};

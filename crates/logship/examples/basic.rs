//! Minimal end-to-end usage: one sink, one logger, background dispatch.

use std::time::Duration;

use logship::{Sink, SinkConfig};

#[tokio::main]
async fn main() {
    let sink = Sink::new(
        SinkConfig::new(
            "https://logs.example.com",
            "default",
            "app",
            "username",
            "password",
        )
        .with_poll_time(Duration::from_secs(5)),
    );
    let handle = sink.start();

    let logger = sink.logger("basic");
    logger.info("Hello world!");

    // Give the dispatcher a couple of intervals to ship the record.
    tokio::time::sleep(Duration::from_secs(10)).await;

    sink.cancel_token().cancel();
    if let Some(handle) = handle {
        let _ = handle.await;
    }
}

//! Minimal mock ingest backend for integration tests.
//!
//! Speaks just enough HTTP/1.1 to capture POSTed batches and answer with a
//! canned ingest response. Connections can be made to fail (accepted, then
//! closed before any response) to exercise the dispatcher's transport
//! recovery path.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub struct ReceivedRequest {
    pub path: String,
    /// Lowercased header names with trimmed values.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
#[allow(dead_code)]
pub struct MockIngest {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    fail_connections: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockIngest {
    /// Starts the backend on a random local port.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock ingest backend");
        let addr = listener.local_addr().expect("failed to get local addr");

        let received = Arc::new(Mutex::new(Vec::new()));
        let fail_connections = Arc::new(AtomicUsize::new(0));

        let received_clone = Arc::clone(&received);
        let fail_clone = Arc::clone(&fail_connections);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                if fail_clone.load(Ordering::SeqCst) > 0 {
                    fail_clone.fetch_sub(1, Ordering::SeqCst);
                    // Close without responding; the client sees the
                    // connection die mid-request.
                    drop(stream);
                    continue;
                }
                let received = Arc::clone(&received_clone);
                tokio::spawn(async move {
                    let _ = handle_connection(stream, received).await;
                });
            }
        });

        MockIngest {
            addr,
            received,
            fail_connections,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The next `n` connections are accepted and immediately closed.
    pub fn fail_next_connections(&self, n: usize) {
        self.fail_connections.store(n, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.received.lock().expect("mock state lock").clone()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut headers = Vec::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length: usize = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(0);

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    received.lock().expect("mock state lock").push(ReceivedRequest {
        path,
        headers,
        body,
    });

    let reply = br#"{"code":200,"status":[{"name":"app","successful":1,"failed":0}]}"#;
    let head = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        reply.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(reply).await?;
    stream.flush().await?;
    Ok(())
}

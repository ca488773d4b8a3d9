//! Stream-based feed source.
//!
//! Receives feed events from an async byte stream, such as a TCP connection
//! to the process running the RPC poller.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use super::{FeedEvent, FeedSource};

/// A feed source that receives events from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes events available via `poll()`.
/// Lines that fail to parse are skipped and recorded as the last error.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use clusterpulse::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"type\":\"transactionCount\",\"data\":1}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<FeedEvent>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        *error_handle.lock() = Some("Connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }

                        match serde_json::from_str::<FeedEvent>(trimmed) {
                            Ok(event) => {
                                *error_handle.lock() = None;
                                if tx.send(event).await.is_err() {
                                    // Receiver dropped
                                    break;
                                }
                            }
                            Err(e) => {
                                debug!(error = %e, "skipping unparseable feed line");
                                *error_handle.lock() = Some(format!("Parse error: {}", e));
                            }
                        }
                    }
                    Err(e) => {
                        *error_handle.lock() = Some(format!("Read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON payloads.
    ///
    /// Useful when events arrive framed by another transport (a websocket,
    /// a message queue) rather than as a byte stream.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, event_rx) = mpsc::channel(64);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<FeedEvent>(&bytes) {
                    Ok(event) => {
                        *error_handle.lock() = None;
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock() = Some(format!("Parse error: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: event_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl FeedSource for StreamSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                let mut error = self.last_error.lock();
                if error.is_none() {
                    *error = Some("Stream disconnected".to_string());
                }
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

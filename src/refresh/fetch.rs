//! The boundary with the status fetch collaborator.

use std::sync::atomic::{AtomicU64, Ordering};

use clusterpulse_types::{StatusSnapshot, TransactionSignature};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Something that can start a status fetch for a signature.
///
/// Fetches are fire-and-forget: the controller never waits on one. The
/// collaborator reports progress back through
/// [`RefreshController::observe`](super::RefreshController::observe).
pub trait StatusFetcher: Send + Sync + 'static {
    fn fetch(&self, signature: &TransactionSignature);
}

/// Cache state of the last status fetch, as reported by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchStatus {
    Fetching,
    Fetched,
    FetchFailed,
}

/// One report from the fetch collaborator.
///
/// Recorded responses use one JSON object per line:
///
/// ```text
/// {"type":"fetched","data":{"confirmations":0,"slot":250000000}}
/// {"type":"fetched","data":{"confirmations":"max","slot":250000000}}
/// {"type":"notFound"}
/// {"type":"fetchFailed"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum StatusEvent {
    /// A fetch has started.
    Fetching,
    /// The node returned a status.
    Fetched(StatusSnapshot),
    /// The node does not know the signature.
    NotFound,
    /// The request itself failed.
    FetchFailed,
}

/// A fetcher that forwards requests over a channel to whatever performs the
/// RPC call.
#[derive(Debug, Clone)]
pub struct ChannelFetcher {
    sender: mpsc::UnboundedSender<TransactionSignature>,
}

impl ChannelFetcher {
    /// Create a fetcher and the receiver its requests arrive on.
    pub fn create() -> (Self, mpsc::UnboundedReceiver<TransactionSignature>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl StatusFetcher for ChannelFetcher {
    fn fetch(&self, signature: &TransactionSignature) {
        // Receiver gone means nobody is serving fetches any more
        let _ = self.sender.send(signature.clone());
    }
}

/// Tickets for discarding out-of-order fetch responses.
///
/// A collaborator calls [`issue`](Self::issue) when it sends a request and
/// [`accept`](Self::accept) with that ticket when the response arrives. A
/// response older than one already accepted is rejected, so snapshots reach
/// the controller in request order.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    next: AtomicU64,
    accepted: AtomicU64,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new request. Tickets start at 1.
    pub fn issue(&self) -> u64 {
        self.next.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Returns true if the response for `ticket` is newer than any accepted
    /// so far, recording it as the newest.
    pub fn accept(&self, ticket: u64) -> bool {
        self.accepted.fetch_max(ticket, Ordering::AcqRel) < ticket
    }
}

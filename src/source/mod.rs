//! Feed source abstraction for receiving telemetry updates.
//!
//! This module provides a trait-based abstraction over wherever the RPC
//! polling collaborator puts its results: an in-process channel, a network
//! stream, or a recorded feed file.

mod channel;
mod event;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use event::FeedEvent;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving telemetry feed events from various sources.
///
/// Events must be returned in arrival order; the session folds them through
/// the reducer one by one.
///
/// # Example
///
/// ```
/// use clusterpulse::{ChannelSource, FeedEvent, FeedSource};
///
/// let (tx, mut source) = ChannelSource::create("rpc-poller");
/// tx.send(FeedEvent::TransactionCount(42)).unwrap();
///
/// assert_eq!(source.poll(), Some(FeedEvent::TransactionCount(42)));
/// assert_eq!(source.poll(), None);
/// ```
pub trait FeedSource: Send + Debug {
    /// Poll for the next event.
    ///
    /// Returns `Some(event)` if one is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the last read or parse error, if any.
    fn error(&self) -> Option<String>;
}

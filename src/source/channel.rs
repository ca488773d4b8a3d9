//! Channel-based feed source.
//!
//! Receives feed events via a tokio mpsc channel. Use this when the RPC
//! poller runs in the same process and pushes its results.

use tokio::sync::mpsc;

use super::{FeedEvent, FeedSource};

/// A feed source that receives events via a channel.
///
/// Unlike a watch channel, every event is kept: a transaction count pushed
/// just before a sample batch must not be coalesced away.
///
/// # Example
///
/// ```
/// use clusterpulse::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("rpc://localhost:8899");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<FeedEvent>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an unbounded mpsc channel
    /// * `source_description` - Where events come from (e.g. an RPC URL)
    pub fn new(receiver: mpsc::UnboundedReceiver<FeedEvent>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair for sending events to a ChannelSource.
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<FeedEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl FeedSource for ChannelSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.disconnected.then(|| "Feed disconnected".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_poll_in_order() {
        let (tx, mut source) = ChannelSource::create("test");

        assert!(source.poll().is_none());

        tx.send(FeedEvent::TransactionCount(1)).unwrap();
        tx.send(FeedEvent::TransactionCount(2)).unwrap();

        assert_eq!(source.poll(), Some(FeedEvent::TransactionCount(1)));
        assert_eq!(source.poll(), Some(FeedEvent::TransactionCount(2)));
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_channel_source_reports_disconnect() {
        let (tx, mut source) = ChannelSource::create("test");
        tx.send(FeedEvent::TransactionCount(1)).unwrap();
        drop(tx);

        // Buffered events drain before the disconnect shows
        assert_eq!(source.poll(), Some(FeedEvent::TransactionCount(1)));
        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("Feed disconnected"));
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("rpc://localhost:8899");
        assert_eq!(source.description(), "channel: rpc://localhost:8899");
    }
}

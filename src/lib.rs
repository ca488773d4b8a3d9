//! # clusterpulse
//!
//! Live telemetry and transaction status tracking for a blockchain cluster
//! explorer.
//!
//! The crate holds the client-side state logic behind two screens:
//!
//! - a **cluster stats card** fed by batches of performance samples and the
//!   running transaction count, reduced into average TPS, non-vote TPS and a
//!   three-resolution TPS history;
//! - a **transaction status card** that keeps polling a transaction's status
//!   until it is finalized, and gives up after repeated responses without a
//!   single confirmation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  source ──FeedEvent──▶ app ──PerformanceAction──▶ data       │
//! │  (File | Stream | Channel)      (session)     (reduce, history)│
//! │                                                              │
//! │  StatusFetcher ◀──fetch── refresh ◀──StatusEvent── collaborator│
//! │                    (controller, timer, card)                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Downsampling, the pure telemetry reducer and display helpers
//! - **[`source`]**: The [`FeedSource`] trait and file, stream and channel feeds
//! - **[`app`]**: A telemetry session binding one feed to one cluster
//! - **[`refresh`]**: The auto-refresh state machine and its polling timer
//! - **[`config`]**: Layered settings
//!
//! ## Usage
//!
//! ### Telemetry from a channel
//!
//! ```
//! use clusterpulse::{App, ChannelSource, ClusterSettings, FeedEvent};
//!
//! let (tx, source) = ChannelSource::create("rpc://localhost:8899");
//! let mut app = App::new(Box::new(source), ClusterSettings::default());
//!
//! tx.send(FeedEvent::TransactionCount(312_456_789)).unwrap();
//! assert_eq!(app.reload_data(), 1);
//! assert_eq!(app.performance().transaction_count, 312_456_789);
//! ```
//!
//! ### Telemetry from a stream
//!
//! ```no_run
//! use std::io::Cursor;
//! use clusterpulse::{App, ClusterSettings, StreamSource};
//!
//! # tokio_test::block_on(async {
//! // In practice, use a TcpStream
//! let stream = Cursor::new(b"{\"type\":\"transactionCount\",\"data\":7}\n".to_vec());
//! let source = StreamSource::spawn(stream, "example");
//! let app = App::new(Box::new(source), ClusterSettings::default());
//! # });
//! ```
//!
//! ### Tracking a transaction
//!
//! ```
//! use std::sync::Arc;
//! use clusterpulse::refresh::{AutoRefresh, ChannelFetcher, RefreshController, StatusEvent};
//! use clusterpulse::{Confirmations, Settings, StatusSnapshot};
//!
//! # tokio_test::block_on(async {
//! let (fetcher, mut requests) = ChannelFetcher::create();
//! let signature = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW"
//!     .parse()
//!     .unwrap();
//! let mut controller = RefreshController::new(signature, Arc::new(fetcher), &Settings::default());
//!
//! controller.load();
//! assert!(requests.try_recv().is_ok());
//!
//! let snapshot = StatusSnapshot::builder().confirmations(Confirmations::Count(3)).build();
//! controller.observe(StatusEvent::Fetched(snapshot));
//! assert_eq!(controller.phase(), AutoRefresh::Active);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod refresh;
pub mod source;

// Re-export main types for convenience
pub use app::App;
pub use clusterpulse_types::{
    Confirmations, ParseSignatureError, PerformanceSample, StatusSnapshot, TransactionSignature,
};
pub use config::{ClusterKind, ClusterSettings, LogSettings, RefreshSettings, Settings};
pub use data::{
    format_tps, ClusterStatsStatus, PerfHistory, PerformanceAction, PerformanceInfo, Resolution,
};
pub use error::{Error, Fault, Result};
pub use refresh::{AutoRefresh, RefreshController, StatusEvent, StatusView};
pub use source::{ChannelSource, FeedEvent, FeedSource, FileSource, StreamSource};

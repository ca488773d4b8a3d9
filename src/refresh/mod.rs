//! Live transaction status refresh.
//!
//! A [`RefreshController`] watches one transaction signature and decides
//! whether its status should be polled automatically:
//!
//! ```text
//!            visible, status not finalized
//!  Inactive ─────────────────────────────────▶ Active ──(timer: fetch every period)
//!     ▲  ▲                                       │
//!     │  └──── hidden / "max" confirmations ─────┤
//!     │                                          │ zero-confirmation responses
//!     │                                          ▼ reach the bailout threshold
//!     └───────────── hidden ─────────────────  BailedOut
//!                                  manual refresh ──▶ retries reset, re-evaluated
//! ```
//!
//! Fetching itself is delegated to a [`StatusFetcher`]; its progress comes
//! back as [`StatusEvent`]s.

mod card;
mod controller;
mod fetch;
mod machine;
mod timer;

pub use card::{
    block_time_label, cluster_query, confirmations_label, transaction_error_reason, ErrorReason,
    RefreshIndicator, StatusView,
};
pub use controller::RefreshController;
pub use fetch::{ChannelFetcher, FetchSequencer, FetchStatus, StatusEvent, StatusFetcher};
pub use machine::{evaluate, AutoRefresh};
pub use timer::RefreshTimer;

//! # clusterpulse-types
//!
//! Input types for the clusterpulse live-data layer. These are the shapes an
//! RPC collaborator hands to the telemetry reducer and the status refresh
//! controller: performance samples, transaction status snapshots and
//! validated transaction signatures.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies beyond base58**: core types work without any
//!   serialization framework
//! - **Optional serialization**: enable the `serde` feature to read and write
//!   the RPC's camelCase JSON
//! - **Validated at the edge**: a [`TransactionSignature`] can only be built
//!   from a string that decodes to 64 bytes
//!
//! ## Features
//!
//! - `std` (default): Standard library support (wall-clock timestamps,
//!   `std::error::Error` impls)
//! - `serde`: JSON serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use clusterpulse_types::{Confirmations, PerformanceSample, StatusSnapshot};
//!
//! let sample = PerformanceSample::builder()
//!     .num_transactions(3_000)
//!     .num_non_vote_transactions(900)
//!     .num_slots(150)
//!     .sample_period_secs(60.0)
//!     .build();
//! assert_eq!(sample.tps(), 50.0);
//!
//! let status = StatusSnapshot::builder()
//!     .confirmations(Confirmations::Count(12))
//!     .slot(250_000_000)
//!     .fetched_at_ms(1_703_160_000_000)
//!     .build();
//! assert!(!status.is_finalized());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod sample;
mod signature;
mod status;

pub use sample::*;
pub use signature::*;
pub use status::*;

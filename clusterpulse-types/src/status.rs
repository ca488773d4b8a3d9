//! Transaction status snapshots returned by status polls.

use core::fmt;

/// Confirmation depth of a transaction.
///
/// The RPC reports either a block count or the sentinel `"max"` once the
/// transaction is finalized. On the wire this is a JSON number or the string
/// `"max"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confirmations {
    /// Number of confirmed blocks on top of the transaction's block.
    Count(u32),
    /// Finalized; no further confirmations will be reported.
    Max,
}

impl Confirmations {
    /// True for the finalized sentinel.
    pub fn is_max(&self) -> bool {
        matches!(self, Confirmations::Max)
    }

    /// True when the transaction has no confirmations yet.
    pub fn is_zero(&self) -> bool {
        matches!(self, Confirmations::Count(0))
    }
}

impl fmt::Display for Confirmations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmations::Count(n) => write!(f, "{}", n),
            Confirmations::Max => f.write_str("MAX"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Confirmations {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Confirmations::Count(n) => serializer.serialize_u32(*n),
            Confirmations::Max => serializer.serialize_str("max"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Confirmations {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u32),
            Label(alloc::string::String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Confirmations::Count(n)),
            Repr::Label(label) if label == "max" => Ok(Confirmations::Max),
            Repr::Label(other) => Err(D::Error::custom(format_args!(
                "expected a confirmation count or \"max\", got {:?}",
                other
            ))),
        }
    }
}

/// The status of one transaction as of a single poll.
///
/// `confirmations` is absent when the node knows the transaction but cannot
/// report a depth (for example when it was rooted before the node's
/// status cache window).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusSnapshot {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub confirmations: Option<Confirmations>,

    /// Slot the transaction landed in.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slot: u64,

    /// Unix timestamp (seconds) of the block, when the node has one.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub block_time: Option<i64>,

    /// Unix timestamp in milliseconds when this snapshot was fetched.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fetched_at_ms: u64,
}

impl StatusSnapshot {
    /// Create a builder for a snapshot.
    pub fn builder() -> StatusSnapshotBuilder {
        StatusSnapshotBuilder::new()
    }

    /// True once the transaction reports `"max"` confirmations.
    pub fn is_finalized(&self) -> bool {
        self.confirmations.is_some_and(|c| c.is_max())
    }

    /// True when the poll reported exactly zero confirmations.
    pub fn has_zero_confirmations(&self) -> bool {
        self.confirmations.is_some_and(|c| c.is_zero())
    }
}

/// Builder for [`StatusSnapshot`].
#[derive(Debug, Default)]
pub struct StatusSnapshotBuilder {
    confirmations: Option<Confirmations>,
    slot: u64,
    block_time: Option<i64>,
    fetched_at_ms: Option<u64>,
}

impl StatusSnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirmations(mut self, confirmations: Confirmations) -> Self {
        self.confirmations = Some(confirmations);
        self
    }

    pub fn slot(mut self, slot: u64) -> Self {
        self.slot = slot;
        self
    }

    pub fn block_time(mut self, unix_secs: i64) -> Self {
        self.block_time = Some(unix_secs);
        self
    }

    /// Set a specific fetch timestamp (milliseconds since Unix epoch).
    pub fn fetched_at_ms(mut self, ts: u64) -> Self {
        self.fetched_at_ms = Some(ts);
        self
    }

    /// Build the snapshot, stamping it with the current time unless a
    /// timestamp was given.
    #[cfg(feature = "std")]
    pub fn build(self) -> StatusSnapshot {
        StatusSnapshot {
            confirmations: self.confirmations,
            slot: self.slot,
            block_time: self.block_time,
            fetched_at_ms: self.fetched_at_ms.unwrap_or_else(current_timestamp_ms),
        }
    }

    /// Build the snapshot with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> StatusSnapshot {
        StatusSnapshot {
            confirmations: self.confirmations,
            slot: self.slot,
            block_time: self.block_time,
            fetched_at_ms: self.fetched_at_ms.unwrap_or(0),
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

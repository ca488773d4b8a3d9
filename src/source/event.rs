//! Feed events delivered by the RPC polling collaborator.
//!
//! On the wire each event is one JSON object per line:
//!
//! ```text
//! {"type":"perfSamples","data":[{"numTransactions":3000,"numNonVoteTransactions":900,"numSlots":150,"samplePeriodSecs":60}]}
//! {"type":"transactionCount","data":312456789012}
//! {"type":"error","data":"RPC request timed out"}
//! ```

use clusterpulse_types::PerformanceSample;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::PerformanceAction;

/// One update from the telemetry feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum FeedEvent {
    /// A batch of performance samples, newest first.
    PerfSamples(Vec<PerformanceSample>),
    /// The cluster's running transaction count.
    TransactionCount(u64),
    /// The feed reported a failure.
    Error(String),
}

impl FeedEvent {
    /// Convert into a reducer action.
    ///
    /// Samples without a usable period are discarded here so the reducer
    /// never divides by zero.
    pub fn into_action(self) -> PerformanceAction {
        match self {
            FeedEvent::PerfSamples(samples) => {
                let received = samples.len();
                let samples: Vec<PerformanceSample> =
                    samples.into_iter().filter(|s| s.has_valid_period()).collect();

                let dropped = received - samples.len();
                if dropped > 0 {
                    warn!(dropped, received, "discarded samples without a positive period");
                }

                PerformanceAction::SetPerfSamples(samples)
            }
            FeedEvent::TransactionCount(count) => PerformanceAction::SetTransactionCount(count),
            FeedEvent::Error(message) => PerformanceAction::SetError(message),
        }
    }
}

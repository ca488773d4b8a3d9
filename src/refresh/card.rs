//! What the transaction status card shows.

use chrono::DateTime;
use clusterpulse_types::{Confirmations, StatusSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ClusterKind, ClusterSettings};

/// Classification of the status card body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusView {
    /// Nothing known yet, or a fetch is running while not auto-refreshing.
    Loading,
    /// The last fetch failed.
    FetchFailed,
    /// The cluster does not know the signature. A non-zero
    /// `first_available_block` means older history was pruned.
    NotFound { first_available_block: u64 },
    Found(StatusSnapshot),
}

impl StatusView {
    /// Note shown under "not found" on clusters that prune history.
    pub fn note(&self) -> Option<String> {
        match self {
            StatusView::NotFound {
                first_available_block,
            } if *first_available_block > 0 => Some(format!(
                "Note: Transactions processed before block {} are not available at this time",
                first_available_block
            )),
            _ => None,
        }
    }
}

/// The control shown in the card header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshIndicator {
    /// Auto-refresh is running.
    Spinner,
    /// Manual refresh is available.
    RefreshButton,
}

/// Label for the confirmations row.
pub fn confirmations_label(confirmations: Option<Confirmations>) -> String {
    match confirmations {
        Some(c) => c.to_string(),
        None => "Unknown".to_string(),
    }
}

/// Label for the block time row, from unix seconds.
pub fn block_time_label(block_time: Option<i64>) -> String {
    block_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|time| time.format("%b %-d, %Y at %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unavailable".to_string())
}

/// A readable reason for a failed transaction, with an optional link to
/// the account involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReason {
    pub reason: String,
    pub link: Option<String>,
}

impl ErrorReason {
    fn text(reason: String) -> Self {
        Self { reason, link: None }
    }

    /// Returns the link with the cluster selection appended.
    pub fn link_for(&self, cluster: &ClusterSettings) -> Option<String> {
        self.link
            .as_ref()
            .map(|link| format!("{}{}", link, cluster_query(cluster)))
    }
}

/// Explain the `err` field of a transaction status.
///
/// `account_keys` are the transaction's account addresses when the full
/// transaction has been loaded.
pub fn transaction_error_reason(err: &Value, account_keys: Option<&[String]>) -> ErrorReason {
    if let Value::String(s) = err {
        return ErrorReason::text(format!("Runtime Error: \"{}\"", s));
    }

    if let Some(index) = instruction_error_index(err) {
        return ErrorReason::text(format!(
            "Program Error: \"Instruction #{} Failed\"",
            index + 1
        ));
    }

    if let Some(account_index) = err
        .get("InsufficientFundsForRent")
        .and_then(|rent| rent.get("account_index"))
        .and_then(Value::as_u64)
    {
        let address = account_keys.and_then(|keys| {
            usize::try_from(account_index)
                .ok()
                .and_then(|i| keys.get(i))
        });
        return match address {
            Some(address) => ErrorReason {
                reason: format!("Insufficient Funds For Rent: {}", address),
                link: Some(format!("/address/{}", address)),
            },
            None => ErrorReason::text(format!(
                "Insufficient Funds For Rent: Account #{}",
                account_index + 1
            )),
        };
    }

    ErrorReason::text(format!("Unknown Error: \"{}\"", err))
}

fn instruction_error_index(err: &Value) -> Option<u64> {
    err.get("InstructionError")?.as_array()?.first()?.as_u64()
}

/// Query string selecting `cluster` in explorer links. Empty on mainnet-beta.
pub fn cluster_query(cluster: &ClusterSettings) -> String {
    match cluster.kind {
        ClusterKind::MainnetBeta => String::new(),
        ClusterKind::Custom => format!(
            "?cluster={}&customUrl={}",
            cluster.name.to_lowercase(),
            cluster.url
        ),
        ClusterKind::Testnet | ClusterKind::Devnet => {
            format!("?cluster={}", cluster.name.to_lowercase())
        }
    }
}

//! Error types.

use clusterpulse_types::ParseSignatureError;
use thiserror::Error;

/// Errors from the fallible edges of the crate: configuration, I/O and
/// parsing of external input. State transitions themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or deserialized.
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feed line or response was not valid JSON for its type.
    #[error("Failed to parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// The transaction signature was malformed.
    #[error("Signature is not valid: {0}")]
    InvalidSignature(#[from] ParseSignatureError),
}

/// Convenience alias for results in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A user-facing fault derived from telemetry or refresh state.
///
/// Faults are never raised; they are read off the current state so the
/// presentation layer can show the matching message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// The sample/count feed failed. Last good numbers stay on screen.
    #[error("Failed to load cluster stats: {0}")]
    Feed(String),

    /// The last status fetch failed. Retry manually.
    #[error("Fetch Failed")]
    FetchFailure,

    /// Confirmations stopped progressing and auto-refresh was suspended.
    #[error("Stopped auto-refreshing after {retries} polls without a confirmation")]
    StalledConfirmation { retries: u32 },
}

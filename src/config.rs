//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `CLUSTERPULSE_` (nested keys joined
//! with `__`).
//!
//! ```toml
//! [cluster]
//! name = "devnet"
//! url = "https://api.devnet.solana.com"
//! kind = "devnet"
//!
//! [refresh]
//! interval_ms = 2000
//! zero_confirmation_bailout = 5
//!
//! [log]
//! filter = "clusterpulse=debug"
//! ```
//!
//! ```bash
//! CLUSTERPULSE_REFRESH__INTERVAL_MS=500 clusterpulse track <SIGNATURE> --responses r.ndjson
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// All runtime settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub refresh: RefreshSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("CLUSTERPULSE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Which public cluster a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterKind {
    #[default]
    MainnetBeta,
    Testnet,
    Devnet,
    Custom,
}

/// The cluster a telemetry session or tracked transaction belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    /// Display name, also used in explorer links.
    pub name: String,
    /// RPC endpoint; only shown and linked, never dialed by this crate.
    pub url: String,
    pub kind: ClusterKind,
    /// Oldest block the cluster still serves. Non-zero on pruned clusters.
    pub first_available_block: u64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            name: "Mainnet Beta".to_string(),
            url: "https://api.mainnet-beta.solana.com".to_string(),
            kind: ClusterKind::MainnetBeta,
            first_available_block: 0,
        }
    }
}

/// Transaction status auto-refresh tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Period between automatic status fetches.
    pub interval_ms: u64,
    /// Zero-confirmation responses tolerated before polling is suspended.
    pub zero_confirmation_bailout: u32,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            zero_confirmation_bailout: 5,
        }
    }
}

/// Logging settings for the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

//! Pure auto-refresh decision logic.

use clusterpulse_types::StatusSnapshot;
use serde::{Deserialize, Serialize};

/// Whether a tracked transaction is being polled automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutoRefresh {
    /// Polling on a timer.
    Active,
    /// Not polling: hidden, finalized, or nothing fetched yet.
    #[default]
    Inactive,
    /// Polling suspended after repeated zero-confirmation responses.
    BailedOut,
}

impl AutoRefresh {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            AutoRefresh::Active => "ACTIVE",
            AutoRefresh::Inactive => "IDLE",
            AutoRefresh::BailedOut => "BAILED",
        }
    }
}

/// Decide the auto-refresh phase. Rules apply in order; the first match wins:
///
/// 1. not visible → `Inactive`
/// 2. `retries >= bailout` → `BailedOut`
/// 3. a snapshot exists and is not finalized → `Active`
/// 4. otherwise → `Inactive`
pub fn evaluate(
    visible: bool,
    zero_confirmation_retries: u32,
    bailout: u32,
    last_status: Option<&StatusSnapshot>,
) -> AutoRefresh {
    if !visible {
        AutoRefresh::Inactive
    } else if zero_confirmation_retries >= bailout {
        AutoRefresh::BailedOut
    } else if last_status.is_some_and(|s| !s.is_finalized()) {
        AutoRefresh::Active
    } else {
        AutoRefresh::Inactive
    }
}

//! Display helpers for the stats card.

use super::performance::{ClusterStatsStatus, PerformanceInfo};

/// Round a TPS value and group thousands with commas, e.g. `"2,431"`.
pub fn format_tps(tps: f64) -> String {
    if !tps.is_finite() {
        return "0".to_string();
    }

    let rounded = tps.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Why the stats card cannot show numbers yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsNotReady {
    /// True when either feed reported an error rather than still loading.
    pub error: bool,
}

/// Gate the stats card on both the performance feed and the dashboard feed.
///
/// The dashboard feed (epoch progress, slot times) is owned elsewhere; only
/// its status is needed here.
pub fn stats_readiness(
    performance: &PerformanceInfo,
    dashboard: ClusterStatsStatus,
) -> Result<(), StatsNotReady> {
    if performance.status == ClusterStatsStatus::Ready && dashboard == ClusterStatsStatus::Ready {
        return Ok(());
    }

    let error =
        performance.status == ClusterStatsStatus::Error || dashboard == ClusterStatsStatus::Error;
    Err(StatsNotReady { error })
}

/// The two headline numbers of the stats card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpsSummary {
    /// Non-vote ("user") transactions per second.
    pub user_tps: String,
    /// All transactions per second.
    pub total_tps: String,
}

impl TpsSummary {
    pub fn from_info(info: &PerformanceInfo) -> Self {
        Self {
            user_tps: format_tps(info.true_tps),
            total_tps: format_tps(info.avg_tps),
        }
    }
}

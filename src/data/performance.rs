//! Cluster performance state and its reducer.
//!
//! [`reduce`] is the only way a [`PerformanceInfo`] changes. It is pure and
//! total: every action applied to every state yields a new state, and the
//! previous state is replaced wholesale.

use clusterpulse_types::PerformanceSample;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::history::PerfHistory;

/// Readiness of a cluster statistics feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatsStatus {
    #[default]
    Loading,
    Ready,
    Error,
}

impl ClusterStatsStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            ClusterStatsStatus::Loading => "LOADING",
            ClusterStatsStatus::Ready => "READY",
            ClusterStatsStatus::Error => "ERROR",
        }
    }
}

/// Throughput telemetry for one cluster session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInfo {
    pub status: ClusterStatsStatus,
    /// Mean total TPS over the latest batch.
    pub avg_tps: f64,
    /// Mean non-vote TPS over the latest batch.
    pub true_tps: f64,
    pub history_max_tps: f64,
    pub perf_history: PerfHistory,
    pub transaction_count: u64,
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceAction {
    /// A batch of samples, newest first.
    SetPerfSamples(Vec<PerformanceSample>),
    /// The cluster's running transaction count.
    SetTransactionCount(u64),
    /// The feed failed; the message is for logs only.
    SetError(String),
    /// Replace the whole state, e.g. on cluster switch.
    Reset(PerformanceInfo),
}

/// Apply one action to the telemetry state.
///
/// `Ready` requires both a non-zero transaction count and a non-zero average
/// TPS; whichever of the two feeds lands second flips the status.
/// Samples must have a positive period; the caller filters the rest.
pub fn reduce(state: PerformanceInfo, action: PerformanceAction) -> PerformanceInfo {
    match action {
        PerformanceAction::SetPerfSamples(samples) => apply_samples(state, &samples),

        PerformanceAction::SetTransactionCount(transaction_count) => {
            let status = if state.avg_tps != 0.0 {
                ClusterStatsStatus::Ready
            } else {
                ClusterStatsStatus::Loading
            };

            PerformanceInfo {
                status,
                transaction_count,
                ..state
            }
        }

        PerformanceAction::SetError(message) => {
            warn!(error = %message, "performance feed failed");
            PerformanceInfo {
                status: ClusterStatsStatus::Error,
                ..state
            }
        }

        PerformanceAction::Reset(snapshot) => snapshot,
    }
}

fn apply_samples(state: PerformanceInfo, samples: &[PerformanceSample]) -> PerformanceInfo {
    if samples.is_empty() {
        return state;
    }

    let (short_avg, short_true): (Vec<f64>, Vec<f64>) = samples
        .iter()
        .filter(|s| s.num_transactions != 0)
        .map(|s| (s.tps(), s.true_tps()))
        .unzip();

    let avg_tps = mean(&short_avg);
    let true_tps = mean(&short_true);

    let perf_history = PerfHistory::from_newest_first(&short_avg);
    let history_max_tps = perf_history.max_tps();

    let status = if state.transaction_count != 0 {
        ClusterStatsStatus::Ready
    } else {
        ClusterStatsStatus::Loading
    };

    trace!(
        received = samples.len(),
        kept = short_avg.len(),
        avg_tps,
        true_tps,
        history_max_tps,
        "folded performance samples"
    );

    PerformanceInfo {
        status,
        avg_tps,
        true_tps,
        history_max_tps,
        perf_history,
        ..state
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl PerformanceInfo {
    /// Whether both feeds have delivered usable data.
    pub fn is_ready(&self) -> bool {
        self.status == ClusterStatsStatus::Ready
    }

    /// Fold an action into this state, consuming it.
    pub fn apply(self, action: PerformanceAction) -> Self {
        reduce(self, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(total: u64, non_vote: u64, period: f64) -> PerformanceSample {
        PerformanceSample::builder()
            .num_transactions(total)
            .num_non_vote_transactions(non_vote)
            .num_slots(1)
            .sample_period_secs(period)
            .build()
    }

    fn ready_state() -> PerformanceInfo {
        PerformanceInfo::default()
            .apply(PerformanceAction::SetTransactionCount(1_000))
            .apply(PerformanceAction::SetPerfSamples(vec![sample(600, 60, 60.0)]))
    }

    #[test]
    fn default_state_is_loading() {
        let state = PerformanceInfo::default();
        assert_eq!(state.status, ClusterStatsStatus::Loading);
        assert_eq!(state.avg_tps, 0.0);
        assert!(state.perf_history.is_empty());
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let state = ready_state();
        let next = reduce(state.clone(), PerformanceAction::SetPerfSamples(vec![]));
        assert_eq!(next, state);
    }

    #[test]
    fn worked_example_matches_expected_rates_and_order() {
        let state = reduce(
            PerformanceInfo::default(),
            PerformanceAction::SetPerfSamples(vec![sample(100, 50, 1.0), sample(200, 150, 1.0)]),
        );

        assert_eq!(state.avg_tps, 150.0);
        assert_eq!(state.true_tps, 100.0);
        assert_eq!(state.perf_history.short, vec![200.0, 100.0]);
        assert_eq!(state.perf_history.medium, vec![150.0]);
        assert_eq!(state.perf_history.long, vec![150.0]);
        assert_eq!(state.history_max_tps, 200.0);
    }

    #[test]
    fn zero_transaction_samples_are_dropped() {
        let state = reduce(
            PerformanceInfo::default(),
            PerformanceAction::SetPerfSamples(vec![
                sample(0, 0, 1.0),
                sample(300, 30, 1.0),
                sample(0, 0, 1.0),
            ]),
        );

        assert_eq!(state.avg_tps, 300.0);
        assert_eq!(state.true_tps, 30.0);
        assert_eq!(state.perf_history.short, vec![300.0]);
    }

    #[test]
    fn all_zero_batch_zeroes_rates() {
        let state = ready_state();
        assert!(state.avg_tps > 0.0);

        let next = reduce(
            state,
            PerformanceAction::SetPerfSamples(vec![sample(0, 0, 60.0), sample(0, 0, 60.0)]),
        );

        assert_eq!(next.avg_tps, 0.0);
        assert_eq!(next.true_tps, 0.0);
        assert!(next.perf_history.is_empty());
        assert_eq!(next.history_max_tps, 0.0);
        // Count was non-zero before, so the samples rule still says Ready
        assert_eq!(next.status, ClusterStatsStatus::Ready);
    }

    #[test]
    fn fifty_samples_keep_history_bounded() {
        let samples: Vec<_> = (1..=50).map(|i| sample(i * 60, i, 60.0)).collect();
        let state = reduce(PerformanceInfo::default(), PerformanceAction::SetPerfSamples(samples));

        assert!(state.perf_history.short.len() <= 30);
        assert!(state.perf_history.medium.len() <= 30);
        assert!(state.perf_history.long.len() <= 30);
        assert_eq!(state.perf_history.medium.len(), 13);
        assert_eq!(state.perf_history.long.len(), 5);
    }

    #[test]
    fn count_then_samples_becomes_ready() {
        let state = PerformanceInfo::default().apply(PerformanceAction::SetTransactionCount(42));
        assert_eq!(state.status, ClusterStatsStatus::Loading);

        let state = state.apply(PerformanceAction::SetPerfSamples(vec![sample(60, 6, 60.0)]));
        assert_eq!(state.status, ClusterStatsStatus::Ready);
    }

    #[test]
    fn samples_then_count_becomes_ready() {
        let state =
            PerformanceInfo::default().apply(PerformanceAction::SetPerfSamples(vec![sample(60, 6, 60.0)]));
        assert_eq!(state.status, ClusterStatsStatus::Loading);

        let state = state.apply(PerformanceAction::SetTransactionCount(42));
        assert_eq!(state.status, ClusterStatsStatus::Ready);
    }

    #[test]
    fn zero_count_keeps_loading() {
        let state = PerformanceInfo::default()
            .apply(PerformanceAction::SetTransactionCount(0))
            .apply(PerformanceAction::SetPerfSamples(vec![sample(60, 6, 60.0)]));

        assert_eq!(state.status, ClusterStatsStatus::Loading);
        assert_eq!(state.avg_tps, 1.0);
    }

    #[test]
    fn count_without_throughput_keeps_loading() {
        let state = PerformanceInfo::default()
            .apply(PerformanceAction::SetPerfSamples(vec![sample(0, 0, 60.0)]))
            .apply(PerformanceAction::SetTransactionCount(42));

        assert_eq!(state.status, ClusterStatsStatus::Loading);
    }

    #[test]
    fn error_keeps_numbers_visible() {
        let state = ready_state();
        let next = reduce(state.clone(), PerformanceAction::SetError("timeout".into()));

        assert_eq!(next.status, ClusterStatsStatus::Error);
        assert_eq!(next.avg_tps, state.avg_tps);
        assert_eq!(next.true_tps, state.true_tps);
        assert_eq!(next.perf_history, state.perf_history);
        assert_eq!(next.transaction_count, state.transaction_count);
    }

    #[test]
    fn samples_after_error_recover_status() {
        let state = ready_state().apply(PerformanceAction::SetError("timeout".into()));
        let state = state.apply(PerformanceAction::SetPerfSamples(vec![sample(120, 12, 60.0)]));
        assert_eq!(state.status, ClusterStatsStatus::Ready);
    }

    #[test]
    fn reset_replaces_everything() {
        let next = reduce(ready_state(), PerformanceAction::Reset(PerformanceInfo::default()));
        assert_eq!(next, PerformanceInfo::default());
    }

    #[test]
    fn transaction_count_is_untouched_by_samples() {
        let state = PerformanceInfo::default()
            .apply(PerformanceAction::SetTransactionCount(7))
            .apply(PerformanceAction::SetPerfSamples(vec![sample(60, 6, 60.0)]));
        assert_eq!(state.transaction_count, 7);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(ready_state()).unwrap();
        assert_eq!(json["status"], "ready");
        assert!(json.get("avgTps").is_some());
        assert!(json.get("perfHistory").is_some());
        assert_eq!(json["transactionCount"], 1000);
    }
}

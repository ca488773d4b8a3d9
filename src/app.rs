//! Telemetry session state.

use tracing::{debug, info};

use crate::config::ClusterSettings;
use crate::data::{
    stats_readiness, ClusterStatsStatus, PerformanceAction, PerformanceInfo, StatsNotReady,
    TpsSummary,
};
use crate::error::Fault;
use crate::source::{FeedEvent, FeedSource};

/// One cluster's live throughput telemetry.
///
/// The session owns a feed source and folds every event it yields into a
/// [`PerformanceInfo`]. Call [`reload_data`](Self::reload_data) whenever the
/// feed may have something new.
pub struct App {
    source: Box<dyn FeedSource>,
    cluster: ClusterSettings,
    performance: PerformanceInfo,

    /// Message of the last error event the feed delivered.
    feed_error: Option<String>,
    /// Transport-level problem reported by the source itself.
    pub load_error: Option<String>,
}

impl App {
    /// Create a session for `cluster` reading from `source`.
    pub fn new(source: Box<dyn FeedSource>, cluster: ClusterSettings) -> Self {
        Self {
            source,
            cluster,
            performance: PerformanceInfo::default(),
            feed_error: None,
            load_error: None,
        }
    }

    /// Returns a description of the current feed source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn cluster(&self) -> &ClusterSettings {
        &self.cluster
    }

    pub fn performance(&self) -> &PerformanceInfo {
        &self.performance
    }

    /// Fold one action into the telemetry state.
    pub fn dispatch(&mut self, action: PerformanceAction) {
        let before = self.performance.status;
        let state = std::mem::take(&mut self.performance);
        self.performance = state.apply(action);

        if self.performance.status != before {
            debug!(
                cluster = %self.cluster.name,
                from = before.symbol(),
                to = self.performance.status.symbol(),
                "cluster stats status changed"
            );
        }
    }

    /// Drain every event currently available from the source, in arrival
    /// order. Returns how many events were applied.
    pub fn reload_data(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.source.poll() {
            if let FeedEvent::Error(ref message) = event {
                self.feed_error = Some(message.clone());
            }
            self.dispatch(event.into_action());
            applied += 1;
        }

        self.load_error = self.source.error();
        applied
    }

    /// Move the session to another cluster and feed, starting over from an
    /// empty state.
    pub fn switch_cluster(&mut self, cluster: ClusterSettings, source: Box<dyn FeedSource>) {
        info!(from = %self.cluster.name, to = %cluster.name, "switching cluster");
        self.dispatch(PerformanceAction::Reset(PerformanceInfo::default()));
        self.cluster = cluster;
        self.source = source;
        self.feed_error = None;
        self.load_error = None;
    }

    /// Headline numbers, once both this feed and the dashboard feed are ready.
    pub fn stats(&self, dashboard: ClusterStatsStatus) -> Result<TpsSummary, StatsNotReady> {
        stats_readiness(&self.performance, dashboard)?;
        Ok(TpsSummary::from_info(&self.performance))
    }

    /// The feed fault to surface, if any.
    pub fn fault(&self) -> Option<Fault> {
        if self.performance.status == ClusterStatsStatus::Error {
            let message = self
                .feed_error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            return Some(Fault::Feed(message));
        }
        self.load_error.clone().map(Fault::Feed)
    }
}

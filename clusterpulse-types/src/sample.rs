//! Performance samples reported by the cluster.

/// One reporting window of cluster throughput, as returned by the RPC's
/// recent-performance-samples call.
///
/// Batches arrive newest-first. A sample with `sample_period_secs == 0` is
/// meaningless and must be filtered out before it reaches the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PerformanceSample {
    /// Transactions processed in the window, votes included.
    pub num_transactions: u64,

    /// Transactions processed in the window, votes excluded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub num_non_vote_transactions: u64,

    /// Slots produced in the window.
    pub num_slots: u64,

    /// Length of the window in seconds.
    pub sample_period_secs: f64,
}

impl PerformanceSample {
    /// Create a builder for a sample.
    pub fn builder() -> PerformanceSampleBuilder {
        PerformanceSampleBuilder::new()
    }

    /// Total transactions per second over the window.
    pub fn tps(&self) -> f64 {
        self.num_transactions as f64 / self.sample_period_secs
    }

    /// Non-vote transactions per second over the window.
    pub fn true_tps(&self) -> f64 {
        self.num_non_vote_transactions as f64 / self.sample_period_secs
    }

    /// Whether the period is usable as a divisor.
    pub fn has_valid_period(&self) -> bool {
        self.sample_period_secs.is_finite() && self.sample_period_secs > 0.0
    }
}

/// Builder for [`PerformanceSample`].
#[derive(Debug, Default)]
pub struct PerformanceSampleBuilder {
    sample: PerformanceSample,
}

impl PerformanceSampleBuilder {
    /// Create a new builder. The period defaults to 60 seconds, the
    /// cluster's reporting window.
    pub fn new() -> Self {
        Self {
            sample: PerformanceSample {
                sample_period_secs: 60.0,
                ..PerformanceSample::default()
            },
        }
    }

    pub fn num_transactions(mut self, n: u64) -> Self {
        self.sample.num_transactions = n;
        self
    }

    pub fn num_non_vote_transactions(mut self, n: u64) -> Self {
        self.sample.num_non_vote_transactions = n;
        self
    }

    pub fn num_slots(mut self, n: u64) -> Self {
        self.sample.num_slots = n;
        self
    }

    pub fn sample_period_secs(mut self, secs: f64) -> Self {
        self.sample.sample_period_secs = secs;
        self
    }

    /// Build the sample.
    pub fn build(self) -> PerformanceSample {
        self.sample
    }
}

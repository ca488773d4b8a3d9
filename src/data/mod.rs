//! Telemetry data models and processing.
//!
//! This module turns raw performance sample batches into the small,
//! render-ready [`PerformanceInfo`] state.
//!
//! ## Submodules
//!
//! - [`downsample`]: Online bucket-mean downsampling
//! - [`history`]: Three-resolution TPS history for sparklines
//! - [`performance`]: The telemetry state and its pure reducer
//! - [`format`]: TPS formatting and stats-card readiness
//!
//! ## Data Flow
//!
//! ```text
//! PerformanceSample[] (newest first)
//!        │
//!        ▼
//! reduce(state, SetPerfSamples)
//!        │
//!        ├──▶ avg_tps / true_tps (batch means)
//!        │
//!        └──▶ PerfHistory::from_newest_first()
//!                 short ──downsample(4)──▶ medium ──downsample(3)──▶ long
//! ```

pub mod downsample;
pub mod format;
pub mod history;
pub mod performance;

pub use downsample::downsample;
pub use format::{format_tps, stats_readiness, StatsNotReady, TpsSummary};
pub use history::{PerfHistory, Resolution, MAX_HISTORY_SIZE};
pub use performance::{reduce, ClusterStatsStatus, PerformanceAction, PerformanceInfo};

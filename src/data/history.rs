//! Multi-resolution TPS history for sparklines.

use serde::{Deserialize, Serialize};

use super::downsample::downsample;

/// Maximum number of points kept per resolution.
pub const MAX_HISTORY_SIZE: usize = 30;

/// Samples per medium bucket.
pub const MEDIUM_FACTOR: usize = 4;

/// Medium buckets per long bucket.
pub const LONG_FACTOR: usize = 3;

/// One of the three history resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One point per performance sample.
    Short,
    /// One point per [`MEDIUM_FACTOR`] samples.
    Medium,
    /// One point per [`MEDIUM_FACTOR`] x [`LONG_FACTOR`] samples.
    Long,
}

impl Resolution {
    pub fn all() -> [Resolution; 3] {
        [Resolution::Short, Resolution::Medium, Resolution::Long]
    }

    /// Returns the display label for this resolution.
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Short => "30m",
            Resolution::Medium => "2h",
            Resolution::Long => "6h",
        }
    }
}

/// Rounded TPS history at three resolutions, each ordered oldest to newest
/// and never longer than [`MAX_HISTORY_SIZE`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerfHistory {
    pub short: Vec<f64>,
    pub medium: Vec<f64>,
    pub long: Vec<f64>,
}

impl PerfHistory {
    /// Build the history from per-sample TPS values ordered newest first.
    ///
    /// The medium and long series are downsampled from the full input before
    /// any truncation, then every series is rounded, cut to the newest
    /// [`MAX_HISTORY_SIZE`] points and flipped to chronological order.
    pub fn from_newest_first(short: &[f64]) -> Self {
        let medium = downsample(short, MEDIUM_FACTOR);
        let long = downsample(&medium, LONG_FACTOR);

        Self {
            short: chronological(short),
            medium: chronological(&medium),
            long: chronological(&long),
        }
    }

    /// The series for one resolution.
    pub fn series(&self, resolution: Resolution) -> &[f64] {
        match resolution {
            Resolution::Short => &self.short,
            Resolution::Medium => &self.medium,
            Resolution::Long => &self.long,
        }
    }

    /// Largest value across all three resolutions, or 0 when empty.
    pub fn max_tps(&self) -> f64 {
        self.short
            .iter()
            .chain(&self.medium)
            .chain(&self.long)
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_empty() && self.medium.is_empty() && self.long.is_empty()
    }

    /// Sparkline levels (0-7 for 8 bar heights) scaled against `max_tps`.
    ///
    /// Returns an empty Vec when there is nothing to draw.
    pub fn sparkline(&self, resolution: Resolution, max_tps: f64) -> Vec<u8> {
        let values = self.series(resolution);
        if values.is_empty() {
            return Vec::new();
        }

        let max = if max_tps > 0.0 { max_tps } else { 1.0 };

        values
            .iter()
            .map(|&v| {
                let normalized = (v.max(0.0) / max * 7.0).round() as u8;
                normalized.min(7)
            })
            .collect()
    }
}

fn chronological(newest_first: &[f64]) -> Vec<f64> {
    newest_first
        .iter()
        .take(MAX_HISTORY_SIZE)
        .rev()
        .map(|v| v.round())
        .collect()
}

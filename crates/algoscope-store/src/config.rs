//! Store configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use algoscope_array::{ArrayTiming, RandomConfig};
use algoscope_playback::PlaybackConfig;
use tracing::warn;

use crate::alert::AlertConfig;

/// Allowed array sizes for a trace visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl SizeRange {
    pub fn new(min: usize, max: usize, default: usize) -> Self {
        let (min, max) = (min.min(max), max.max(min));
        Self {
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    pub fn clamp(&self, size: usize) -> usize {
        size.clamp(self.min, self.max)
    }
}

/// Generated-array settings for a trace visualizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    pub size: SizeRange,
    pub values: RangeInclusive<i64>,
}

impl TraceConfig {
    pub fn sort() -> Self {
        Self {
            size: SizeRange::new(2, 200, 20),
            values: 1..=100,
        }
    }

    pub fn search() -> Self {
        Self {
            size: SizeRange::new(5, 100, 20),
            values: 0..=99,
        }
    }

    /// Cut `array` down to the largest allowed size.
    ///
    /// Trace memory grows with the cube of the input length, so anything
    /// past `size.max` is dropped before a trace is generated.
    pub fn fit(&self, mut array: Vec<i64>) -> Vec<i64> {
        if array.len() > self.size.max {
            warn!(len = array.len(), max = self.size.max, "array truncated to maximum size");
            array.truncate(self.size.max);
        }
        array
    }
}

/// Settings for every visualizer a store creates.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub playback: PlaybackConfig,
    pub sort: TraceConfig,
    pub search: TraceConfig,
    pub array_timing: ArrayTiming,
    pub random: RandomConfig,
    pub alert: AlertConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            sort: TraceConfig::sort(),
            search: TraceConfig::search(),
            array_timing: ArrayTiming::default(),
            random: RandomConfig::default(),
            alert: AlertConfig::default(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_base_interval(mut self, base_interval: Duration) -> Self {
        self.playback = self.playback.with_base_interval(base_interval);
        self
    }

    #[must_use]
    pub fn with_playback(mut self, playback: PlaybackConfig) -> Self {
        self.playback = playback;
        self
    }

    #[must_use]
    pub fn with_array_timing(mut self, timing: ArrayTiming) -> Self {
        self.array_timing = timing;
        self
    }

    #[must_use]
    pub fn with_alert(mut self, alert: AlertConfig) -> Self {
        self.alert = alert;
        self
    }
}

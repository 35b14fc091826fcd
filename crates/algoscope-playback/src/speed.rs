//! Playback timing configuration.

use std::time::Duration;

/// Tick timing for a [`Playback`](crate::Playback).
///
/// The delay between ticks is `base_interval / speed`, so larger speeds play
/// faster. Speeds are clamped to `[min_speed, max_speed]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    /// Delay between ticks at speed 1.
    pub base_interval: Duration,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Speed of a freshly created controller.
    pub default_speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_millis(1000),
            min_speed: 1.0,
            max_speed: 10.0,
            default_speed: 5.0,
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn with_base_interval(mut self, base_interval: Duration) -> Self {
        self.base_interval = base_interval;
        self
    }

    /// Set the allowed speed range. Bounds are reordered if given backwards.
    #[must_use]
    pub fn with_speed_range(mut self, min: f64, max: f64) -> Self {
        self.min_speed = min.min(max);
        self.max_speed = max.max(min);
        self.default_speed = self.clamp_speed(self.default_speed);
        self
    }

    #[must_use]
    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = self.clamp_speed(speed);
        self
    }

    /// Clamp `speed` into the configured range.
    ///
    /// Non-finite input falls back to the default speed.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        if !speed.is_finite() {
            return self.default_speed;
        }
        speed.max(self.min_speed).min(self.max_speed)
    }

    /// Delay between ticks at `speed`.
    pub fn interval_for(&self, speed: f64) -> Duration {
        if speed.is_nan() || speed <= 0.0 {
            return self.base_interval;
        }
        // `as` saturates, so huge quotients cannot wrap.
        let nanos = self.base_interval.as_nanos() as f64 / speed;
        Duration::from_nanos(nanos.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_inverse_of_speed() {
        let config = PlaybackConfig::default();
        assert_eq!(config.interval_for(1.0), Duration::from_millis(1000));
        assert_eq!(config.interval_for(5.0), Duration::from_millis(200));
        assert_eq!(config.interval_for(10.0), Duration::from_millis(100));
    }

    #[test]
    fn speed_is_clamped() {
        let config = PlaybackConfig::default();
        assert_eq!(config.clamp_speed(0.2), 1.0);
        assert_eq!(config.clamp_speed(42.0), 10.0);
        assert_eq!(config.clamp_speed(f64::NAN), 5.0);
    }

    #[test]
    fn reversed_range_is_normalized() {
        let config = PlaybackConfig::default().with_speed_range(8.0, 2.0);
        assert_eq!(config.min_speed, 2.0);
        assert_eq!(config.max_speed, 8.0);
        assert_eq!(config.default_speed, 5.0);
    }

    #[test]
    fn zero_speed_uses_base_interval() {
        let config = PlaybackConfig::default();
        assert_eq!(config.interval_for(0.0), config.base_interval);
    }
}

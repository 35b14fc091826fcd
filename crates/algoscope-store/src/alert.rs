//! Dismissible message area.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// How long an alert stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertConfig {
    pub display_for: Duration,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            display_for: Duration::from_secs(10),
        }
    }
}

impl AlertConfig {
    #[must_use]
    pub fn with_display_for(mut self, display_for: Duration) -> Self {
        self.display_for = display_for;
        self
    }
}

/// The message currently on display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Increases with every alert shown; doubles as the expiry token.
    pub id: u64,
    pub message: String,
    pub is_error: bool,
    #[serde(skip)]
    shown_at: Instant,
}

/// Holds the latest alert until it is dismissed, replaced, or expires.
#[derive(Debug, Clone)]
pub struct AlertBoard {
    config: AlertConfig,
    current: Option<Alert>,
    next_id: u64,
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}

impl AlertBoard {
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            current: None,
            next_id: 1,
        }
    }

    /// Show `message`, replacing whatever was up.
    pub fn show(&mut self, message: impl Into<String>, is_error: bool, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(Alert {
            id,
            message: message.into(),
            is_error,
            shown_at: now,
        });
        id
    }

    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    /// Expire alert `id` if it is still the one on display.
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|alert| alert.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The pending expiry as `(id, remaining)`.
    pub fn expiry(&self, now: Instant) -> Option<(u64, Duration)> {
        self.current.as_ref().map(|alert| {
            let elapsed = now.saturating_duration_since(alert.shown_at);
            (alert.id, self.config.display_for.saturating_sub(elapsed))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_alert_replaces_older() {
        let mut board = AlertBoard::default();
        let now = Instant::now();
        let first = board.show("one", false, now);
        let second = board.show("two", true, now);

        assert_ne!(first, second);
        assert_eq!(board.current().unwrap().message, "two");
        // The first alert's expiry no longer applies.
        assert!(!board.expire(first));
        assert!(board.current().is_some());
        assert!(board.expire(second));
        assert!(board.current().is_none());
    }

    #[test]
    fn expiry_counts_down() {
        let mut board = AlertBoard::default();
        let now = Instant::now();
        let id = board.show("hi", false, now);

        assert_eq!(board.expiry(now), Some((id, Duration::from_secs(10))));
        assert_eq!(
            board.expiry(now + Duration::from_secs(4)),
            Some((id, Duration::from_secs(6)))
        );
        assert_eq!(
            board.expiry(now + Duration::from_secs(30)),
            Some((id, Duration::ZERO))
        );
    }

    #[test]
    fn dismiss_clears() {
        let mut board = AlertBoard::new(AlertConfig::default().with_display_for(Duration::from_secs(1)));
        assert!(!board.dismiss());
        board.show("x", false, Instant::now());
        assert!(board.dismiss());
        assert!(board.expiry(Instant::now()).is_none());
    }
}

//! Playback controller for precomputed traces.

use std::time::Duration;

use algoscope_trace::{Step, Trace};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::speed::PlaybackConfig;

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// At rest; derived step state is not shown.
    #[default]
    Idle,
    /// Advancing on each tick.
    Playing,
    /// Frozen mid-trace.
    Paused,
    /// Reached a terminal step.
    Complete,
}

/// Result of delivering a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved to the given position.
    Advanced(usize),
    /// Cursor is on a terminal step (or the end) and playback completed.
    Completed(usize),
    /// Token belongs to an older generation; nothing changed.
    Stale,
    /// Not playing; nothing changed.
    Ignored,
}

/// Playback controller for a step trace.
#[derive(Debug, Clone)]
pub struct Playback<S> {
    trace: Trace<S>,
    position: usize,
    state: PlaybackState,
    speed: f64,
    presenting: bool,
    generation: u64,
    config: PlaybackConfig,
}

impl<S: Step> Playback<S> {
    /// Create a controller at position 0 / Idle.
    pub fn new(trace: Trace<S>) -> Self {
        Self::with_config(trace, PlaybackConfig::default())
    }

    pub fn with_config(trace: Trace<S>, config: PlaybackConfig) -> Self {
        Self {
            trace,
            position: 0,
            state: PlaybackState::Idle,
            speed: config.default_speed,
            presenting: false,
            generation: 0,
            config,
        }
    }

    pub fn trace(&self) -> &Trace<S> {
        &self.trace
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Token a tick must carry to be committed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn total_steps(&self) -> usize {
        self.trace.len()
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// The step whose derived state is on display.
    ///
    /// `None` while idle at rest, so comparisons, visited sets and markers
    /// render cleared after a reset.
    pub fn current_step(&self) -> Option<&S> {
        if self.presenting {
            self.trace.get(self.position)
        } else {
            None
        }
    }

    /// The step under the cursor regardless of presentation.
    pub fn step_at_cursor(&self) -> Option<&S> {
        self.trace.get(self.position)
    }

    /// Delay until the next tick at the current speed.
    pub fn tick_interval(&self) -> Duration {
        self.config.interval_for(self.speed)
    }

    /// The tick the owner should schedule: `(token, delay)` while playing.
    pub fn pending_tick(&self) -> Option<(u64, Duration)> {
        self.is_playing()
            .then(|| (self.generation, self.tick_interval()))
    }

    /// Fraction of the trace played, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        match self.trace.last_index() {
            None => 0.0,
            Some(0) if self.state == PlaybackState::Complete => 1.0,
            Some(0) => 0.0,
            Some(last) => self.position as f64 / last as f64,
        }
    }

    /// Idle → Playing.
    ///
    /// No-op unless idle. An empty trace, or a terminal step under the
    /// cursor, completes immediately.
    pub fn start(&mut self) {
        if self.state != PlaybackState::Idle {
            debug!(state = ?self.state, "start ignored");
            return;
        }

        self.invalidate();
        self.presenting = true;
        if self.step_at_cursor().map_or(true, Step::is_terminal) {
            self.state = PlaybackState::Complete;
        } else {
            self.state = PlaybackState::Playing;
        }
        debug!(position = self.position, state = ?self.state, "playback started");
    }

    /// Playing → Paused. The cursor freezes and the step under it stays on
    /// display.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.invalidate();
        self.state = PlaybackState::Paused;
        self.presenting = true;
        debug!(position = self.position, "playback paused");
    }

    /// Paused → Playing.
    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.invalidate();
        self.state = PlaybackState::Playing;
        debug!(position = self.position, "playback resumed");
    }

    /// Advance one step if `token` matches the current generation.
    pub fn tick(&mut self, token: u64) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Ignored;
        }
        if token != self.generation {
            debug!(token, generation = self.generation, "stale tick dropped");
            return TickOutcome::Stale;
        }

        let Some(last) = self.trace.last_index() else {
            self.state = PlaybackState::Complete;
            return TickOutcome::Completed(self.position);
        };

        if self.position >= last {
            self.state = PlaybackState::Complete;
            return TickOutcome::Completed(self.position);
        }

        self.position += 1;
        if self.trace[self.position].is_terminal() {
            self.state = PlaybackState::Complete;
            debug!(position = self.position, "playback complete");
            TickOutcome::Completed(self.position)
        } else {
            TickOutcome::Advanced(self.position)
        }
    }

    /// Any state → Idle at position 0 with derived state cleared.
    pub fn reset(&mut self) {
        self.invalidate();
        self.position = 0;
        self.state = PlaybackState::Idle;
        self.presenting = false;
    }

    /// Move one step forward. Ignored while playing.
    pub fn step_forward(&mut self) {
        if self.is_playing() {
            return;
        }
        if let Some(last) = self.trace.last_index() {
            self.present((self.position + 1).min(last));
        }
    }

    /// Move one step back. Ignored while playing.
    pub fn step_backward(&mut self) {
        if self.is_playing() {
            return;
        }
        if !self.trace.is_empty() {
            self.present(self.position.saturating_sub(1));
        }
    }

    /// Jump to `position`, clamped to the trace. Ignored while playing.
    pub fn seek(&mut self, position: usize) {
        if self.is_playing() {
            return;
        }
        if let Some(last) = self.trace.last_index() {
            self.present(position.min(last));
        }
    }

    /// Change speed. While playing the pending tick is invalidated so the
    /// next one is scheduled with the new interval.
    pub fn set_speed(&mut self, speed: f64) {
        let speed = self.config.clamp_speed(speed);
        if speed == self.speed {
            return;
        }
        self.speed = speed;
        if self.is_playing() {
            self.invalidate();
        }
        debug!(speed, "playback speed changed");
    }

    /// Replace the trace and return to Idle at position 0.
    pub fn load(&mut self, trace: Trace<S>) {
        self.trace = trace;
        self.reset();
    }

    /// Rehydrate cursor fields from persisted state.
    ///
    /// The position is clamped to the current trace; a playing cursor that
    /// lands on a terminal step is restored as complete.
    pub fn restore(&mut self, position: usize, speed: f64, state: PlaybackState) {
        self.invalidate();
        self.speed = self.config.clamp_speed(speed);
        self.position = position.min(self.trace.last_index().unwrap_or(0));
        self.state = state;
        self.presenting = state != PlaybackState::Idle || self.position != 0;

        if self.state == PlaybackState::Playing
            && self.step_at_cursor().map_or(true, Step::is_terminal)
        {
            self.state = PlaybackState::Complete;
        }
    }

    fn present(&mut self, position: usize) {
        self.position = position;
        self.presenting = true;

        let finished =
            self.trace.last_index() == Some(position) && self.trace[position].is_terminal();
        match self.state {
            PlaybackState::Paused if finished => self.state = PlaybackState::Complete,
            // Stepping off the final step can be resumed from.
            PlaybackState::Complete if !finished => self.state = PlaybackState::Paused,
            _ => {}
        }
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_trace::{generate_search_trace, generate_sort_trace, SortStep};
    use proptest::prelude::*;

    fn sort_playback(input: &[i64]) -> Playback<SortStep> {
        Playback::new(generate_sort_trace(input))
    }

    fn drain(playback: &mut Playback<impl Step>) {
        while let Some((token, _)) = playback.pending_tick() {
            playback.tick(token);
        }
    }

    #[test]
    fn starts_idle_at_zero() {
        let playback = sort_playback(&[3, 2, 1]);
        assert_eq!(playback.position(), 0);
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(playback.current_step().is_none());
        assert!(playback.pending_tick().is_none());
    }

    #[test]
    fn start_on_empty_trace_completes() {
        let mut playback: Playback<SortStep> = Playback::new(Trace::empty());
        playback.start();
        assert_eq!(playback.state(), PlaybackState::Complete);
        assert!(playback.pending_tick().is_none());
    }

    #[test]
    fn start_on_single_step_trace_completes() {
        let mut playback = sort_playback(&[1]);
        playback.start();
        assert_eq!(playback.state(), PlaybackState::Complete);
        assert!(playback.current_step().is_some());
    }

    #[test]
    fn start_while_playing_is_noop() {
        let mut playback = sort_playback(&[3, 2, 1]);
        playback.start();
        let generation = playback.generation();
        playback.start();
        assert_eq!(playback.generation(), generation);
        assert!(playback.is_playing());
    }

    #[test]
    fn start_does_not_leave_complete() {
        let mut playback = sort_playback(&[2, 1]);
        playback.start();
        drain(&mut playback);
        playback.start();
        assert_eq!(playback.state(), PlaybackState::Complete);
    }

    #[test]
    fn pause_freezes_cursor_and_invalidates_tick() {
        let mut playback = sort_playback(&[4, 3, 2, 1]);
        playback.start();
        let (token, _) = playback.pending_tick().unwrap();
        playback.tick(token);
        playback.tick(token);

        playback.pause();
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.position(), 2);
        assert!(playback.pending_tick().is_none());
        assert_eq!(playback.current_step(), playback.trace().get(2));

        // A tick scheduled before the pause cannot move the cursor.
        assert_eq!(playback.tick(token), TickOutcome::Ignored);
        playback.resume();
        assert_eq!(playback.tick(token), TickOutcome::Stale);
        assert_eq!(playback.position(), 2);
    }

    #[test]
    fn resume_only_from_paused() {
        let mut playback = sort_playback(&[2, 1]);
        playback.resume();
        assert_eq!(playback.state(), PlaybackState::Idle);

        playback.start();
        playback.pause();
        playback.resume();
        assert!(playback.is_playing());
    }

    #[test]
    fn stepping_is_refused_while_playing() {
        let mut playback = sort_playback(&[3, 2, 1]);
        playback.start();
        playback.step_forward();
        playback.seek(4);
        assert_eq!(playback.position(), 0);
    }

    #[test]
    fn stepping_clamps_silently() {
        let mut playback = sort_playback(&[2, 1]);
        playback.step_backward();
        assert_eq!(playback.position(), 0);

        for _ in 0..10 {
            playback.step_forward();
        }
        assert_eq!(playback.position(), 2);
        // Idle stays idle even on the terminal step.
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert!(playback.current_step().is_some());
    }

    #[test]
    fn stepping_to_terminal_end_while_paused_completes() {
        let mut playback = sort_playback(&[2, 1]);
        playback.start();
        playback.pause();
        playback.step_forward();
        assert_eq!(playback.state(), PlaybackState::Paused);
        playback.step_forward();
        assert_eq!(playback.state(), PlaybackState::Complete);
    }

    #[test]
    fn leaving_the_end_after_completion_pauses() {
        let mut playback = sort_playback(&[3, 1, 2]);
        playback.start();
        drain(&mut playback);
        assert_eq!(playback.state(), PlaybackState::Complete);
        let last = playback.position();

        playback.step_backward();
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.position(), last - 1);

        playback.resume();
        let (token, _) = playback.pending_tick().unwrap();
        assert_eq!(playback.tick(token), TickOutcome::Completed(last));
        assert_eq!(playback.state(), PlaybackState::Complete);

        playback.seek(0);
        assert_eq!(playback.state(), PlaybackState::Paused);
        playback.seek(last);
        assert_eq!(playback.state(), PlaybackState::Complete);
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut playback = sort_playback(&[5, 4, 3]);
        let last = playback.trace().last_index().unwrap();

        playback.seek(2);
        assert_eq!(playback.position(), 2);

        playback.seek(100);
        assert_eq!(playback.position(), last);

        playback.seek(0);
        assert_eq!(playback.position(), 0);
    }

    #[test]
    fn speed_change_while_playing_reschedules() {
        let mut playback = sort_playback(&[3, 2, 1]);
        playback.start();
        let (before, interval) = playback.pending_tick().unwrap();
        assert_eq!(interval, Duration::from_millis(200));

        playback.set_speed(10.0);
        let (after, interval) = playback.pending_tick().unwrap();
        assert_ne!(before, after);
        assert_eq!(interval, Duration::from_millis(100));
        assert_eq!(playback.tick(before), TickOutcome::Stale);

        // Same speed again is not a change.
        playback.set_speed(10.0);
        assert_eq!(playback.generation(), after);
    }

    #[test]
    fn speed_change_while_paused_keeps_generation() {
        let mut playback = sort_playback(&[3, 2, 1]);
        playback.start();
        playback.pause();
        let generation = playback.generation();
        playback.set_speed(2.0);
        assert_eq!(playback.generation(), generation);
        assert_eq!(playback.speed(), 2.0);
    }

    #[test]
    fn load_replaces_trace_and_resets() {
        let mut playback = sort_playback(&[3, 2, 1]);
        playback.start();
        let (token, _) = playback.pending_tick().unwrap();
        playback.tick(token);

        playback.load(generate_sort_trace(&[9, 8]));
        assert_eq!(playback.state(), PlaybackState::Idle);
        assert_eq!(playback.position(), 0);
        assert_eq!(playback.total_steps(), 3);
        assert_eq!(playback.tick(token), TickOutcome::Ignored);
    }

    #[test]
    fn restore_clamps_out_of_range_position() {
        let mut playback = Playback::new(generate_search_trace(&[1, 2], 2));
        playback.restore(40, 3.0, PlaybackState::Paused);
        assert_eq!(playback.position(), 1);
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.speed(), 3.0);
    }

    #[test]
    fn restore_playing_on_terminal_step_completes() {
        let mut playback = Playback::new(generate_search_trace(&[1, 2], 2));
        playback.restore(1, 5.0, PlaybackState::Playing);
        assert_eq!(playback.state(), PlaybackState::Complete);
    }

    #[test]
    fn progress_reaches_one() {
        let mut playback = sort_playback(&[2, 1]);
        assert_eq!(playback.progress(), 0.0);
        playback.start();
        drain(&mut playback);
        assert_eq!(playback.progress(), 1.0);

        let mut single = sort_playback(&[]);
        single.start();
        assert_eq!(single.progress(), 1.0);
    }

    proptest! {
        #[test]
        fn reset_always_returns_to_idle_zero(
            input in prop::collection::vec(0i64..50, 0..12),
            ops in prop::collection::vec(0u8..7, 0..40),
        ) {
            let mut playback = sort_playback(&input);
            for op in ops {
                match op {
                    0 => playback.start(),
                    1 => playback.pause(),
                    2 => playback.resume(),
                    3 => playback.step_forward(),
                    4 => playback.step_backward(),
                    5 => {
                        if let Some((token, _)) = playback.pending_tick() {
                            playback.tick(token);
                        }
                    }
                    _ => playback.set_speed(1.0 + f64::from(op)),
                }
            }

            playback.reset();
            prop_assert_eq!(playback.position(), 0);
            prop_assert_eq!(playback.state(), PlaybackState::Idle);
            prop_assert!(playback.current_step().is_none());
            prop_assert!(playback.pending_tick().is_none());
        }

        #[test]
        fn ticks_advance_by_exactly_one(input in prop::collection::vec(0i64..50, 2..12)) {
            let mut playback = sort_playback(&input);
            playback.start();
            let mut previous = playback.position();
            while let Some((token, _)) = playback.pending_tick() {
                match playback.tick(token) {
                    TickOutcome::Advanced(position) | TickOutcome::Completed(position) => {
                        prop_assert_eq!(position, previous + 1);
                        previous = position;
                    }
                    other => prop_assert!(false, "unexpected outcome {:?}", other),
                }
            }
            prop_assert_eq!(playback.state(), PlaybackState::Complete);
            prop_assert_eq!(Some(previous), playback.trace().last_index());
        }
    }
}

//! Serializable playback view.

use algoscope_trace::Step;
use serde::{Deserialize, Serialize};

use crate::controller::{Playback, PlaybackState};

/// Snapshot of a [`Playback`] for renderers and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStatus<S> {
    pub position: usize,
    pub total_steps: usize,
    pub state: PlaybackState,
    pub speed: f64,
    pub progress: f64,
    /// Step on display; absent while idle at rest.
    pub step: Option<S>,
}

impl<S: Step> From<&Playback<S>> for PlaybackStatus<S> {
    fn from(playback: &Playback<S>) -> Self {
        Self {
            position: playback.position(),
            total_steps: playback.total_steps(),
            state: playback.state(),
            speed: playback.speed(),
            progress: playback.progress(),
            step: playback.current_step().cloned(),
        }
    }
}

//! The interface a session runtime drives.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use algoscope_playback::Playback;
use algoscope_trace::Step;
use rand::{Rng, RngCore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::VisualizerKind;

/// A visualizer's state plus its transition rules.
///
/// The owner feeds it commands and fired timers, reconciles its single
/// timer with [`pending_timer`](Self::pending_timer) after each call, and
/// publishes [`view`](Self::view).
pub trait Visualizer: Send + 'static {
    type Command: DeserializeOwned + fmt::Debug + Send + 'static;
    type View: Serialize + Clone + fmt::Debug + Send + Sync + 'static;
    type Persisted: Serialize + DeserializeOwned;
    /// Identifies one scheduled timer.
    type Token: Clone + PartialEq + fmt::Debug + Send + 'static;

    fn kind(&self) -> VisualizerKind;

    /// Persistence key for [`snapshot`](Self::snapshot).
    fn storage_key(&self) -> &'static str {
        self.kind().storage_key()
    }

    fn apply(&mut self, command: Self::Command, rng: &mut dyn RngCore);

    fn fire(&mut self, token: Self::Token);

    /// The timer this state wants armed, as `(token, delay)`.
    fn pending_timer(&self) -> Option<(Self::Token, Duration)>;

    fn view(&self) -> Self::View;

    /// Whitelisted fields to persist.
    fn snapshot(&self) -> Self::Persisted;

    /// Rebuild derived state from a snapshot.
    fn hydrate(&mut self, persisted: Self::Persisted);
}

/// Commands accepted by the trace-based visualizers.
///
/// `SetTarget` only applies to searching; the sort visualizer ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceCommand {
    Start,
    Pause,
    Resume,
    Reset,
    StepForward,
    StepBackward,
    Seek {
        position: usize,
    },
    SetSpeed {
        speed: f64,
    },
    SetArray {
        array: Vec<i64>,
    },
    /// New random array, optionally at a new size.
    GenerateArray {
        #[serde(default)]
        size: Option<usize>,
    },
    /// Change the size and generate a matching random array.
    SetArraySize {
        size: usize,
    },
    SetTarget {
        target: i64,
    },
}

/// Apply the playback subset of `command`. Returns `false` for commands that
/// change the input instead.
pub(crate) fn apply_playback<S: Step>(playback: &mut Playback<S>, command: &TraceCommand) -> bool {
    match *command {
        TraceCommand::Start => playback.start(),
        TraceCommand::Pause => playback.pause(),
        TraceCommand::Resume => playback.resume(),
        TraceCommand::Reset => playback.reset(),
        TraceCommand::StepForward => playback.step_forward(),
        TraceCommand::StepBackward => playback.step_backward(),
        TraceCommand::Seek { position } => playback.seek(position),
        TraceCommand::SetSpeed { speed } => playback.set_speed(speed),
        TraceCommand::SetArray { .. }
        | TraceCommand::GenerateArray { .. }
        | TraceCommand::SetArraySize { .. }
        | TraceCommand::SetTarget { .. } => return false,
    }
    true
}

pub(crate) fn random_values(len: usize, values: &RangeInclusive<i64>, rng: &mut dyn RngCore) -> Vec<i64> {
    let (start, end) = (*values.start(), *values.end());
    let values = start.min(end)..=start.max(end);
    (0..len).map(|_| rng.gen_range(values.clone())).collect()
}

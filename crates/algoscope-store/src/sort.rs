//! Bubble sort visualizer state.

use std::time::Duration;

use algoscope_playback::{Playback, PlaybackState, PlaybackStatus};
use algoscope_trace::{generate_sort_trace, SortStep, Trace};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::VisualizerKind;
use crate::config::{StoreConfig, TraceConfig};
use crate::visualizer::{apply_playback, random_values, TraceCommand, Visualizer};

/// Renderer view of the sort visualizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortView {
    pub kind: VisualizerKind,
    /// Array as of the step on display, or the input array at rest.
    pub array: Vec<i64>,
    pub array_size: usize,
    pub comparisons: usize,
    pub swaps: usize,
    pub playback: PlaybackStatus<SortStep>,
}

/// Fields of [`SortVisualizerState`] that survive a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortPersisted {
    pub array: Vec<i64>,
    pub array_size: usize,
    pub position: usize,
    pub speed: f64,
    pub state: PlaybackState,
}

/// Input array, its trace, and the playback cursor.
#[derive(Debug, Clone)]
pub struct SortVisualizerState {
    array: Vec<i64>,
    array_size: usize,
    playback: Playback<SortStep>,
    config: TraceConfig,
}

impl Default for SortVisualizerState {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl SortVisualizerState {
    /// Fresh state: empty array at the default size.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            array: Vec::new(),
            array_size: config.sort.size.default,
            playback: Playback::with_config(generate_sort_trace(&[]), config.playback),
            config: config.sort.clone(),
        }
    }

    pub fn array(&self) -> &[i64] {
        &self.array
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }

    pub fn playback(&self) -> &Playback<SortStep> {
        &self.playback
    }

    pub fn trace(&self) -> &Trace<SortStep> {
        self.playback.trace()
    }

    /// Replace the input and start over with a fresh trace. Arrays longer
    /// than the configured maximum are truncated to it.
    pub fn set_array(&mut self, array: Vec<i64>) {
        let array = self.config.fit(array);
        if !array.is_empty() {
            self.array_size = self.config.size.clamp(array.len());
        }
        self.playback.load(generate_sort_trace(&array));
        self.array = array;
        debug!(len = self.array.len(), steps = self.playback.total_steps(), "sort trace regenerated");
    }

    pub fn generate_array(&mut self, rng: &mut dyn RngCore) {
        let array = random_values(self.array_size, &self.config.values, rng);
        self.set_array(array);
    }

    pub fn set_array_size(&mut self, size: usize, rng: &mut dyn RngCore) {
        self.array_size = self.config.size.clamp(size);
        self.generate_array(rng);
    }
}

impl Visualizer for SortVisualizerState {
    type Command = TraceCommand;
    type View = SortView;
    type Persisted = SortPersisted;
    type Token = u64;

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::BubbleSort
    }

    fn apply(&mut self, command: TraceCommand, rng: &mut dyn RngCore) {
        if apply_playback(&mut self.playback, &command) {
            return;
        }
        match command {
            TraceCommand::SetArray { array } => self.set_array(array),
            TraceCommand::GenerateArray { size: Some(size) } => self.set_array_size(size, rng),
            TraceCommand::GenerateArray { size: None } => self.generate_array(rng),
            TraceCommand::SetArraySize { size } => self.set_array_size(size, rng),
            other => debug!(command = ?other, "ignored by sort visualizer"),
        }
    }

    fn fire(&mut self, token: u64) {
        self.playback.tick(token);
    }

    fn pending_timer(&self) -> Option<(u64, Duration)> {
        self.playback.pending_tick()
    }

    fn view(&self) -> SortView {
        let status = PlaybackStatus::from(&self.playback);
        let array = status
            .step
            .as_ref()
            .map_or_else(|| self.array.clone(), |step| step.array.clone());
        let trace = self.playback.trace();
        SortView {
            kind: self.kind(),
            array,
            array_size: self.array_size,
            comparisons: trace.comparisons(),
            swaps: trace.swaps(),
            playback: status,
        }
    }

    fn snapshot(&self) -> SortPersisted {
        SortPersisted {
            array: self.array.clone(),
            array_size: self.array_size,
            position: self.playback.position(),
            speed: self.playback.speed(),
            state: self.playback.state(),
        }
    }

    fn hydrate(&mut self, persisted: SortPersisted) {
        self.array_size = self.config.size.clamp(persisted.array_size);
        self.set_array(persisted.array);
        self.playback
            .restore(persisted.position, persisted.speed, persisted.state);
    }
}

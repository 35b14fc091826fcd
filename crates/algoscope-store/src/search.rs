//! Linear search visualizer state.

use std::time::Duration;

use algoscope_playback::{Playback, PlaybackState, PlaybackStatus};
use algoscope_trace::{generate_search_trace, SearchStep, Trace};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::VisualizerKind;
use crate::config::{StoreConfig, TraceConfig};
use crate::visualizer::{apply_playback, random_values, TraceCommand, Visualizer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub kind: VisualizerKind,
    pub array: Vec<i64>,
    pub array_size: usize,
    pub target: i64,
    pub playback: PlaybackStatus<SearchStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPersisted {
    pub array: Vec<i64>,
    pub array_size: usize,
    pub target: i64,
    pub position: usize,
    pub speed: f64,
    pub state: PlaybackState,
}

/// Input array, search target, their trace, and the playback cursor.
#[derive(Debug, Clone)]
pub struct SearchVisualizerState {
    array: Vec<i64>,
    array_size: usize,
    target: i64,
    playback: Playback<SearchStep>,
    config: TraceConfig,
}

impl Default for SearchVisualizerState {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl SearchVisualizerState {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            array: Vec::new(),
            array_size: config.search.size.default,
            target: 0,
            playback: Playback::with_config(generate_search_trace(&[], 0), config.playback),
            config: config.search.clone(),
        }
    }

    pub fn array(&self) -> &[i64] {
        &self.array
    }

    pub fn array_size(&self) -> usize {
        self.array_size
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    pub fn playback(&self) -> &Playback<SearchStep> {
        &self.playback
    }

    pub fn trace(&self) -> &Trace<SearchStep> {
        self.playback.trace()
    }

    /// Replace the input. Arrays longer than the configured maximum are
    /// truncated to it.
    pub fn set_array(&mut self, array: Vec<i64>) {
        self.accept_array(array);
        self.regenerate();
    }

    pub fn set_target(&mut self, target: i64) {
        self.target = target;
        self.regenerate();
    }

    pub fn generate_array(&mut self, rng: &mut dyn RngCore) {
        let array = random_values(self.array_size, &self.config.values, rng);
        self.set_array(array);
    }

    pub fn set_array_size(&mut self, size: usize, rng: &mut dyn RngCore) {
        self.array_size = self.config.size.clamp(size);
        self.generate_array(rng);
    }

    fn accept_array(&mut self, array: Vec<i64>) {
        let array = self.config.fit(array);
        if !array.is_empty() {
            self.array_size = self.config.size.clamp(array.len());
        }
        self.array = array;
    }

    fn regenerate(&mut self) {
        self.playback
            .load(generate_search_trace(&self.array, self.target));
        debug!(
            len = self.array.len(),
            target = self.target,
            steps = self.playback.total_steps(),
            "search trace regenerated"
        );
    }
}

impl Visualizer for SearchVisualizerState {
    type Command = TraceCommand;
    type View = SearchView;
    type Persisted = SearchPersisted;
    type Token = u64;

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::LinearSearch
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
            TraceCommand::SetTarget { target } => self.set_target(target),
            other => debug!(command = ?other, "ignored by search visualizer"),
        }
    }

    fn fire(&mut self, token: u64) {
        self.playback.tick(token);
    }

    fn pending_timer(&self) -> Option<(u64, Duration)> {
        self.playback.pending_tick()
    }

    fn view(&self) -> SearchView {
        SearchView {
            kind: self.kind(),
            array: self.array.clone(),
            array_size: self.array_size,
            target: self.target,
            playback: PlaybackStatus::from(&self.playback),
        }
    }

    fn snapshot(&self) -> SearchPersisted {
        SearchPersisted {
            array: self.array.clone(),
            array_size: self.array_size,
            target: self.target,
            position: self.playback.position(),
            speed: self.playback.speed(),
            state: self.playback.state(),
        }
    }

    fn hydrate(&mut self, persisted: SearchPersisted) {
        self.array_size = self.config.size.clamp(persisted.array_size);
        self.accept_array(persisted.array);
        self.target = persisted.target;
        self.regenerate();
        self.playback
            .restore(persisted.position, persisted.speed, persisted.state);
    }
}

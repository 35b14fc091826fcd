//! Basic array operations visualizer state.

use std::time::Duration;

use algoscope_array::{ArrayContext, ArrayEngine, OperationInput, OperationKind, OperationOutcome};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::alert::{Alert, AlertBoard};
use crate::catalog::VisualizerKind;
use crate::config::StoreConfig;
use crate::visualizer::Visualizer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArrayCommand {
    /// Submit an operation from the controls.
    Run(OperationInput),
    DismissAlert,
}

/// Timers of the array visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayTimer {
    /// Next stage of the in-flight operation.
    Stage(u64),
    /// Expiry of the alert with this id.
    Alert(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayView {
    pub kind: VisualizerKind,
    #[serde(flatten)]
    pub context: ArrayContext,
    pub in_flight: Option<OperationKind>,
    pub alert: Option<Alert>,
}

/// Array engine plus the alert area showing its messages.
#[derive(Debug, Clone)]
pub struct ArrayVisualizerState {
    engine: ArrayEngine,
    alerts: AlertBoard,
    /// Absolute deadline of the engine's next stage, keyed by its token.
    stage_due: Option<(u64, Instant)>,
}

impl Default for ArrayVisualizerState {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl ArrayVisualizerState {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            engine: ArrayEngine::with_config(config.array_timing, config.random.clone()),
            alerts: AlertBoard::new(config.alert),
            stage_due: None,
        }
    }

    pub fn engine(&self) -> &ArrayEngine {
        &self.engine
    }

    pub fn alerts(&self) -> &AlertBoard {
        &self.alerts
    }

    fn publish(&mut self, outcome: Option<OperationOutcome>, now: Instant) {
        if let Some(outcome) = outcome {
            self.alerts.show(outcome.message, outcome.is_error, now);
        }
    }

    /// Pin the engine's next stage to a deadline. Stage delays are relative
    /// to the previous stage, so the deadline is taken once per token.
    fn track_stage(&mut self, now: Instant) {
        self.stage_due = match (self.engine.pending_stage(), self.stage_due) {
            (Some((token, _)), Some((due_token, due))) if token == due_token => Some((token, due)),
            (Some((token, delay)), _) => Some((token, now + delay)),
            (None, _) => None,
        };
    }
}

impl Visualizer for ArrayVisualizerState {
    type Command = ArrayCommand;
    type View = ArrayView;
    type Persisted = ArrayContext;
    type Token = ArrayTimer;

    fn kind(&self) -> VisualizerKind {
        VisualizerKind::BasicArrayOperations
    }

    fn apply(&mut self, command: ArrayCommand, rng: &mut dyn RngCore) {
        let now = Instant::now();
        match command {
            ArrayCommand::Run(input) => {
                let outcome = self.engine.submit_input(&input, rng);
                self.publish(outcome, now);
            }
            ArrayCommand::DismissAlert => {
                self.alerts.dismiss();
            }
        }
        self.track_stage(now);
    }

    fn fire(&mut self, token: ArrayTimer) {
        let now = Instant::now();
        match token {
            ArrayTimer::Stage(token) => {
                let outcome = self.engine.advance(token);
                self.publish(outcome, now);
            }
            ArrayTimer::Alert(id) => {
                self.alerts.expire(id);
            }
        }
        self.track_stage(now);
    }

    /// Whichever of the next stage and the alert expiry comes first, with
    /// the time left until it is due.
    fn pending_timer(&self) -> Option<(ArrayTimer, Duration)> {
        let now = Instant::now();
        let stage = self
            .stage_due
            .map(|(token, due)| (ArrayTimer::Stage(token), due.saturating_duration_since(now)));
        let alert = self
            .alerts
            .expiry(now)
            .map(|(id, delay)| (ArrayTimer::Alert(id), delay));

        match (stage, alert) {
            (Some(stage), Some(alert)) => Some(if alert.1 < stage.1 { alert } else { stage }),
            (stage, alert) => stage.or(alert),
        }
    }

    fn view(&self) -> ArrayView {
        ArrayView {
            kind: self.kind(),
            context: self.engine.context().clone(),
            in_flight: self.engine.in_flight(),
            alert: self.alerts.current().cloned(),
        }
    }

    fn snapshot(&self) -> ArrayContext {
        self.engine.context().clone()
    }

    fn hydrate(&mut self, persisted: ArrayContext) {
        self.engine.restore(persisted);
        self.track_stage(Instant::now());
    }
}

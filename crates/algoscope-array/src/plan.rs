//! Validation and staging of array operations.
//!
//! A valid operation becomes a [`Plan`]: an ordered list of [`Stage`]s, each
//! applied `delay` after the previous one. The first stage always has zero
//! delay and is applied as soon as the operation is accepted. Only the last
//! stage carries the operation's message.

use std::collections::VecDeque;
use std::time::Duration;

use rand::RngCore;

use crate::context::{ArrayContext, OperationOutcome, Phase};
use crate::error::{OperationError, OperationKind, Result};
use crate::operation::Operation;
use crate::random::{random_array, shuffle, RandomConfig};

/// Settle delays for the animated mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayTiming {
    /// Inserting → settled.
    pub insert_settle: Duration,
    /// Deleting → element removed.
    pub delete_remove: Duration,
    /// Element removed → settled.
    pub delete_settle: Duration,
    /// Updating → settled.
    pub update_settle: Duration,
}

impl Default for ArrayTiming {
    fn default() -> Self {
        Self {
            insert_settle: Duration::from_millis(500),
            delete_remove: Duration::from_millis(400),
            delete_settle: Duration::from_millis(300),
            update_settle: Duration::from_millis(500),
        }
    }
}

impl ArrayTiming {
    /// All delays zero; every stage becomes due immediately.
    pub fn immediate() -> Self {
        Self {
            insert_settle: Duration::ZERO,
            delete_remove: Duration::ZERO,
            delete_settle: Duration::ZERO,
            update_settle: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_insert_settle(mut self, delay: Duration) -> Self {
        self.insert_settle = delay;
        self
    }

    #[must_use]
    pub fn with_delete_delays(mut self, remove: Duration, settle: Duration) -> Self {
        self.delete_remove = remove;
        self.delete_settle = settle;
        self
    }

    #[must_use]
    pub fn with_update_settle(mut self, delay: Duration) -> Self {
        self.update_settle = delay;
        self
    }
}

/// One state change of a staged operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Wait after the previous stage.
    pub delay: Duration,
    pub phase: Phase,
    /// Replacement array, if this stage changes it.
    pub array: Option<Vec<i64>>,
    pub pending_index: Option<usize>,
    pub pending_element: Option<i64>,
    /// Set on the final stage only.
    pub outcome: Option<OperationOutcome>,
}

impl Stage {
    fn immediate(phase: Phase) -> Self {
        Self {
            delay: Duration::ZERO,
            phase,
            array: None,
            pending_index: None,
            pending_element: None,
            outcome: None,
        }
    }

    fn after(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::immediate(Phase::Idle)
        }
    }

    fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    fn with_array(mut self, array: Vec<i64>) -> Self {
        self.array = Some(array);
        self
    }

    fn with_pending(mut self, index: usize, element: i64) -> Self {
        self.pending_index = Some(index);
        self.pending_element = Some(element);
        self
    }

    fn with_outcome(mut self, outcome: OperationOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Write this stage into `context`.
    pub fn apply(self, context: &mut ArrayContext) -> Option<OperationOutcome> {
        if let Some(array) = self.array {
            context.array = array;
        }
        context.phase = self.phase;
        context.pending_index = self.pending_index;
        context.pending_element = self.pending_element;
        if let Some(outcome) = &self.outcome {
            context.record(outcome);
        }
        self.outcome
    }
}

/// The stages of one accepted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub operation: OperationKind,
    pub stages: VecDeque<Stage>,
}

impl Plan {
    fn new(operation: OperationKind, stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            operation,
            stages: stages.into_iter().collect(),
        }
    }

    /// Whether the plan finishes in its first stage.
    pub fn is_immediate(&self) -> bool {
        self.stages.len() <= 1
    }

    /// Sum of all stage delays.
    pub fn duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.delay).sum()
    }
}

/// Check that `index` addresses `[0, limit]`.
fn checked_index(op: OperationKind, index: i64, len: usize, limit: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i <= limit)
        .ok_or(OperationError::IndexOutOfBounds { op, index, len })
}

fn existing_index(op: OperationKind, index: i64, len: usize) -> Result<usize> {
    match len.checked_sub(1) {
        Some(last) => checked_index(op, index, len, last),
        None => Err(OperationError::IndexOutOfBounds { op, index, len }),
    }
}

/// Validate `operation` against `array` and build its stages.
///
/// Randomness is only drawn for shuffle and randomize.
pub fn plan(
    operation: Operation,
    array: &[i64],
    timing: &ArrayTiming,
    random: &RandomConfig,
    rng: &mut dyn RngCore,
) -> Result<Plan> {
    let kind = operation.kind();
    let len = array.len();

    let plan = match operation {
        Operation::Insert { index, element } => {
            let at = checked_index(kind, index, len, len)?;
            let mut next = array.to_vec();
            next.insert(at, element);
            Plan::new(
                kind,
                [
                    Stage::immediate(Phase::Inserting)
                        .with_array(next)
                        .with_pending(at, element),
                    Stage::after(timing.insert_settle)
                        .with_pending(at, element)
                        .with_outcome(OperationOutcome::success(
                            kind,
                            format!(
                                "Success! Inserted {element} at index {at}. \
                                 Later elements shifted right to make space."
                            ),
                        )),
                ],
            )
        }

        Operation::Delete { index } => {
            if array.is_empty() {
                return Err(OperationError::EmptyArray { op: kind });
            }
            let at = existing_index(kind, index, len)?;
            let removed = array[at];
            let mut next = array.to_vec();
            next.remove(at);
            Plan::new(
                kind,
                [
                    Stage::immediate(Phase::Deleting).with_pending(at, removed),
                    // Removed, but the phase holds until the settle stage.
                    Stage::after(timing.delete_remove)
                        .with_phase(Phase::Deleting)
                        .with_array(next)
                        .with_pending(at, removed),
                    Stage::after(timing.delete_settle).with_outcome(OperationOutcome::success(
                        kind,
                        format!(
                            "Success! Deleted element {removed} from index {at}. \
                             Later elements shifted left to fill the gap."
                        ),
                    )),
                ],
            )
        }

        Operation::Update { index, element } => {
            let at = existing_index(kind, index, len)?;
            let old = array[at];
            let mut next = array.to_vec();
            next[at] = element;
            Plan::new(
                kind,
                [
                    Stage::immediate(Phase::Updating)
                        .with_array(next)
                        .with_pending(at, element),
                    Stage::after(timing.update_settle)
                        .with_pending(at, element)
                        .with_outcome(OperationOutcome::success(
                            kind,
                            format!(
                                "Success! Updated index {at}: {old} \u{2192} {element}. \
                                 Other elements stayed in place."
                            ),
                        )),
                ],
            )
        }

        Operation::Search { value } => {
            if array.is_empty() {
                return Err(OperationError::EmptyArray { op: kind });
            }
            let matches: Vec<usize> = array
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v == value)
                .map(|(i, _)| i)
                .collect();
            Plan::new(
                kind,
                [Stage::immediate(Phase::Idle).with_outcome(search_outcome(value, &matches, len))],
            )
        }

        Operation::Shuffle => {
            if len <= 1 {
                return Err(OperationError::CannotShuffle);
            }
            let mut next = array.to_vec();
            shuffle(&mut next, rng);
            Plan::new(
                kind,
                [Stage::immediate(Phase::Idle)
                    .with_array(next)
                    .with_outcome(OperationOutcome::success(
                        kind,
                        "Success! Array shuffled with the Fisher-Yates algorithm; \
                         every ordering was equally likely.",
                    ))],
            )
        }

        Operation::Randomize => {
            let next = random_array(random, rng);
            let message = format!(
                "Success! Created a new array of {} random numbers between {} and {}.",
                next.len(),
                random.values.start(),
                random.values.end()
            );
            Plan::new(
                kind,
                [Stage::immediate(Phase::Idle)
                    .with_array(next)
                    .with_outcome(OperationOutcome::success(kind, message))],
            )
        }

        Operation::Clear => {
            if array.is_empty() {
                return Err(OperationError::AlreadyEmpty);
            }
            Plan::new(
                kind,
                [Stage::immediate(Phase::Idle)
                    .with_array(Vec::new())
                    .with_outcome(OperationOutcome::success(
                        kind,
                        "Success! Array cleared. Start fresh by inserting new elements.",
                    ))],
            )
        }
    };

    Ok(plan)
}

fn search_outcome(value: i64, matches: &[usize], scanned: usize) -> OperationOutcome {
    let kind = OperationKind::Search;
    match matches {
        [] => OperationOutcome {
            operation: kind,
            message: format!(
                "Element Not Found: {value} is not in the array. \
                 Linear search checked all {scanned} elements."
            ),
            is_error: true,
            error_kind: None,
        },
        [only] => OperationOutcome::success(
            kind,
            format!("Success! Found {value} at index {only}. Linear search checked {scanned} elements."),
        ),
        many => {
            let list = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            OperationOutcome::success(
                kind,
                format!("Success! Found {value} at indices {list}. Linear search checked {scanned} elements."),
            )
        }
    }
}

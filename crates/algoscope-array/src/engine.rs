//! The array operation engine.

use std::time::Duration;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::context::{ArrayContext, OperationOutcome};
use crate::error::{OperationError, OperationKind};
use crate::input::OperationInput;
use crate::operation::Operation;
use crate::plan::{plan, ArrayTiming, Plan};
use crate::random::RandomConfig;

/// Owns an [`ArrayContext`] and runs one operation at a time through it.
///
/// The engine never sleeps. After [`submit`](Self::submit) the owner asks
/// [`pending_stage`](Self::pending_stage) for the next deadline and calls
/// [`advance`](Self::advance) with its token once the delay has passed.
#[derive(Debug, Clone, Default)]
pub struct ArrayEngine {
    context: ArrayContext,
    timing: ArrayTiming,
    random: RandomConfig,
    in_flight: Option<Plan>,
    generation: u64,
}

impl ArrayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(timing: ArrayTiming, random: RandomConfig) -> Self {
        Self {
            timing,
            random,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_array(mut self, array: Vec<i64>) -> Self {
        self.context.array = array;
        self
    }

    pub fn context(&self) -> &ArrayContext {
        &self.context
    }

    pub fn array(&self) -> &[i64] {
        &self.context.array
    }

    pub fn timing(&self) -> &ArrayTiming {
        &self.timing
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Kind of the operation still running, if any.
    pub fn in_flight(&self) -> Option<OperationKind> {
        self.in_flight.as_ref().map(|plan| plan.operation)
    }

    /// Parse raw control input and submit it.
    pub fn submit_input(
        &mut self,
        input: &OperationInput,
        rng: &mut dyn RngCore,
    ) -> Option<OperationOutcome> {
        if let Some(busy) = self.busy_error() {
            return Some(self.reject(input.kind, busy));
        }
        match Operation::try_from(input) {
            Ok(operation) => self.submit(operation, rng),
            Err(err) => Some(self.reject(input.kind, err)),
        }
    }

    /// Validate and start `operation`.
    ///
    /// Returns the outcome when the operation finished (or failed) right
    /// away. A staged operation returns `None` here and reports its outcome
    /// from the [`advance`](Self::advance) call that applies its last stage.
    pub fn submit(
        &mut self,
        operation: Operation,
        rng: &mut dyn RngCore,
    ) -> Option<OperationOutcome> {
        let kind = operation.kind();
        if let Some(busy) = self.busy_error() {
            return Some(self.reject(kind, busy));
        }

        let mut staged = match plan(operation, &self.context.array, &self.timing, &self.random, rng) {
            Ok(staged) => staged,
            Err(err) => return Some(self.reject(kind, err)),
        };

        self.generation = self.generation.wrapping_add(1);
        let outcome = staged
            .stages
            .pop_front()
            .and_then(|stage| stage.apply(&mut self.context));

        if staged.stages.is_empty() {
            self.report(outcome.as_ref());
        } else {
            debug!(operation = %kind, stages = staged.stages.len(), "operation staged");
            self.in_flight = Some(staged);
        }
        outcome
    }

    /// The next stage deadline as `(token, delay)`.
    pub fn pending_stage(&self) -> Option<(u64, Duration)> {
        let plan = self.in_flight.as_ref()?;
        let next = plan.stages.front()?;
        Some((self.generation, next.delay))
    }

    /// Apply the next stage if `token` is current.
    ///
    /// Returns the operation's outcome when this was its last stage.
    pub fn advance(&mut self, token: u64) -> Option<OperationOutcome> {
        if token != self.generation {
            debug!(token, generation = self.generation, "stale stage dropped");
            return None;
        }
        let plan = self.in_flight.as_mut()?;
        let stage = plan.stages.pop_front()?;
        let done = plan.stages.is_empty();

        self.generation = self.generation.wrapping_add(1);
        let outcome = stage.apply(&mut self.context);
        if done {
            self.in_flight = None;
            self.report(outcome.as_ref());
        }
        outcome
    }

    /// Apply every remaining stage now.
    pub fn flush(&mut self) -> Option<OperationOutcome> {
        let mut outcome = None;
        while let Some((token, _)) = self.pending_stage() {
            outcome = self.advance(token);
        }
        outcome
    }

    /// Replace the context with persisted state.
    ///
    /// Any phase left in `context` belongs to an operation that did not
    /// survive the reload, so it is settled.
    pub fn restore(&mut self, mut context: ArrayContext) {
        if !context.phase.is_idle() {
            debug!(phase = ?context.phase, "settling orphaned phase");
            context.settle();
        }
        self.context = context;
        self.in_flight = None;
        self.generation = self.generation.wrapping_add(1);
    }

    fn busy_error(&self) -> Option<OperationError> {
        self.in_flight().map(|op| OperationError::Busy { op })
    }

    fn reject(&mut self, kind: OperationKind, err: OperationError) -> OperationOutcome {
        let outcome = OperationOutcome::failure(kind, &err);
        self.context.record(&outcome);
        warn!(operation = %kind, error_kind = ?err.kind(), "{err}");
        outcome
    }

    fn report(&self, outcome: Option<&OperationOutcome>) {
        if let Some(outcome) = outcome {
            if outcome.is_error {
                warn!(operation = %outcome.operation, "{}", outcome.message);
            } else {
                info!(operation = %outcome.operation, len = self.context.array.len(), "{}", outcome.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Phase;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn insert_then_settle() {
        let mut engine = ArrayEngine::new().with_array(vec![1, 2, 3]);
        let mut rng = rng();

        let outcome = engine.submit(Operation::Insert { index: 1, element: 99 }, &mut rng);
        assert!(outcome.is_none());
        assert_eq!(engine.array(), &[1, 99, 2, 3]);
        assert_eq!(engine.context().phase, Phase::Inserting);
        assert!(engine.is_busy());

        let (token, delay) = engine.pending_stage().unwrap();
        assert_eq!(delay, Duration::from_millis(500));

        let outcome = engine.advance(token).unwrap();
        assert!(!outcome.is_error);
        assert!(outcome.message.contains("index 1"));
        assert!(outcome.message.contains("99"));
        assert_eq!(engine.context().phase, Phase::Idle);
        assert_eq!(engine.context().message, outcome.message);
        assert!(!engine.is_busy());
        assert!(engine.pending_stage().is_none());
    }

    #[test]
    fn out_of_bounds_delete_leaves_array() {
        let mut engine = ArrayEngine::new().with_array(vec![1, 2, 3]);
        let outcome = engine
            .submit(Operation::Delete { index: 5 }, &mut rng())
            .unwrap();

        assert!(outcome.is_error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::Validation));
        assert!(outcome.message.contains("Bounds"));
        assert_eq!(engine.array(), &[1, 2, 3]);
        assert!(engine.context().is_error);
        assert!(!engine.is_busy());
    }

    #[test]
    fn delete_runs_three_stages() {
        let mut engine = ArrayEngine::new().with_array(vec![5, 6, 7]);
        assert!(engine.submit(Operation::Delete { index: 1 }, &mut rng()).is_none());
        assert_eq!(engine.context().phase, Phase::Deleting);
        assert_eq!(engine.array(), &[5, 6, 7]);

        let (token, delay) = engine.pending_stage().unwrap();
        assert_eq!(delay, Duration::from_millis(400));
        assert!(engine.advance(token).is_none());
        assert_eq!(engine.array(), &[5, 7]);
        assert!(engine.is_busy());
        assert_eq!(engine.context().phase, Phase::Deleting);
        assert_eq!(engine.context().pending_index, Some(1));
        assert_eq!(engine.context().pending_element, Some(6));

        let (token, delay) = engine.pending_stage().unwrap();
        assert_eq!(delay, Duration::from_millis(300));
        let outcome = engine.advance(token).unwrap();
        assert!(outcome.message.contains("element 6"));
        assert_eq!(engine.context().phase, Phase::Idle);
        assert_eq!(engine.context().pending_index, None);
    }

    #[test]
    fn second_operation_while_busy_is_refused() {
        let mut engine = ArrayEngine::new().with_array(vec![1, 2]);
        let mut rng = rng();
        engine.submit(Operation::Update { index: 0, element: 9 }, &mut rng);

        let outcome = engine.submit(Operation::Clear, &mut rng).unwrap();
        assert!(outcome.is_error);
        assert_eq!(outcome.error_kind, Some(ErrorKind::NoOp));
        assert_eq!(engine.in_flight(), Some(OperationKind::Update));
        assert_eq!(engine.array(), &[9, 2]);
    }

    #[test]
    fn stale_token_does_nothing() {
        let mut engine = ArrayEngine::new().with_array(vec![1, 2]);
        engine.submit(Operation::Delete { index: 0 }, &mut rng());
        let (token, _) = engine.pending_stage().unwrap();

        assert!(engine.advance(token + 1).is_none());
        assert_eq!(engine.array(), &[1, 2]);

        engine.advance(token);
        // The first token cannot be replayed against the next stage.
        assert!(engine.advance(token).is_none());
        assert!(engine.is_busy());
    }

    #[test]
    fn immediate_operations_return_outcome() {
        let mut engine = ArrayEngine::new().with_array(vec![3, 1, 3]);
        let outcome = engine
            .submit(Operation::Search { value: 3 }, &mut rng())
            .unwrap();
        assert!(outcome.message.contains("indices 0, 2"));
        assert!(engine.pending_stage().is_none());

        let outcome = engine.submit(Operation::Clear, &mut rng()).unwrap();
        assert!(!outcome.is_error);
        assert!(engine.array().is_empty());
    }

    #[test]
    fn submit_input_reports_parse_errors() {
        let mut engine = ArrayEngine::new().with_array(vec![1]);
        let input = OperationInput::new(OperationKind::Insert)
            .with_index("0")
            .with_value("3.7");
        let outcome = engine.submit_input(&input, &mut rng()).unwrap();
        assert!(outcome.is_error);
        assert_eq!(outcome.operation, OperationKind::Insert);
        assert_eq!(engine.array(), &[1]);
    }

    #[test]
    fn flush_applies_remaining_stages() {
        let mut engine = ArrayEngine::new().with_array(vec![1, 2, 3]);
        engine.submit(Operation::Delete { index: 2 }, &mut rng());
        let outcome = engine.flush().unwrap();
        assert!(!outcome.is_error);
        assert_eq!(engine.array(), &[1, 2]);
        assert!(!engine.is_busy());
    }

    #[test]
    fn restore_settles_orphaned_phase() {
        let mut engine = ArrayEngine::new();
        engine.submit(Operation::Insert { index: 0, element: 1 }, &mut rng());
        let (token, _) = engine.pending_stage().unwrap();

        let mut persisted = ArrayContext::with_array(vec![4, 5]);
        persisted.phase = Phase::Updating;
        engine.restore(persisted);

        assert_eq!(engine.context().phase, Phase::Idle);
        assert_eq!(engine.array(), &[4, 5]);
        assert!(!engine.is_busy());
        assert!(engine.advance(token).is_none());
    }

    proptest! {
        #[test]
        fn delete_undoes_insert(
            array in prop::collection::vec(-100i64..100, 0..20),
            element in -100i64..100,
            at in 0usize..21,
        ) {
            let index = at.min(array.len()) as i64;
            let mut engine = ArrayEngine::with_config(ArrayTiming::immediate(), RandomConfig::default())
                .with_array(array.clone());
            let mut rng = rng();

            engine.submit(Operation::Insert { index, element }, &mut rng);
            engine.flush();
            engine.submit(Operation::Delete { index }, &mut rng);
            engine.flush();

            prop_assert_eq!(engine.array(), array.as_slice());
        }

        #[test]
        fn failed_operations_never_mutate(
            array in prop::collection::vec(0i64..10, 0..6),
            index in -5i64..12,
        ) {
            let mut engine = ArrayEngine::new().with_array(array.clone());
            if let Some(outcome) = engine.submit(Operation::Update { index, element: 77 }, &mut rng()) {
                prop_assert!(outcome.is_error);
                prop_assert_eq!(engine.array(), array.as_slice());
            }
        }
    }
}

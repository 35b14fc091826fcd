//! AlgoScope Array Operations
//!
//! Direct mutation of a live array with animation phases, as opposed to the
//! precomputed traces of `algoscope-trace`.
//!
//! # Architecture
//!
//! - **Input**: [`parse_integer`] and [`OperationInput`] turn control text
//!   into an [`Operation`].
//! - **Planning**: [`plan()`] validates an operation against the current array
//!   and produces a [`Plan`] of timed [`Stage`]s (Inserting → settled,
//!   Deleting → removed → settled, Updating → settled).
//! - **Engine**: [`ArrayEngine`] applies stage 0 on submit and the rest on
//!   [`ArrayEngine::advance`], one operation in flight at a time. Every
//!   failure comes back as an [`OperationOutcome`] with `is_error` set.
//! - **Randomness**: [`shuffle`] (Fisher–Yates) and [`random_array`] take any
//!   `rand::Rng`.
//!
//! # Example
//!
//! ```
//! use algoscope_array::{ArrayEngine, Operation};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mut engine = ArrayEngine::new().with_array(vec![1, 2, 3]);
//!
//! engine.submit(Operation::Insert { index: 1, element: 99 }, &mut rng);
//! let outcome = engine.flush().unwrap();
//!
//! assert_eq!(engine.array(), &[1, 99, 2, 3]);
//! assert!(!outcome.is_error);
//! ```

mod context;
mod engine;
mod error;
mod input;
mod operation;
mod plan;
mod random;

pub use context::{ArrayContext, OperationOutcome, Phase};
pub use engine::ArrayEngine;
pub use error::{ErrorKind, OperationError, OperationKind, Result};
pub use input::{parse_integer, OperationInput};
pub use operation::Operation;
pub use plan::{plan, ArrayTiming, Plan, Stage};
pub use random::{random_array, shuffle, RandomConfig};

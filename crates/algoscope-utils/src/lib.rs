//! AlgoScope shared utilities.
//!
//! Currently a single primitive: [`OneShotTimer`], the cancellable timer that
//! drives playback ticks and array-operation settle delays.

mod timer;

pub use timer::{Fired, OneShotTimer};

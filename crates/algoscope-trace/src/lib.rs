//! AlgoScope Step Traces
//!
//! Pure step generators for the sorting and searching visualizers.
//!
//! # Model
//!
//! An algorithm is run to completion once, up front, and every interesting
//! moment of its execution is recorded as a full snapshot (a *step*). The
//! resulting [`Trace`] is immutable; playback only ever moves a cursor over
//! it. Changing the input means generating a new trace.
//!
//! - [`generate_sort_trace`]: bubble sort, one step per comparison plus one
//!   per swap, then a final all-sorted step.
//! - [`generate_search_trace`]: linear search, one step per visited index,
//!   ending on the match or on a past-the-end sentinel.
//!
//! Generation never fails. Degenerate input (empty or single element)
//! produces a single terminal step.

mod algorithm;
mod search;
mod sort;
mod trace;

pub use algorithm::{Algorithm, AnyTrace, UnknownAlgorithm};
pub use search::{generate_search_trace, SearchStep};
pub use sort::{generate_sort_trace, SortStep};
pub use trace::{Step, Trace};

//! AlgoScope Playback
//!
//! A cursor over a precomputed [`Trace`](algoscope_trace::Trace) with
//! Idle / Playing / Paused / Complete states.
//!
//! # Architecture
//!
//! - **Controller**: [`Playback`] owns the trace and cursor and applies every
//!   transition synchronously. It never sleeps; it only reports the tick it
//!   wants next through [`Playback::pending_tick`].
//! - **Generation token**: every transition that invalidates a scheduled tick
//!   (pause, reset, speed change, new trace) bumps a counter. A tick carrying
//!   an older token is refused, so a late timer can never move the cursor of
//!   a trace that has since been reset or replaced.
//! - **Status**: [`PlaybackStatus`] is the serializable view a renderer reads.
//!
//! The timer itself lives with the owner of the controller; see
//! `algoscope_utils::OneShotTimer`.

mod controller;
mod speed;
mod status;

pub use controller::{Playback, PlaybackState, TickOutcome};
pub use speed::PlaybackConfig;
pub use status::PlaybackStatus;

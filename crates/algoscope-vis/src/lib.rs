//! AlgoScope Runtime
//!
//! Hosts the visualizers behind an HTTP and WebSocket API.
//!
//! # Architecture
//!
//! - **Sessions**: each visualizer lives in its own tokio task
//!   ([`Session`]), the single writer of its state. Commands come in over
//!   a channel; views go out on a `watch` channel.
//! - **Timers**: after every command or fired tick the session reconciles a
//!   [`OneShotTimer`](algoscope_utils::OneShotTimer) with the visualizer's
//!   pending deadline, so playback and staged array operations advance on
//!   their own and stop cleanly on pause or shutdown.
//! - **Server**: [`VisServer`] spawns one [`AnySession`] per catalog entry
//!   and routes `/api/{name}` and `/ws/{name}` by the entry's route segment.
//!   `/api/trace` generates a standalone trace.
//! - **Config**: [`VisConfig::from_env`] reads the listen address, data
//!   directory and playback pacing.

mod config;
mod error;
mod server;
mod session;

pub use config::VisConfig;
pub use error::{Error, Result};
pub use server::{trace_command, ActionBody, AnySession, ApiError, AppState, TraceRequest, VisServer};
pub use session::{spawn_session, Session, SessionHandle};

//! Runtime error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid environment configuration
    #[error("Config error: {0}")]
    Config(String),

    /// The session task has stopped
    #[error("Session closed")]
    SessionClosed,

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] algoscope_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

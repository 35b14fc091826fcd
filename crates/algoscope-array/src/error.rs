//! Error types for array operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for array operation validation.
pub type Result<T> = std::result::Result<T, OperationError>;

/// The operations the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Delete,
    Update,
    Search,
    Shuffle,
    Randomize,
    Clear,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Insert,
        OperationKind::Delete,
        OperationKind::Update,
        OperationKind::Search,
        OperationKind::Shuffle,
        OperationKind::Randomize,
        OperationKind::Clear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
            OperationKind::Update => "update",
            OperationKind::Search => "search",
            OperationKind::Shuffle => "shuffle",
            OperationKind::Randomize => "randomize",
            OperationKind::Clear => "clear",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity class of an [`OperationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-bounds input.
    Validation,
    /// The operation needs at least one element.
    EmptyArray,
    /// Legal request that would change nothing.
    NoOp,
}

/// Reasons an array operation is refused.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("Input Error: {field} must be a whole number, got {input:?}.")]
    InvalidNumber { field: &'static str, input: String },

    #[error(
        "Array Bounds Error: index {index} is invalid for {op}. {}",
        valid_indices(.op, .len)
    )]
    IndexOutOfBounds {
        op: OperationKind,
        index: i64,
        len: usize,
    },

    #[error("Empty Array: there are no elements to {op}. Try inserting some elements first.")]
    EmptyArray { op: OperationKind },

    #[error("Cannot Shuffle: the array needs at least 2 elements to shuffle.")]
    CannotShuffle,

    #[error("Array Already Empty: there are no elements to clear.")]
    AlreadyEmpty,

    #[error("Operation In Progress: wait for the current {op} to finish.")]
    Busy { op: OperationKind },
}

impl OperationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OperationError::InvalidNumber { .. } | OperationError::IndexOutOfBounds { .. } => {
                ErrorKind::Validation
            }
            OperationError::EmptyArray { .. } => ErrorKind::EmptyArray,
            OperationError::CannotShuffle
            | OperationError::AlreadyEmpty
            | OperationError::Busy { .. } => ErrorKind::NoOp,
        }
    }
}

fn valid_indices(op: &OperationKind, len: &usize) -> String {
    match (*op, *len) {
        (OperationKind::Insert, len) => format!(
            "Valid positions are 0 to {len}; position {len} appends to the end."
        ),
        (_, 0) => "The array has no elements yet.".to_string(),
        (_, len) => format!("Valid indices are 0 to {}.", len - 1),
    }
}

//! Observable state of the array visualizer.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, OperationError, OperationKind};

/// Transient animation marker for an in-flight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No animation running.
    #[default]
    Idle,
    Inserting,
    Deleting,
    Updating,
}

impl Phase {
    pub fn is_idle(self) -> bool {
        self == Phase::Idle
    }
}

/// The array plus everything a renderer needs to animate the last operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrayContext {
    pub array: Vec<i64>,
    /// Index the current or last mutation touched.
    pub pending_index: Option<usize>,
    /// Element the current or last mutation wrote or removed.
    pub pending_element: Option<i64>,
    pub phase: Phase,
    /// Latest user-facing message.
    pub message: String,
    pub is_error: bool,
}

impl ArrayContext {
    pub fn with_array(array: Vec<i64>) -> Self {
        Self {
            array,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &OperationOutcome) {
        self.message.clone_from(&outcome.message);
        self.is_error = outcome.is_error;
    }

    /// Drop any phase left over from an operation that no longer exists.
    pub fn settle(&mut self) {
        self.phase = Phase::Idle;
    }
}

/// The single message an operation produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub operation: OperationKind,
    pub message: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl OperationOutcome {
    pub fn success(operation: OperationKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            is_error: false,
            error_kind: None,
        }
    }

    pub fn failure(operation: OperationKind, error: &OperationError) -> Self {
        Self {
            operation,
            message: error.to_string(),
            is_error: true,
            error_kind: Some(error.kind()),
        }
    }
}

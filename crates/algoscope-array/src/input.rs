//! Raw text input from the operation controls.

use serde::{Deserialize, Serialize};

use crate::error::{OperationError, OperationKind, Result};

/// Parse a whole number typed by the user.
///
/// Surrounding whitespace is ignored. Empty text, fractions, and values that
/// do not fit an `i64` are rejected.
pub fn parse_integer(field: &'static str, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| OperationError::InvalidNumber {
            field,
            input: text.to_string(),
        })
}

/// One submission from the operation controls, fields still as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInput {
    pub kind: OperationKind,
    /// Index field; ignored by operations that take none.
    #[serde(default)]
    pub index: String,
    /// Element or search value field.
    #[serde(default)]
    pub value: String,
}

impl OperationInput {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            index: String::new(),
            value: String::new(),
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

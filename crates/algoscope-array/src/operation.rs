//! Parsed array operations.

use serde::{Deserialize, Serialize};

use crate::error::{OperationKind, Result};
use crate::input::{parse_integer, OperationInput};

/// An array operation with numeric arguments.
///
/// Indices are kept signed as typed so that a negative request can be
/// reported as out of bounds rather than as unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Insert { index: i64, element: i64 },
    Delete { index: i64 },
    Update { index: i64, element: i64 },
    Search { value: i64 },
    Shuffle,
    Randomize,
    Clear,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Insert { .. } => OperationKind::Insert,
            Operation::Delete { .. } => OperationKind::Delete,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Search { .. } => OperationKind::Search,
            Operation::Shuffle => OperationKind::Shuffle,
            Operation::Randomize => OperationKind::Randomize,
            Operation::Clear => OperationKind::Clear,
        }
    }

    /// Build an operation from the raw control fields.
    ///
    /// Only the fields `kind` uses are parsed; the rest are ignored.
    pub fn from_input(kind: OperationKind, index: &str, value: &str) -> Result<Self> {
        let operation = match kind {
            OperationKind::Insert => Operation::Insert {
                index: parse_integer("index", index)?,
                element: parse_integer("element", value)?,
            },
            OperationKind::Delete => Operation::Delete {
                index: parse_integer("index", index)?,
            },
            OperationKind::Update => Operation::Update {
                index: parse_integer("index", index)?,
                element: parse_integer("element", value)?,
            },
            OperationKind::Search => Operation::Search {
                value: parse_integer("search value", value)?,
            },
            OperationKind::Shuffle => Operation::Shuffle,
            OperationKind::Randomize => Operation::Randomize,
            OperationKind::Clear => Operation::Clear,
        };
        Ok(operation)
    }
}

impl TryFrom<&OperationInput> for Operation {
    type Error = crate::error::OperationError;

    fn try_from(input: &OperationInput) -> Result<Self> {
        Operation::from_input(input.kind, &input.index, &input.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OperationError;

    #[test]
    fn parses_insert_fields() {
        let op = Operation::from_input(OperationKind::Insert, "1", "99").unwrap();
        assert_eq!(
            op,
            Operation::Insert {
                index: 1,
                element: 99
            }
        );
        assert_eq!(op.kind(), OperationKind::Insert);
    }

    #[test]
    fn fractional_element_is_rejected() {
        let err = Operation::from_input(OperationKind::Update, "0", "3.7").unwrap_err();
        assert!(matches!(
            err,
            OperationError::InvalidNumber {
                field: "element",
                ..
            }
        ));
    }

    #[test]
    fn unused_fields_are_ignored() {
        let input = OperationInput::new(OperationKind::Clear).with_index("junk");
        assert_eq!(Operation::try_from(&input), Ok(Operation::Clear));

        let delete = Operation::from_input(OperationKind::Delete, "2", "junk").unwrap();
        assert_eq!(delete, Operation::Delete { index: 2 });
    }

    #[test]
    fn negative_index_parses() {
        let op = Operation::from_input(OperationKind::Delete, "-1", "").unwrap();
        assert_eq!(op, Operation::Delete { index: -1 });
    }
}

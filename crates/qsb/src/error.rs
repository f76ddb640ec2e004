//! Error types for qsb

use crate::builder::Command;
use thiserror::Error;

/// Result type alias for qsb operations
pub type QsbResult<T> = Result<T, QsbError>;

/// Errors raised while assembling a statement.
///
/// Escaping never fails; every variant here is a caller-contract violation
/// detected either by the clause call itself or by [`build`](crate::QueryStringBuilder::build).
#[derive(Debug, Error)]
pub enum QsbError {
    /// A column name in a column list is empty.
    #[error("Column name is undefined at index {index}! {columns}")]
    MissingColumn { index: usize, columns: String },

    /// Parallel column/value lists have different lengths.
    #[error("{operation}: {columns} column(s) but {values} value(s)")]
    LengthMismatch {
        operation: &'static str,
        columns: usize,
        values: usize,
    },

    /// An identifier (table, alias or column) is empty.
    #[error("{clause} has an empty identifier")]
    BlankIdentifier { clause: &'static str },

    /// A WHERE membership test was given an empty list.
    #[error("Empty value list for {column}")]
    EmptyList { column: String },

    /// `on()` was called before any `join()`.
    #[error("Join condition added before any join")]
    JoinConditionWithoutJoin,

    /// `build()` was called before a command was selected.
    #[error("No command selected (select/insert/update/delete)")]
    CommandNotSelected,

    /// The command needs a target table and none was given.
    #[error("{0} statement has no target table")]
    MissingTarget(Command),

    /// A clause was accumulated that the command's statement shape cannot carry.
    #[error("{clause} is not valid in a {command} statement")]
    IllegalClause {
        clause: &'static str,
        command: Command,
    },

    /// Other builder-state violations
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QsbError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a missing column error for `columns[index]`.
    pub fn missing_column(index: usize, columns: &[&str]) -> Self {
        Self::MissingColumn {
            index,
            columns: format!("{columns:?}"),
        }
    }

    /// Check if this is a caller-input error (as opposed to a builder-state error)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::LengthMismatch { .. }
                | Self::BlankIdentifier { .. }
                | Self::EmptyList { .. }
                | Self::JoinConditionWithoutJoin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_lists_offending_input() {
        let err = QsbError::missing_column(1, &["name", ""]);
        assert_eq!(
            err.to_string(),
            r#"Column name is undefined at index 1! ["name", ""]"#
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn illegal_clause_names_command() {
        let err = QsbError::IllegalClause {
            clause: "ORDER BY",
            command: Command::Delete,
        };
        assert_eq!(err.to_string(), "ORDER BY is not valid in a DELETE statement");
        assert!(!err.is_input_error());
    }

    #[test]
    fn blank_identifier_names_clause() {
        let err = QsbError::BlankIdentifier { clause: "ORDER BY" };
        assert_eq!(err.to_string(), "ORDER BY has an empty identifier");
        assert!(err.is_input_error());
    }
}

//! Structural validation errors.

use thiserror::Error;

/// Result type for schema validation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Ways a table definition can be structurally impossible.
///
/// All of these are caught before any DDL is rendered or submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The table declares no concrete columns.
    #[error("table '{table}' declares no columns")]
    NoColumns {
        /// The table name.
        table: String,
    },

    /// Two columns share an ordering sequence.
    #[error("table '{table}' declares sequence {sequence} more than once")]
    DuplicateSequence {
        /// The table name.
        table: String,
        /// The repeated sequence.
        sequence: u32,
    },

    /// More than one column (or column plus table constraint) claims the
    /// primary key.
    #[error("table '{table}' declares more than one primary key")]
    MultiplePrimaryKeys {
        /// The table name.
        table: String,
    },

    /// A constraint names a column the table does not declare.
    #[error("constraint '{constraint}' on table '{table}' names undeclared column '{column}'")]
    UnknownConstraintColumn {
        /// The table name.
        table: String,
        /// The constraint name.
        constraint: String,
        /// The undeclared column.
        column: String,
    },

    /// A foreign-key constraint lacks a referenced table or columns.
    #[error("foreign key '{constraint}' on table '{table}' is missing its reference")]
    MissingForeignKeyReference {
        /// The table name.
        table: String,
        /// The constraint name.
        constraint: String,
    },

    /// A check constraint has no expression.
    #[error("check constraint '{constraint}' on table '{table}' has no expression")]
    MissingCheckExpression {
        /// The table name.
        table: String,
        /// The constraint name.
        constraint: String,
    },
}

impl SchemaError {
    /// Creates a no-columns error.
    pub fn no_columns(table: impl Into<String>) -> Self {
        Self::NoColumns {
            table: table.into(),
        }
    }

    /// Creates a duplicate-sequence error.
    pub fn duplicate_sequence(table: impl Into<String>, sequence: u32) -> Self {
        Self::DuplicateSequence {
            table: table.into(),
            sequence,
        }
    }

    /// Creates a multiple-primary-keys error.
    pub fn multiple_primary_keys(table: impl Into<String>) -> Self {
        Self::MultiplePrimaryKeys {
            table: table.into(),
        }
    }

    /// Creates an unknown-constraint-column error.
    pub fn unknown_constraint_column(
        table: impl Into<String>,
        constraint: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self::UnknownConstraintColumn {
            table: table.into(),
            constraint: constraint.into(),
            column: column.into(),
        }
    }

    /// Creates a missing-foreign-key-reference error.
    pub fn missing_reference(table: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::MissingForeignKeyReference {
            table: table.into(),
            constraint: constraint.into(),
        }
    }

    /// Creates a missing-check-expression error.
    pub fn missing_check(table: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::MissingCheckExpression {
            table: table.into(),
            constraint: constraint.into(),
        }
    }
}

//! Error types for Strata core.

use strata_codec::CodecError;
use strata_schema::SchemaError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Strata core operations.
///
/// Engine failures carry the primary SQLite result code alongside the
/// engine's own message; the four statement stages (prepare, bind, step,
/// finalize) each have their own variant so callers can tell where a
/// statement died.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Schema validation error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Value coercion error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The database file could not be opened.
    #[error("could not open database '{path}': {message}")]
    OpenFailed {
        /// The path that failed to open.
        path: String,
        /// Engine message.
        message: String,
    },

    /// The connection could not be closed cleanly.
    #[error("could not close database: {message}")]
    CloseFailed {
        /// Engine message.
        message: String,
    },

    /// An `ATTACH DATABASE` failed, or the alias was already attached.
    #[error("could not attach database as '{alias}': {message}")]
    AttachFailed {
        /// The requested alias.
        alias: String,
        /// What went wrong.
        message: String,
    },

    /// A `DETACH DATABASE` failed, or the alias was not attached.
    #[error("could not detach database '{alias}': {message}")]
    DetachFailed {
        /// The alias being detached.
        alias: String,
        /// What went wrong.
        message: String,
    },

    /// The operation requires an open database.
    #[error("database is not open")]
    NotOpen,

    /// Statement compilation failed.
    #[error("prepare failed (code {code}): {message}")]
    PrepareFailed {
        /// Primary SQLite result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// Binding a value to a placeholder failed.
    #[error("bind failed at placeholder {index}: {message}")]
    BindFailed {
        /// 1-based placeholder index.
        index: usize,
        /// What went wrong.
        message: String,
    },

    /// Stepping the statement failed.
    #[error("step failed (code {code}): {message}")]
    StepFailed {
        /// Primary SQLite result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// Finalizing the statement failed.
    #[error("finalize failed (code {code}): {message}")]
    FinalizeFailed {
        /// Primary SQLite result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// The caller broke the statement contract, for example by supplying
    /// the wrong number of values for a statement's placeholders.
    #[error("statement misuse: {message}")]
    Misuse {
        /// What the caller got wrong.
        message: String,
    },

    /// No schema has been registered under the requested entity name.
    #[error("no schema registered for entity '{entity}'")]
    UnknownEntity {
        /// The entity name that was looked up.
        entity: String,
    },

    /// A multi-statement transaction was rolled back.
    #[error("transaction '{identifier}' rolled back: {cause}")]
    TransactionRolledBack {
        /// Caller-supplied transaction identifier.
        identifier: String,
        /// The failure that triggered the rollback.
        cause: String,
    },

    /// The integrity check reported problems.
    #[error("integrity check reported {count} problem(s)")]
    IntegrityViolation {
        /// Number of reported problems.
        count: usize,
    },

    /// The foreign-key check reported violations.
    #[error("foreign key check reported {count} violation(s)")]
    ForeignKeyViolation {
        /// Number of reported violations.
        count: usize,
    },

    /// A versioned migration failed.
    #[error("migration '{name}' failed: {message}")]
    MigrationFailed {
        /// The migration name.
        name: String,
        /// What went wrong.
        message: String,
    },
}

impl CoreError {
    /// Creates an open-failed error.
    pub fn open_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a close-failed error.
    pub fn close_failed(message: impl Into<String>) -> Self {
        Self::CloseFailed {
            message: message.into(),
        }
    }

    /// Creates an attach-failed error.
    pub fn attach_failed(alias: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AttachFailed {
            alias: alias.into(),
            message: message.into(),
        }
    }

    /// Creates a detach-failed error.
    pub fn detach_failed(alias: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DetachFailed {
            alias: alias.into(),
            message: message.into(),
        }
    }

    /// Creates a prepare-failed error.
    pub fn prepare_failed(code: i32, message: impl Into<String>) -> Self {
        Self::PrepareFailed {
            code,
            message: message.into(),
        }
    }

    /// Creates a bind-failed error.
    pub fn bind_failed(index: usize, message: impl Into<String>) -> Self {
        Self::BindFailed {
            index,
            message: message.into(),
        }
    }

    /// Creates a step-failed error.
    pub fn step_failed(code: i32, message: impl Into<String>) -> Self {
        Self::StepFailed {
            code,
            message: message.into(),
        }
    }

    /// Creates a finalize-failed error.
    pub fn finalize_failed(code: i32, message: impl Into<String>) -> Self {
        Self::FinalizeFailed {
            code,
            message: message.into(),
        }
    }

    /// Creates a misuse error.
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::Misuse {
            message: message.into(),
        }
    }

    /// Creates an unknown-entity error.
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Creates a transaction-rolled-back error.
    pub fn rolled_back(identifier: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::TransactionRolledBack {
            identifier: identifier.into(),
            cause: cause.into(),
        }
    }

    /// Creates a migration-failed error.
    pub fn migration_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MigrationFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

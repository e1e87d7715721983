//! Conflict resolution modes.

use std::fmt;

/// What the engine does when a write violates a uniqueness or NOT NULL
/// constraint.
///
/// Renders 1:1 to the `ON CONFLICT` / `OR` keywords. [`Abort`] is the
/// engine's own default and the default here.
///
/// [`Abort`]: ConflictResolution::Abort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictResolution {
    /// Roll back the enclosing transaction.
    Rollback,
    /// Abort the statement, keep prior statements of the transaction.
    #[default]
    Abort,
    /// Fail the statement but keep its prior row changes.
    Fail,
    /// Skip the conflicting row and continue.
    Ignore,
    /// Replace the conflicting row.
    Replace,
}

impl ConflictResolution {
    /// The SQL keyword for this mode.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            ConflictResolution::Rollback => "ROLLBACK",
            ConflictResolution::Abort => "ABORT",
            ConflictResolution::Fail => "FAIL",
            ConflictResolution::Ignore => "IGNORE",
            ConflictResolution::Replace => "REPLACE",
        }
    }
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

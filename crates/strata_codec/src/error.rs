//! Error types for value coercion.

use crate::affinity::Affinity;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while coercing values across affinities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A value cannot be represented under the column's declared affinity.
    #[error("cannot coerce {found} value for column '{column}' to {affinity}")]
    Coercion {
        /// The column being bound or read.
        column: String,
        /// The declared affinity.
        affinity: Affinity,
        /// Storage-class name of the offending value.
        found: &'static str,
    },

    /// A stored date string has none of the recognized lengths.
    #[error("malformed date text '{text}': length {} is not 19, 10, 7 or 4", text.len())]
    MalformedDate {
        /// The stored text.
        text: String,
    },

    /// A stored date string has a recognized length but does not parse.
    #[error("unparseable date text '{text}'")]
    UnparseableDate {
        /// The stored text.
        text: String,
    },

    /// A stored boolean is neither an integer nor the legacy TRUE/FALSE text.
    #[error("malformed boolean text '{text}'")]
    MalformedBoolean {
        /// The stored text.
        text: String,
    },

    /// A stored historic date does not follow the signed expanded-year form.
    #[error("malformed historic date '{text}': expected ±YYYYYY-MM-DD")]
    MalformedHistoricDate {
        /// The stored text.
        text: String,
    },

    /// A historic date's components are out of range.
    #[error("historic date out of range: year {year}, month {month}, day {day}")]
    HistoricDateOutOfRange {
        /// Astronomical year (0 is 1 BCE).
        year: i32,
        /// Month, 1-12.
        month: u8,
        /// Day of month, 1-31.
        day: u8,
    },
}

impl CodecError {
    /// Creates a coercion error.
    pub fn coercion(column: impl Into<String>, affinity: Affinity, found: &'static str) -> Self {
        Self::Coercion {
            column: column.into(),
            affinity,
            found,
        }
    }

    /// Creates a malformed-date error.
    pub fn malformed_date(text: impl Into<String>) -> Self {
        Self::MalformedDate { text: text.into() }
    }

    /// Creates an unparseable-date error.
    pub fn unparseable_date(text: impl Into<String>) -> Self {
        Self::UnparseableDate { text: text.into() }
    }

    /// Creates a malformed-boolean error.
    pub fn malformed_boolean(text: impl Into<String>) -> Self {
        Self::MalformedBoolean { text: text.into() }
    }

    /// Creates a malformed-historic-date error.
    pub fn malformed_historic(text: impl Into<String>) -> Self {
        Self::MalformedHistoricDate { text: text.into() }
    }
}

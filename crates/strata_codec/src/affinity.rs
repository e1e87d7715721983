//! Column affinities.

use std::fmt;

/// The logical data type assigned to a column.
///
/// SQLite's native storage classes are extended with three logical
/// affinities (`Boolean`, `DateTime`, `HistoricDateTime`) whose storage
/// representation is defined by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affinity {
    /// UTF-8 text.
    Text,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Real,
    /// Raw byte sequence.
    Blob,
    /// No declared affinity; values bind by their natural storage class.
    Null,
    /// Boolean, stored as integer 0/1.
    Boolean,
    /// UTC date-time, stored as text.
    DateTime,
    /// Date outside the normal representable range, stored as expanded-year text.
    HistoricDateTime,
}

impl Affinity {
    /// The keyword used when declaring a column of this affinity.
    ///
    /// The extended affinities declare their underlying storage class, so the
    /// engine sees only types it understands.
    #[must_use]
    pub fn sql_name(self) -> &'static str {
        match self {
            Affinity::Text => "TEXT",
            Affinity::Integer => "INTEGER",
            Affinity::Real => "REAL",
            Affinity::Blob => "BLOB",
            Affinity::Null => "NULL",
            Affinity::Boolean => "INTEGER",
            Affinity::DateTime | Affinity::HistoricDateTime => "TEXT",
        }
    }

    /// The name used in diagnostics, distinguishing the extended affinities.
    #[must_use]
    pub fn logical_name(self) -> &'static str {
        match self {
            Affinity::Text => "TEXT",
            Affinity::Integer => "INTEGER",
            Affinity::Real => "REAL",
            Affinity::Blob => "BLOB",
            Affinity::Null => "NULL",
            Affinity::Boolean => "BOOLEAN",
            Affinity::DateTime => "DATE_TIME",
            Affinity::HistoricDateTime => "HISTORIC_DATE_TIME",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_affinities_declare_storage_class() {
        assert_eq!(Affinity::Boolean.sql_name(), "INTEGER");
        assert_eq!(Affinity::DateTime.sql_name(), "TEXT");
        assert_eq!(Affinity::HistoricDateTime.sql_name(), "TEXT");
    }

    #[test]
    fn logical_names_are_distinct() {
        assert_eq!(Affinity::Boolean.logical_name(), "BOOLEAN");
        assert_eq!(Affinity::Boolean.to_string(), "BOOLEAN");
    }
}

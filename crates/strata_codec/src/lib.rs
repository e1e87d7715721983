//! # Strata Codec
//!
//! Logical value types and affinity coercion for Strata.
//!
//! SQLite stores five primitive storage classes (null, integer, real, text,
//! blob). Strata layers three logical affinities on top of them:
//!
//! - `BOOLEAN`: stored as integer 0/1 (legacy databases may hold the text
//!   `TRUE`/`FALSE`, which is still accepted on read)
//! - `DATE_TIME`: stored as UTC text, `yyyy-MM-dd HH:mm:ss`; shorter stored
//!   forms (date, year-month, year) are recognized by their exact length
//! - `HISTORIC_DATE_TIME`: stored as signed expanded-year text for dates
//!   outside the normal representable range
//!
//! This crate converts between [`Value`] (the logical side) and [`Primitive`]
//! (the engine side) in both directions. It has no dependency on the engine
//! itself; the connection layer owns the actual binding.
//!
//! ## Usage
//!
//! ```
//! use strata_codec::{decode, encode, Affinity, Primitive, Value};
//!
//! let primitive = encode(&Value::Bool(true), Affinity::Boolean, "isComplete").unwrap();
//! assert_eq!(primitive, Primitive::Integer(1));
//!
//! let value = decode(&primitive, Affinity::Boolean).unwrap();
//! assert_eq!(value, Value::Bool(true));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod affinity;
mod decode;
mod encode;
mod error;
mod historic;
mod value;

pub use affinity::Affinity;
pub use decode::{decode, parse_date_text};
pub use encode::{encode, format_date_time};
pub use error::{CodecError, CodecResult};
pub use historic::HistoricDate;
pub use value::{Primitive, Value};

/// Text form of a full date-time, always 19 characters.
pub const FORMAT_DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
/// Text form of a date without a time-of-day, always 10 characters.
pub const FORMAT_SHORT_DATE: &str = "%Y-%m-%d";
/// Text form of a year and month, always 7 characters.
pub const FORMAT_YEAR_MONTH: &str = "%Y-%m";
/// Text form of a year alone, always 4 characters.
pub const FORMAT_YEAR: &str = "%Y";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn roundtrip_boolean() {
        for flag in [true, false] {
            let primitive = encode(&Value::Bool(flag), Affinity::Boolean, "flag").unwrap();
            assert_eq!(decode(&primitive, Affinity::Boolean).unwrap(), Value::Bool(flag));
        }
    }

    #[test]
    fn roundtrip_date_time_to_second_precision() {
        let moment = Utc.with_ymd_and_hms(2019, 7, 20, 20, 17, 40).unwrap();
        let primitive = encode(&Value::DateTime(moment), Affinity::DateTime, "inserted").unwrap();
        assert_eq!(primitive, Primitive::Text("2019-07-20 20:17:40".to_string()));
        assert_eq!(
            decode(&primitive, Affinity::DateTime).unwrap(),
            Value::DateTime(moment)
        );
    }

    #[test]
    fn roundtrip_historic_date() {
        let ides = HistoricDate::new(-43, 3, 15).unwrap();
        let primitive = encode(&Value::Historic(ides), Affinity::HistoricDateTime, "born").unwrap();
        assert_eq!(primitive, Primitive::Text("-000043-03-15".to_string()));
        assert_eq!(
            decode(&primitive, Affinity::HistoricDateTime).unwrap(),
            Value::Historic(ides)
        );
    }

    #[test]
    fn null_passes_through_every_affinity() {
        for affinity in [
            Affinity::Text,
            Affinity::Integer,
            Affinity::Real,
            Affinity::Blob,
            Affinity::Null,
            Affinity::Boolean,
            Affinity::DateTime,
            Affinity::HistoricDateTime,
        ] {
            let primitive = encode(&Value::Null, affinity, "col").unwrap();
            assert_eq!(primitive, Primitive::Null);
            assert_eq!(decode(&primitive, affinity).unwrap(), Value::Null);
        }
    }
}

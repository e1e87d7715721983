//! Raising engine primitives back to logical values.

use crate::affinity::Affinity;
use crate::error::{CodecError, CodecResult};
use crate::historic::HistoricDate;
use crate::value::{Primitive, Value};
use crate::{FORMAT_DATE_TIME, FORMAT_SHORT_DATE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parses stored date text into a UTC date-time.
///
/// The stored form is recognized by its exact length: 19 characters is a
/// full date-time, 10 a date, 7 a year and month, 4 a year alone. Missing
/// components default to January, the first of the month and midnight. Any
/// other length is [`CodecError::MalformedDate`]; a recognized length that
/// does not parse is [`CodecError::UnparseableDate`].
pub fn parse_date_text(text: &str) -> CodecResult<DateTime<Utc>> {
    let naive = match text.len() {
        19 => NaiveDateTime::parse_from_str(text, FORMAT_DATE_TIME)
            .map_err(|_| CodecError::unparseable_date(text))?,
        10 => parse_short_date(text, text)?,
        7 => parse_short_date(&format!("{text}-01"), text)?,
        4 => parse_short_date(&format!("{text}-01-01"), text)?,
        _ => return Err(CodecError::malformed_date(text)),
    };
    Ok(naive.and_utc())
}

fn parse_short_date(padded: &str, original: &str) -> CodecResult<NaiveDateTime> {
    NaiveDate::parse_from_str(padded, FORMAT_SHORT_DATE)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| CodecError::unparseable_date(original))
}

/// Raises a stored primitive to the logical value a column of `affinity`
/// holds.
///
/// SQL NULL raises to [`Value::Null`] under every affinity. Under the
/// extended affinities the recognized stored forms convert (integer and
/// legacy `TRUE`/`FALSE` text for booleans, length-keyed text for dates);
/// a stored class the affinity does not recognize comes back as its
/// natural value, the storage class winning as it does in the engine.
pub fn decode(primitive: &Primitive, affinity: Affinity) -> CodecResult<Value> {
    if matches!(primitive, Primitive::Null) {
        return Ok(Value::Null);
    }
    match affinity {
        Affinity::Boolean => decode_boolean(primitive),
        Affinity::DateTime => decode_date_time(primitive),
        Affinity::HistoricDateTime => decode_historic(primitive),
        Affinity::Text | Affinity::Integer | Affinity::Real | Affinity::Blob | Affinity::Null => {
            Ok(natural(primitive))
        }
    }
}

fn natural(primitive: &Primitive) -> Value {
    match primitive {
        Primitive::Null => Value::Null,
        Primitive::Integer(n) => Value::Integer(*n),
        Primitive::Real(x) => Value::Real(*x),
        Primitive::Text(s) => Value::Text(s.clone()),
        Primitive::Blob(b) => Value::Blob(b.clone()),
    }
}

fn decode_boolean(primitive: &Primitive) -> CodecResult<Value> {
    match primitive {
        Primitive::Integer(n) => Ok(Value::Bool(*n != 0)),
        Primitive::Text(s) if s.eq_ignore_ascii_case("TRUE") => Ok(Value::Bool(true)),
        Primitive::Text(s) if s.eq_ignore_ascii_case("FALSE") => Ok(Value::Bool(false)),
        Primitive::Text(s) => Err(CodecError::malformed_boolean(s.clone())),
        other => Ok(natural(other)),
    }
}

fn decode_date_time(primitive: &Primitive) -> CodecResult<Value> {
    match primitive {
        Primitive::Text(s) => Ok(Value::DateTime(parse_date_text(s)?)),
        other => Ok(natural(other)),
    }
}

fn decode_historic(primitive: &Primitive) -> CodecResult<Value> {
    match primitive {
        Primitive::Text(s) => Ok(Value::Historic(HistoricDate::parse(s)?)),
        other => Ok(natural(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn stored_forms_are_keyed_by_length() {
        let expect = |y, m, d, h, mi, s| Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap();
        assert_eq!(
            parse_date_text("2019-07-20 20:17:40").unwrap(),
            expect(2019, 7, 20, 20, 17, 40)
        );
        assert_eq!(parse_date_text("2019-07-20").unwrap(), expect(2019, 7, 20, 0, 0, 0));
        assert_eq!(parse_date_text("2019-07").unwrap(), expect(2019, 7, 1, 0, 0, 0));
        assert_eq!(parse_date_text("2019").unwrap(), expect(2019, 1, 1, 0, 0, 0));
    }

    #[test]
    fn unrecognized_length_is_malformed() {
        for text in ["2019-07-20 20:17", "2019-7-20", "19", ""] {
            assert!(matches!(
                parse_date_text(text),
                Err(CodecError::MalformedDate { .. })
            ));
        }
    }

    #[test]
    fn recognized_length_that_does_not_parse_is_unparseable() {
        for text in ["2019-13-40 99:99:99", "2019-00-01", "20xx-07", "abcd"] {
            assert!(matches!(
                parse_date_text(text),
                Err(CodecError::UnparseableDate { .. })
            ));
        }
    }

    #[test]
    fn legacy_boolean_text_is_accepted_case_insensitively() {
        for text in ["TRUE", "true", "True"] {
            assert_eq!(
                decode(&Primitive::Text(text.to_string()), Affinity::Boolean).unwrap(),
                Value::Bool(true)
            );
        }
        assert_eq!(
            decode(&Primitive::Text("false".to_string()), Affinity::Boolean).unwrap(),
            Value::Bool(false)
        );
        assert!(matches!(
            decode(&Primitive::Text("yes".to_string()), Affinity::Boolean),
            Err(CodecError::MalformedBoolean { .. })
        ));
    }

    #[test]
    fn nonzero_integers_read_as_true() {
        assert_eq!(
            decode(&Primitive::Integer(-3), Affinity::Boolean).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            decode(&Primitive::Integer(0), Affinity::Boolean).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn unrecognized_storage_class_reads_as_natural_value() {
        assert_eq!(
            decode(&Primitive::Real(1.5), Affinity::Boolean).unwrap(),
            Value::Real(1.5)
        );
        assert_eq!(
            decode(&Primitive::Integer(42), Affinity::DateTime).unwrap(),
            Value::Integer(42)
        );
    }

    proptest! {
        #[test]
        fn full_length_text_roundtrips(
            year in 1i32..=9999,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) {
            let moment = Utc
                .with_ymd_and_hms(year, month, day, hour, minute, second)
                .unwrap();
            let text = crate::encode::format_date_time(moment);
            prop_assert_eq!(text.len(), 19);
            prop_assert_eq!(parse_date_text(&text).unwrap(), moment);
        }
    }
}

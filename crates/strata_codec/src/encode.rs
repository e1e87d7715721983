//! Lowering logical values to engine primitives.

use crate::affinity::Affinity;
use crate::decode::parse_date_text;
use crate::error::{CodecError, CodecResult};
use crate::historic::HistoricDate;
use crate::value::{Primitive, Value};
use crate::FORMAT_DATE_TIME;
use chrono::{DateTime, Utc};

/// Formats a date-time as the stored 19-character UTC text form.
#[must_use]
pub fn format_date_time(moment: DateTime<Utc>) -> String {
    moment.format(FORMAT_DATE_TIME).to_string()
}

/// Lowers `value` to the primitive stored for a column of `affinity`.
///
/// Null lowers to SQL NULL under every affinity. Booleans become integer
/// 0/1, date-times become normalized text. Text supplied for a date
/// affinity is parsed and re-emitted in the canonical stored form, so the
/// engine never sees a non-canonical date. A value whose shape the
/// affinity cannot represent is a [`CodecError::Coercion`]; `column` only
/// feeds that diagnostic.
pub fn encode(value: &Value, affinity: Affinity, column: &str) -> CodecResult<Primitive> {
    if value.is_null() {
        return Ok(Primitive::Null);
    }
    match affinity {
        Affinity::Null => Ok(natural(value)),
        Affinity::Integer => match value {
            Value::Integer(n) => Ok(Primitive::Integer(*n)),
            Value::Bool(b) => Ok(Primitive::Integer(i64::from(*b))),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::Real => match value {
            Value::Real(x) => Ok(Primitive::Real(*x)),
            Value::Integer(n) => Ok(Primitive::Real(*n as f64)),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::Text => match value {
            Value::Text(s) => Ok(Primitive::Text(s.clone())),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::Blob => match value {
            Value::Blob(b) => Ok(Primitive::Blob(b.clone())),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::Boolean => match value {
            Value::Bool(b) => Ok(Primitive::Integer(i64::from(*b))),
            Value::Integer(n) => Ok(Primitive::Integer(i64::from(*n != 0))),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::DateTime => match value {
            Value::DateTime(moment) => Ok(Primitive::Text(format_date_time(*moment))),
            Value::Text(s) => Ok(Primitive::Text(format_date_time(parse_date_text(s)?))),
            other => Err(mismatch(column, affinity, other)),
        },
        Affinity::HistoricDateTime => match value {
            Value::Historic(date) => Ok(Primitive::Text(date.to_text())),
            Value::Text(s) => Ok(Primitive::Text(HistoricDate::parse(s)?.to_text())),
            other => Err(mismatch(column, affinity, other)),
        },
    }
}

/// Lowers a value by its natural storage class, for columns with no
/// declared affinity.
fn natural(value: &Value) -> Primitive {
    match value {
        Value::Null => Primitive::Null,
        Value::Bool(b) => Primitive::Integer(i64::from(*b)),
        Value::Integer(n) => Primitive::Integer(*n),
        Value::Real(x) => Primitive::Real(*x),
        Value::Text(s) => Primitive::Text(s.clone()),
        Value::Blob(b) => Primitive::Blob(b.clone()),
        Value::DateTime(moment) => Primitive::Text(format_date_time(*moment)),
        Value::Historic(date) => Primitive::Text(date.to_text()),
    }
}

fn mismatch(column: &str, affinity: Affinity, value: &Value) -> CodecError {
    CodecError::coercion(column, affinity, value.kind())
}

//! Dates outside the range the regular date-time affinity covers.

use crate::error::{CodecError, CodecResult};
use std::fmt;

/// A proleptic Gregorian date with an expanded year.
///
/// Years use astronomical numbering: year 0 is 1 BCE, year -1 is 2 BCE.
/// The stored text form is `±YYYYYY-MM-DD`, always 13 characters, with the
/// sign mandatory and the year zero-padded to six digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoricDate {
    year: i32,
    month: u8,
    day: u8,
}

impl HistoricDate {
    /// Largest year magnitude the six-digit text form can carry.
    pub const MAX_YEAR: i32 = 999_999;

    /// Creates a date, validating that the year fits the six-digit form
    /// and that the month and day exist on the proleptic calendar.
    pub fn new(year: i32, month: u8, day: u8) -> CodecResult<Self> {
        let out_of_range = CodecError::HistoricDateOutOfRange { year, month, day };
        if year.abs() > Self::MAX_YEAR {
            return Err(out_of_range);
        }
        if month < 1 || month > 12 {
            return Err(out_of_range);
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(out_of_range);
        }
        Ok(Self { year, month, day })
    }

    /// Astronomical year (0 is 1 BCE).
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1-12.
    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, 1-31.
    #[must_use]
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The stored 13-character text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        let sign = if self.year < 0 { '-' } else { '+' };
        format!(
            "{sign}{:06}-{:02}-{:02}",
            self.year.unsigned_abs(),
            self.month,
            self.day
        )
    }

    /// Parses the stored text form.
    pub fn parse(text: &str) -> CodecResult<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 13 || bytes[7] != b'-' || bytes[10] != b'-' {
            return Err(CodecError::malformed_historic(text));
        }
        let sign = match bytes[0] {
            b'+' => 1,
            b'-' => -1,
            _ => return Err(CodecError::malformed_historic(text)),
        };
        let year = parse_digits(text, &text[1..7])? as i32 * sign;
        let month = parse_digits(text, &text[8..10])? as u8;
        let day = parse_digits(text, &text[11..13])? as u8;
        Self::new(year, month, day)
    }
}

impl fmt::Display for HistoricDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn parse_digits(text: &str, slice: &str) -> CodecResult<u32> {
    if !slice.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::malformed_historic(text));
    }
    slice
        .parse()
        .map_err(|_| CodecError::malformed_historic(text))
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

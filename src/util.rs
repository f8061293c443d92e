// Utility helpers for parsing source values and formatting counts.
//
// Keeps the raw CSV string handling in one place so the pipeline stages can
// work with typed values only.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use std::num::ParseFloatError;

/// Date column headers look like `1/22/20` (month/day/two-digit year).
pub const DATE_LABEL_FORMAT: &str = "%m/%d/%y";

/// Parse a cumulative count cell.
///
/// - Trims whitespace.
/// - Accepts plain integers, and integers written with a zero fraction such
///   as `12.0`, which some exports produce.
/// - Rejects empty cells, exponents, non-zero fractions, negative numbers and
///   anything outside the `i64` range.
pub fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = match s.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        Some(_) => return None,
        None => s,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()
}

/// Parse an optional coordinate; an empty cell is `Ok(None)`.
pub fn parse_coord(s: &str) -> Result<Option<f64>, ParseFloatError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>().map(Some)
}

pub fn parse_date_label(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_LABEL_FORMAT).ok()
}

/// Inverse of `parse_date_label`, producing the unpadded form used by the source headers.
#[cfg(test)]
pub fn format_date_label(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

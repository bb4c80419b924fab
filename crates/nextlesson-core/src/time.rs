//! Decoding for the upstream's integer date and time encodings.
//!
//! Dates travel as 8-digit `YYYYMMDD` integers and times as `HHMM`
//! integers relative to the period's date.

use chrono::{NaiveDate, NaiveDateTime};

/// Decodes an 8-digit `YYYYMMDD` integer into a calendar date.
pub fn decode_date(yyyymmdd: i64) -> Option<NaiveDate> {
    let year = i32::try_from(yyyymmdd / 10_000).ok()?;
    let month = u32::try_from((yyyymmdd % 10_000) / 100).ok()?;
    let day = u32::try_from(yyyymmdd % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Decodes an `HHMM` integer into a datetime on the given date.
pub fn decode_time(date: NaiveDate, hhmm: i64) -> Option<NaiveDateTime> {
    let hour = u32::try_from(hhmm / 100).ok()?;
    let minute = u32::try_from(hhmm % 100).ok()?;
    date.and_hms_opt(hour, minute, 0)
}

/// Encodes a date back into the upstream's `YYYYMMDD` integer form.
pub fn date_number(date: NaiveDate) -> i64 {
    iso_date(date).replace('-', "").parse().unwrap_or(0)
}

/// Formats a date as `YYYY-MM-DD` for query parameters.
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

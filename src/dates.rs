//! Calendar date helpers.
//!
//! Dates travel through the app as zero-padded `YYYY-MM-DD` strings so they
//! compare chronologically as plain strings. Parsing happens only here.

use jiff::civil::Date;
use jiff::{Timestamp, ToSpan, Zoned};

/// A date string that is not a valid `YYYY-MM-DD` calendar date.
#[derive(Debug, thiserror::Error)]
#[error("invalid date '{input}': {source}")]
pub struct DateError {
    input: String,
    source: jiff::Error,
}

/// Today's date in the zone of `now`.
pub fn today(now: &Zoned) -> String {
    now.date().to_string()
}

/// The day after today in the zone of `now`.
pub fn tomorrow(now: &Zoned) -> String {
    // Only fails past the end of jiff's supported range (year 9999).
    now.date()
        .tomorrow()
        .map_or_else(|_| today(now), |d| d.to_string())
}

/// Shift a `YYYY-MM-DD` date by a number of days.
pub fn add_days(date: &str, days: i64) -> Result<String, DateError> {
    let parsed = parse(date)?;
    parsed
        .checked_add(days.days())
        .map(|d| d.to_string())
        .map_err(|source| DateError {
            input: date.to_string(),
            source,
        })
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse(date: &str) -> Result<Date, DateError> {
    date.parse::<Date>().map_err(|source| DateError {
        input: date.to_string(),
        source,
    })
}

/// Short "how long ago" text for draft listings.
///
/// Under five seconds is "just now"; then seconds, minutes and hours;
/// anything a day or older prints the local date and time instead.
pub fn format_relative_time(at: Timestamp, now: &Zoned) -> String {
    let secs = now.timestamp().duration_since(at).as_secs();

    if secs < 5 {
        return "just now".to_string();
    }
    if secs < 60 {
        return format!("{secs}s ago");
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    at.to_zoned(now.time_zone().clone())
        .strftime("%b %-d, %H:%M")
        .to_string()
}

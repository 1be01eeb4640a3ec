//! Date parsing for launch records and filter bounds
//!
//! Accepts RFC 3339 timestamps (any offset, normalised to UTC) and a few
//! naive forms, which are taken to be UTC.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const NAIVE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
];

const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse `input`, returning the UTC instant and whether it carried an offset
fn parse_with_zone(input: &str) -> Option<(OffsetDateTime, bool)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some((dt.to_offset(UtcOffset::UTC), true));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(input, format).ok())
        .or_else(|| Date::parse(input, DATE_ONLY).ok().map(|date| date.midnight()))
        .map(|dt| (dt.assume_utc(), false))
}

/// Parse a record timestamp. Naive values are assumed UTC.
pub fn parse_date(input: &str) -> Option<OffsetDateTime> {
    parse_with_zone(input).map(|(dt, _)| dt)
}

/// Parse a filter bound supplied by a user, logging the assumptions made
pub fn parse_bound(input: &str) -> Option<OffsetDateTime> {
    if input.trim().is_empty() {
        return None;
    }
    match parse_with_zone(input) {
        Some((dt, true)) => Some(dt),
        Some((dt, false)) => {
            tracing::warn!("Assuming date bound {} is in UTC", input);
            Some(dt)
        }
        None => {
            tracing::warn!("Invalid date format: {}", input);
            None
        }
    }
}

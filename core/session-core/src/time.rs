//! Instant parsing and viewer-zone conversion for session times.
//!
//! This is the only place that decides how a backend time string becomes an
//! absolute instant. The backend sends any of:
//!
//! ```text
//! 2026-03-04T09:30:00Z          absolute, offset carried
//! 2026-03-04T09:30:00+02:00     absolute, offset carried
//! 2026-03-04 09:30:00           naive wall-clock (basis decides the zone)
//! 09:30 / 09:30:00 / 9:30 AM    time of day, combined with session_date
//! ```
//!
//! Naive values are UTC wall-clock by default, which is how the backend stores
//! them. `NaiveTimeBasis::Viewer` treats them as already local.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::patterns::{RE_DATE_PREFIX, RE_TIME_OF_DAY, RE_TIME_OF_DAY_12H};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaiveTimeBasis {
    #[default]
    Utc,
    Viewer,
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Normalizes a session date (`YYYY-MM-DD` or anything starting with it).
pub fn parse_session_date(value: &str) -> Option<NaiveDate> {
    let caps = RE_DATE_PREFIX.captures(value)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}

/// Parses a session time into an absolute instant.
///
/// `session_date` is required only for time-of-day values. `viewer` is the
/// zone naive values are placed in under `NaiveTimeBasis::Viewer`.
pub fn parse_instant<Tz: TimeZone>(
    value: &str,
    session_date: Option<NaiveDate>,
    basis: NaiveTimeBasis,
    viewer: &Tz,
) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if RE_DATE_PREFIX.is_match(value) {
        return parse_datetime(value, basis, viewer);
    }

    let time = parse_time_of_day(value)?;
    let date = session_date?;
    localize(date.and_time(time), basis, viewer)
}

fn parse_datetime<Tz: TimeZone>(
    value: &str,
    basis: NaiveTimeBasis,
    viewer: &Tz,
) -> Option<DateTime<Utc>> {
    // RFC 3339 wants a `T`; the backend sometimes sends a space.
    let normalized = if value.as_bytes().get(10) == Some(&b' ') {
        format!("{}T{}", &value[..10], &value[11..])
    } else {
        value.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| localize(naive, basis, viewer))
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    if RE_TIME_OF_DAY.is_match(value) {
        return TIME_OF_DAY_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(value, format).ok());
    }
    if RE_TIME_OF_DAY_12H.is_match(value) {
        let compact: String = value.split_whitespace().collect();
        return NaiveTime::parse_from_str(&compact, "%I:%M%p").ok();
    }
    None
}

/// Places a wall-clock value in its zone. DST gaps yield `None`, folds pick
/// the earlier instant.
fn localize<Tz: TimeZone>(
    naive: NaiveDateTime,
    basis: NaiveTimeBasis,
    viewer: &Tz,
) -> Option<DateTime<Utc>> {
    match basis {
        NaiveTimeBasis::Utc => Some(Utc.from_utc_datetime(&naive)),
        NaiveTimeBasis::Viewer => viewer
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

pub fn to_viewer_local<Tz: TimeZone>(instant: DateTime<Utc>, viewer: &Tz) -> DateTime<Tz> {
    instant.with_timezone(viewer)
}

/// `HH:MM` in the viewer's zone, as shown on session cards.
pub fn format_time_of_day<Tz>(instant: DateTime<Utc>, viewer: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    to_viewer_local(instant, viewer).format("%H:%M").to_string()
}

//! Compiled regex patterns for normalizing backend session fields.
//!
//! Compiled once on first use. Update these when the backend changes its
//! date or link formats.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading `YYYY-MM-DD` of a date or datetime string.
pub static RE_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4}-\d{2}-\d{2})").unwrap());

/// A bare time of day: `HH:MM`, `HH:MM:SS`, optional fraction.
pub static RE_TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap());

/// A 12-hour clock time such as `9:30 AM`.
pub static RE_TIME_OF_DAY_12H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d{1,2}:\d{2}\s*[ap]m$").unwrap());

/// An absolute http(s) URL with a host.
pub static RE_MEETING_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").unwrap());

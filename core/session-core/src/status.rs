//! Persisted session status and the presentation buckets derived from it.
//!
//! The two vocabularies are kept apart: the backend
//! persists `scheduled`/`completed`/`cancelled`/`missed`, while badges show
//! `upcoming`/`ongoing`/`finished`/`completed`/`cancelled`. Only the resolver
//! maps one onto the other.

use serde::{Deserialize, Serialize};

/// Lifecycle status as persisted by the backend.
///
/// Unrecognized values are kept verbatim in `Unknown` so they round-trip,
/// and are never joinable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PersistedStatus {
    Scheduled,
    Completed,
    Cancelled,
    Missed,
    Unknown(String),
}

impl PersistedStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "scheduled" => PersistedStatus::Scheduled,
            "completed" => PersistedStatus::Completed,
            "cancelled" | "canceled" => PersistedStatus::Cancelled,
            "missed" => PersistedStatus::Missed,
            _ => PersistedStatus::Unknown(value.to_string()),
        }
    }

    /// Status from an optional wire field; a missing status is `Unknown("")`.
    pub fn from_wire(value: Option<&str>) -> Self {
        value
            .map(PersistedStatus::parse)
            .unwrap_or_else(|| PersistedStatus::Unknown(String::new()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            PersistedStatus::Scheduled => "scheduled",
            PersistedStatus::Completed => "completed",
            PersistedStatus::Cancelled => "cancelled",
            PersistedStatus::Missed => "missed",
            PersistedStatus::Unknown(raw) => raw,
        }
    }

    /// Only scheduled sessions can ever be joined.
    pub fn allows_join(&self) -> bool {
        matches!(self, PersistedStatus::Scheduled)
    }
}

impl From<String> for PersistedStatus {
    fn from(value: String) -> Self {
        PersistedStatus::parse(&value)
    }
}

impl From<PersistedStatus> for String {
    fn from(status: PersistedStatus) -> String {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for PersistedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Presentation bucket shown as a badge in session views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBucket {
    Upcoming,
    Ongoing,
    Finished,
    Completed,
    Cancelled,
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 5] = [
        StatusBucket::Upcoming,
        StatusBucket::Ongoing,
        StatusBucket::Finished,
        StatusBucket::Completed,
        StatusBucket::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBucket::Upcoming => "upcoming",
            StatusBucket::Ongoing => "ongoing",
            StatusBucket::Finished => "finished",
            StatusBucket::Completed => "completed",
            StatusBucket::Cancelled => "cancelled",
        }
    }

    /// Buckets driven by persisted status alone; time cannot move a session out of them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusBucket::Completed | StatusBucket::Cancelled)
    }
}

impl std::fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// How finely a view splits non-terminal sessions.
///
/// Some screens only show upcoming/finished; others also surface sessions
/// currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketGranularity {
    /// Never yields `Ongoing`.
    #[default]
    Coarse,
    /// Yields `Ongoing` while `now` is inside `[start, end]`.
    Fine,
}

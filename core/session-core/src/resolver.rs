//! Session status and join-window resolution.
//!
//! Given a session record, the viewer's current instant and a grace period,
//! derives what every session view needs:
//!
//! ```text
//! is_upcoming   session_date >= today (viewer zone) && status != completed
//! status_bucket cancelled > completed > upcoming (ongoing|upcoming) > finished
//! can_join      status == scheduled && start - grace <= now <= end
//! ```
//!
//! Resolution never fails. Unparseable or missing times close the join
//! window; unknown statuses land in `Finished`. The zone of `now` is the
//! viewer's zone: it decides which calendar day "today" is and where naive
//! wall-clock times sit under `NaiveTimeBasis::Viewer`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use portal_protocol::SessionRecord;
use serde::{Deserialize, Serialize};

use crate::grace::GracePeriod;
use crate::status::{BucketGranularity, PersistedStatus, StatusBucket};
use crate::time::{parse_instant, parse_session_date, NaiveTimeBasis};

/// The inclusive instant range `[start - grace, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
}

impl JoinWindow {
    /// `None` when `end` precedes `start`, or the grace pushes the opening
    /// out of the representable range.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, grace: GracePeriod) -> Option<Self> {
        if end < start {
            return None;
        }
        let opens_at = start.checked_sub_signed(grace.as_duration())?;
        Some(Self {
            opens_at,
            closes_at: end,
        })
    }

    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        now >= self.opens_at && now <= self.closes_at
    }

    /// Time left until the window opens; `None` once it has opened.
    pub fn opens_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        (now < self.opens_at).then(|| self.opens_at.signed_duration_since(now))
    }

    /// Time left until the window closes; `None` once it has closed.
    pub fn closes_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        (now <= self.closes_at).then(|| self.closes_at.signed_duration_since(now))
    }
}

/// Normalized times of one record, as seen from the viewer's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimes {
    /// `session_date`, or the viewer-local date of `start` when the record has none.
    pub date: Option<NaiveDate>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SessionTimes {
    pub fn from_record<Tz: TimeZone>(
        session: &SessionRecord,
        viewer: &Tz,
        basis: NaiveTimeBasis,
    ) -> Self {
        let declared = session.session_date.as_deref().and_then(parse_session_date);
        let parse = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|raw| parse_instant(raw, declared, basis, viewer))
        };
        let start = parse(&session.start_time);
        let end = parse(&session.end_time);
        let date =
            declared.or_else(|| start.map(|instant| instant.with_timezone(viewer).date_naive()));

        Self { date, start, end }
    }

    fn in_progress(&self, now: DateTime<Utc>) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end && now >= start && now <= end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    pub grace: GracePeriod,
    pub granularity: BucketGranularity,
    pub basis: NaiveTimeBasis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSession {
    pub is_upcoming: bool,
    pub can_join: bool,
    pub status_bucket: StatusBucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_window: Option<JoinWindow>,
}

pub fn resolve_session_state<Tz: TimeZone>(
    session: &SessionRecord,
    now: &DateTime<Tz>,
    grace: GracePeriod,
    granularity: BucketGranularity,
) -> ResolvedSession {
    resolve_with_options(
        session,
        now,
        &ResolveOptions {
            grace,
            granularity,
            ..ResolveOptions::default()
        },
    )
}

/// Resolution with the default 15 minute grace and coarse buckets.
pub fn resolve_with_default_grace<Tz: TimeZone>(
    session: &SessionRecord,
    now: &DateTime<Tz>,
) -> ResolvedSession {
    resolve_with_options(session, now, &ResolveOptions::default())
}

pub fn resolve_with_options<Tz: TimeZone>(
    session: &SessionRecord,
    now: &DateTime<Tz>,
    options: &ResolveOptions,
) -> ResolvedSession {
    let viewer = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    let status = PersistedStatus::from_wire(session.status.as_deref());
    let times = SessionTimes::from_record(session, &viewer, options.basis);

    let is_upcoming =
        times.date.map_or(false, |date| date >= today) && status != PersistedStatus::Completed;

    let join_window = match (times.start, times.end) {
        (Some(start), Some(end)) => {
            let window = JoinWindow::new(start, end, options.grace);
            if window.is_none() {
                tracing::debug!(
                    session_id = %session.id,
                    start = %start,
                    end = %end,
                    "Session ends before it starts; join window closed"
                );
            }
            window
        }
        _ => {
            tracing::debug!(
                session_id = %session.id,
                start_time = ?session.start_time,
                end_time = ?session.end_time,
                "Session times unresolvable; join window closed"
            );
            None
        }
    };

    let can_join =
        status.allows_join() && join_window.map_or(false, |window| window.contains(now_utc));

    let status_bucket = match status {
        PersistedStatus::Cancelled => StatusBucket::Cancelled,
        PersistedStatus::Completed => StatusBucket::Completed,
        PersistedStatus::Scheduled | PersistedStatus::Missed if is_upcoming => {
            if options.granularity == BucketGranularity::Fine && times.in_progress(now_utc) {
                StatusBucket::Ongoing
            } else {
                StatusBucket::Upcoming
            }
        }
        _ => StatusBucket::Finished,
    };

    ResolvedSession {
        is_upcoming,
        can_join,
        status_bucket,
        join_window,
    }
}

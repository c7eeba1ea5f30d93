//! List-level derivation for session views.
//!
//! The calendar and list screens resolve a whole page at once, then group it
//! by day, narrow it to the visible date range, and count badges.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use portal_protocol::SessionRecord;
use serde::Serialize;

use crate::resolver::{resolve_with_options, ResolveOptions, ResolvedSession, SessionTimes};
use crate::status::{PersistedStatus, StatusBucket};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntry {
    pub session: SessionRecord,
    /// Calendar day the session is listed under, in the viewer's zone.
    pub date: Option<NaiveDate>,
    pub state: ResolvedSession,
}

/// Resolves every session against the same `now`.
pub fn resolve_all<Tz: TimeZone>(
    sessions: &[SessionRecord],
    now: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Vec<ResolvedEntry> {
    let viewer = now.timezone();
    sessions
        .iter()
        .map(|session| ResolvedEntry {
            session: session.clone(),
            date: SessionTimes::from_record(session, &viewer, options.basis).date,
            state: resolve_with_options(session, now, options),
        })
        .collect()
}

/// Groups entries by calendar day. Undated entries are left out.
pub fn group_by_date(entries: &[ResolvedEntry]) -> BTreeMap<NaiveDate, Vec<&ResolvedEntry>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ResolvedEntry>> = BTreeMap::new();
    for entry in entries {
        if let Some(date) = entry.date {
            groups.entry(date).or_default().push(entry);
        }
    }
    for day in groups.values_mut() {
        day.sort_by(|left, right| {
            left.state
                .join_window
                .map(|w| w.closes_at)
                .cmp(&right.state.join_window.map(|w| w.closes_at))
                .then_with(|| left.session.id.cmp(&right.session.id))
        });
    }
    groups
}

/// Entries dated within `[from, to]`.
pub fn filter_range(
    entries: &[ResolvedEntry],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<&ResolvedEntry> {
    entries
        .iter()
        .filter(|entry| entry.date.map_or(false, |date| date >= from && date <= to))
        .collect()
}

/// Badge counts for a list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BucketSummary {
    pub upcoming: usize,
    pub ongoing: usize,
    pub finished: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub joinable: usize,
}

impl BucketSummary {
    pub fn tally<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ResolvedEntry>,
    {
        let mut summary = BucketSummary::default();
        for entry in entries {
            match entry.state.status_bucket {
                StatusBucket::Upcoming => summary.upcoming += 1,
                StatusBucket::Ongoing => summary.ongoing += 1,
                StatusBucket::Finished => summary.finished += 1,
                StatusBucket::Completed => summary.completed += 1,
                StatusBucket::Cancelled => summary.cancelled += 1,
            }
            if entry.state.can_join {
                summary.joinable += 1;
            }
        }
        summary
    }

    pub fn count(&self, bucket: StatusBucket) -> usize {
        match bucket {
            StatusBucket::Upcoming => self.upcoming,
            StatusBucket::Ongoing => self.ongoing,
            StatusBucket::Finished => self.finished,
            StatusBucket::Completed => self.completed,
            StatusBucket::Cancelled => self.cancelled,
        }
    }

    pub fn total(&self) -> usize {
        StatusBucket::ALL.iter().map(|bucket| self.count(*bucket)).sum()
    }
}

/// The session to surface in a "next session" banner: one whose window is
/// open now, else the one that opens soonest. Only joinable-status sessions
/// with a window that has not closed qualify.
pub fn next_joinable(entries: &[ResolvedEntry], now: DateTime<Utc>) -> Option<&ResolvedEntry> {
    entries
        .iter()
        .filter(|entry| {
            PersistedStatus::from_wire(entry.session.status.as_deref()).allows_join()
                && entry
                    .state
                    .join_window
                    .map_or(false, |window| window.closes_at >= now)
        })
        .min_by(|left, right| {
            let key = |entry: &ResolvedEntry| entry.state.join_window.map(|w| w.opens_at);
            key(left)
                .cmp(&key(right))
                .then_with(|| left.session.id.cmp(&right.session.id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BucketGranularity;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
    }

    fn record(id: &str, status: &str, day: u32, start_hour: u32) -> SessionRecord {
        SessionRecord {
            session_date: Some(format!("2026-03-{:02}", day)),
            start_time: Some(format!("2026-03-{:02}T{:02}:00:00Z", day, start_hour)),
            end_time: Some(format!("2026-03-{:02}T{:02}:00:00Z", day, start_hour + 1)),
            status: Some(status.to_string()),
            ..SessionRecord::new(id)
        }
    }

    fn fixture() -> Vec<SessionRecord> {
        vec![
            record("a", "scheduled", 3, 10),
            record("b", "completed", 3, 12),
            record("c", "scheduled", 4, 14),
            record("d", "scheduled", 4, 9),
            record("e", "cancelled", 5, 9),
            record("f", "scheduled", 6, 9),
            SessionRecord::new("undated"),
        ]
    }

    fn fine() -> ResolveOptions {
        ResolveOptions {
            granularity: BucketGranularity::Fine,
            ..ResolveOptions::default()
        }
    }

    #[test]
    fn resolves_every_session_against_one_now() {
        let now = at(4, 9, 30);
        let entries = resolve_all(&fixture(), &now, &fine());
        assert_eq!(entries.len(), 7);

        let by_id = |id: &str| entries.iter().find(|e| e.session.id.as_str() == id).unwrap();
        assert_eq!(by_id("a").state.status_bucket, StatusBucket::Finished);
        assert_eq!(by_id("b").state.status_bucket, StatusBucket::Completed);
        assert_eq!(by_id("d").state.status_bucket, StatusBucket::Ongoing);
        assert!(by_id("d").state.can_join);
        assert_eq!(by_id("c").state.status_bucket, StatusBucket::Upcoming);
        assert!(by_id("undated").date.is_none());
    }

    #[test]
    fn groups_by_day_in_window_order() {
        let entries = resolve_all(&fixture(), &at(4, 9, 30), &ResolveOptions::default());
        let groups = group_by_date(&entries);
        let days: Vec<_> = groups.keys().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2026-03-03", "2026-03-04", "2026-03-05", "2026-03-06"]);

        let fourth = &groups[&NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()];
        let ids: Vec<_> = fourth.iter().map(|e| e.session.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c"]);
    }

    #[test]
    fn filters_inclusive_date_range() {
        let entries = resolve_all(&fixture(), &at(4, 9, 30), &ResolveOptions::default());
        let from = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let ids: Vec<_> = filter_range(&entries, from, to)
            .iter()
            .map(|e| e.session.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "d", "e"]);
    }

    #[test]
    fn tallies_buckets_and_joinable() {
        let entries = resolve_all(&fixture(), &at(4, 9, 30), &fine());
        let summary = BucketSummary::tally(&entries);
        assert_eq!(summary.finished, 2); // "a" and "undated"
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.ongoing, 1);
        assert_eq!(summary.upcoming, 2);
        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.joinable, 1);
        assert_eq!(summary.total(), entries.len());
    }

    #[test]
    fn next_joinable_prefers_open_window() {
        let entries = resolve_all(&fixture(), &at(4, 9, 30), &ResolveOptions::default());
        let next = next_joinable(&entries, at(4, 9, 30)).unwrap();
        assert_eq!(next.session.id.as_str(), "d");
    }

    #[test]
    fn next_joinable_skips_closed_and_cancelled() {
        let now = at(5, 8, 0);
        let entries = resolve_all(&fixture(), &now, &ResolveOptions::default());
        let next = next_joinable(&entries, now).unwrap();
        assert_eq!(next.session.id.as_str(), "f");
        assert!(!next.state.can_join);
        assert!(next.state.join_window.unwrap().opens_in(now).is_some());
    }

    #[test]
    fn next_joinable_none_when_nothing_left() {
        let now = at(7, 0, 0);
        let entries = resolve_all(&fixture(), &now, &ResolveOptions::default());
        assert!(next_joinable(&entries, now).is_none());
    }
}

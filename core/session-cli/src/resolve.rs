//! One-shot resolution of a session list.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use session_core::time::format_time_of_day;
use session_core::{
    resolve_all, BucketGranularity, BucketSummary, GracePeriod, ResolveOptions, ResolvedEntry,
    SessionConfig, SessionError,
};

use crate::input;

pub struct ResolveArgs {
    pub input: Option<PathBuf>,
    pub now: Option<String>,
    pub grace: Option<u32>,
    pub fine: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    now: DateTime<FixedOffset>,
    grace_minutes: u32,
    summary: BucketSummary,
    sessions: &'a [ResolvedEntry],
}

pub fn run(config: &SessionConfig, args: ResolveArgs) -> session_core::Result<()> {
    let page = input::load_sessions(args.input.as_deref())?;
    let clock = input::clock_for(args.now.as_deref())?;
    let options = options_with_overrides(config, args.grace, args.fine);
    let viewer = input::viewer_zone(config);
    let now = clock.now().with_timezone(&viewer);

    let entries = resolve_all(&page.data, &now, &options);
    let summary = BucketSummary::tally(&entries);

    if args.json {
        let report = ResolveReport {
            now,
            grace_minutes: options.grace.minutes(),
            summary,
            sessions: &entries,
        };
        let rendered = serde_json::to_string_pretty(&report).map_err(|source| SessionError::Json {
            context: "rendering report".to_string(),
            source,
        })?;
        println!("{}", rendered);
    } else {
        for line in render_table(&entries, now.with_timezone(&Utc), &viewer) {
            println!("{}", line);
        }
        println!("{}", render_summary(&summary));
    }
    Ok(())
}

pub fn options_with_overrides(
    config: &SessionConfig,
    grace: Option<u32>,
    fine: bool,
) -> ResolveOptions {
    let mut options = config.resolve_options();
    if let Some(minutes) = grace {
        options.grace = GracePeriod::from_minutes(minutes);
    }
    if fine {
        options.granularity = BucketGranularity::Fine;
    }
    options
}

pub fn render_table(
    entries: &[ResolvedEntry],
    now: DateTime<Utc>,
    viewer: &FixedOffset,
) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let date = entry
                .date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "----------".to_string());
            let span = entry
                .state
                .join_window
                .map(|window| {
                    format!(
                        "join {}-{}",
                        format_time_of_day(window.opens_at, viewer),
                        format_time_of_day(window.closes_at, viewer)
                    )
                })
                .unwrap_or_else(|| "no join window".to_string());
            format!(
                "{:>10}  {}  {:<9}  {:<5}  {}{}",
                entry.session.id,
                date,
                entry.state.status_bucket,
                if entry.state.can_join { "JOIN" } else { "-" },
                span,
                countdown(entry, now)
            )
        })
        .collect()
}

fn countdown(entry: &ResolvedEntry, now: DateTime<Utc>) -> String {
    if !entry.state.is_upcoming || entry.state.status_bucket.is_terminal() {
        return String::new();
    }
    match entry.state.join_window.and_then(|window| window.opens_in(now)) {
        Some(wait) if wait.num_hours() < 24 => {
            format!(" (opens in {}h{:02}m)", wait.num_hours(), wait.num_minutes() % 60)
        }
        _ => String::new(),
    }
}

pub fn render_summary(summary: &BucketSummary) -> String {
    format!(
        "{} sessions: {} upcoming, {} ongoing, {} finished, {} completed, {} cancelled; {} joinable",
        summary.total(),
        summary.upcoming,
        summary.ongoing,
        summary.finished,
        summary.completed,
        summary.cancelled,
        summary.joinable
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use session_core::SessionRecord;

    fn entry_at(now: DateTime<Utc>) -> Vec<ResolvedEntry> {
        let record = SessionRecord {
            session_date: Some("2026-03-04".to_string()),
            start_time: Some("10:00".to_string()),
            end_time: Some("11:00".to_string()),
            status: Some("scheduled".to_string()),
            ..SessionRecord::new("7")
        };
        resolve_all(&[record], &now, &ResolveOptions::default())
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let config = SessionConfig::default();
        let options = options_with_overrides(&config, Some(3), true);
        assert_eq!(options.grace.minutes(), 3);
        assert_eq!(options.granularity, BucketGranularity::Fine);

        let untouched = options_with_overrides(&config, None, false);
        assert_eq!(untouched, config.resolve_options());
    }

    #[test]
    fn table_shows_countdown_before_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 8, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let lines = render_table(&entry_at(now), now, &utc);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("upcoming"));
        assert!(lines[0].contains("join 09:45-11:00"));
        assert!(lines[0].ends_with("(opens in 1h15m)"));
    }

    #[test]
    fn table_marks_joinable() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 10, 15, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let lines = render_table(&entry_at(now), now, &utc);
        assert!(lines[0].contains("JOIN"));
        assert!(!lines[0].contains("opens in"));
    }

    #[test]
    fn summary_line_counts() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 10, 15, 0).unwrap();
        let summary = BucketSummary::tally(&entry_at(now));
        assert_eq!(
            render_summary(&summary),
            "1 sessions: 1 upcoming, 0 ongoing, 0 finished, 0 completed, 0 cancelled; 1 joinable"
        );
    }
}

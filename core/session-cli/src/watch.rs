//! Ticking re-resolution of a session list.
//!
//! Every tick takes one instant from a single clock and re-derives all
//! badges from it, logging sessions whose bucket or joinability changed.

use std::collections::HashMap;
use std::path::Path;
use std::thread;
use std::time::Duration as StdDuration;

use portal_protocol::SessionId;
use session_core::{
    resolve_all, Clock, OffsetClock, ResolvedEntry, SessionConfig, StatusBucket, SystemClock,
};

use crate::input;
use crate::resolve::render_summary;

type Snapshot = HashMap<SessionId, (StatusBucket, bool)>;

pub fn run(
    config: &SessionConfig,
    input_path: &Path,
    interval: Option<u64>,
    ticks: Option<u64>,
    now: Option<&str>,
) -> session_core::Result<()> {
    let page = input::load_sessions(Some(input_path))?;
    let options = config.resolve_options();
    let interval_secs = interval.unwrap_or(config.watch_interval_secs).max(1);

    let clock: Box<dyn Clock> = match now {
        Some(value) => Box::new(OffsetClock::anchored_at(SystemClock, input::parse_now(value)?)),
        None => Box::new(SystemClock),
    };

    tracing::info!(
        sessions = page.data.len(),
        interval_secs,
        grace_minutes = options.grace.minutes(),
        "Watching session list"
    );

    let mut previous = Snapshot::new();
    let mut tick: u64 = 0;
    loop {
        let viewer = input::viewer_zone(config);
        let now = clock.now().with_timezone(&viewer);
        let entries = resolve_all(&page.data, &now, &options);

        for change in diff(&previous, &entries) {
            println!("{} {}", now.format("%Y-%m-%d %H:%M:%S"), change);
        }
        println!(
            "{} {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            render_summary(&session_core::BucketSummary::tally(&entries))
        );
        previous = snapshot(&entries);

        tick += 1;
        if ticks.map_or(false, |limit| tick >= limit) {
            return Ok(());
        }
        thread::sleep(StdDuration::from_secs(interval_secs));
    }
}

fn snapshot(entries: &[ResolvedEntry]) -> Snapshot {
    entries
        .iter()
        .map(|entry| {
            (
                entry.session.id.clone(),
                (entry.state.status_bucket, entry.state.can_join),
            )
        })
        .collect()
}

/// Human-readable changes between the last tick and this one. The first tick
/// reports nothing.
fn diff(previous: &Snapshot, entries: &[ResolvedEntry]) -> Vec<String> {
    if previous.is_empty() {
        return Vec::new();
    }

    let mut changes = Vec::new();
    for entry in entries {
        let Some((bucket, can_join)) = previous.get(&entry.session.id) else {
            continue;
        };
        if *bucket != entry.state.status_bucket {
            tracing::info!(
                session_id = %entry.session.id,
                from = %bucket,
                to = %entry.state.status_bucket,
                "Session bucket changed"
            );
            changes.push(format!(
                "session {}: {} -> {}",
                entry.session.id, bucket, entry.state.status_bucket
            ));
        }
        if *can_join != entry.state.can_join {
            changes.push(format!(
                "session {}: join {}",
                entry.session.id,
                if entry.state.can_join { "opened" } else { "closed" }
            ));
        }
    }
    changes
}

//! Join a single session: print its meeting URL when the window is open.

use std::path::PathBuf;

use chrono::Utc;
use session_core::{
    join_session, resolve_with_options, OfflineCheckIn, SessionConfig, SessionError,
};

use crate::input;

pub fn run(
    config: &SessionConfig,
    input_path: Option<PathBuf>,
    id: &str,
    now: Option<&str>,
) -> session_core::Result<()> {
    let page = input::load_sessions(input_path.as_deref())?;
    let session = page
        .data
        .iter()
        .find(|record| record.id.as_str() == id)
        .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;

    let clock = input::clock_for(now)?;
    let viewer = input::viewer_zone(config);
    let now = clock.now().with_timezone(&viewer);
    let resolved = resolve_with_options(session, &now, &config.resolve_options());

    if !resolved.can_join {
        if let Some(wait) = resolved
            .join_window
            .and_then(|window| window.opens_in(now.with_timezone(&Utc)))
        {
            tracing::info!(
                session_id = %session.id,
                minutes = wait.num_minutes(),
                "Join window not open yet"
            );
        }
    }

    let url = join_session(&OfflineCheckIn, session, &resolved)?;
    println!("{}", url);
    Ok(())
}

//! Shared input handling: session payloads, the viewer zone, and "now".

use std::io::{self, Read};
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use portal_protocol::{parse_session_list, SessionPage};
use session_core::{Clock, FixedClock, SessionConfig, SessionError, SystemClock};

/// Reads a session list from `path`, or stdin when `None` or `-`.
pub fn load_sessions(path: Option<&Path>) -> session_core::Result<SessionPage> {
    let (content, source) = match path {
        Some(path) if path != Path::new("-") => {
            let content = fs_err::read_to_string(path).map_err(|source| SessionError::Io {
                context: format!("reading {}", path.display()),
                source,
            })?;
            (content, path.display().to_string())
        }
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .map_err(|source| SessionError::Io {
                    context: "reading stdin".to_string(),
                    source,
                })?;
            (content, "stdin".to_string())
        }
    };

    parse_sessions(&content, &source)
}

pub fn parse_sessions(content: &str, source: &str) -> session_core::Result<SessionPage> {
    let payload: serde_json::Value =
        serde_json::from_str(content).map_err(|source_err| SessionError::Json {
            context: format!("parsing session list from {}", source),
            source: source_err,
        })?;
    let page = parse_session_list(payload)?;
    tracing::debug!(
        source,
        sessions = page.data.len(),
        current_page = page.current_page,
        last_page = page.last_page,
        "Session list loaded"
    );
    if page.has_next() {
        tracing::warn!(
            current_page = page.current_page,
            last_page = page.last_page,
            "Session list is one page of several; later pages are not included"
        );
    }
    Ok(page)
}

/// The viewer's zone: the configured offset, else the system's current offset.
pub fn viewer_zone(config: &SessionConfig) -> FixedOffset {
    config
        .viewer_offset()
        .unwrap_or_else(|| Local::now().offset().fix())
}

pub fn parse_now(value: &str) -> session_core::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            SessionError::Protocol(portal_protocol::ErrorInfo::new(
                "invalid_timestamp",
                format!("--now must be RFC 3339 ({}): {}", value, err),
            ))
        })
}

/// A fixed clock for `--now`, the system clock otherwise.
pub fn clock_for(now: Option<&str>) -> session_core::Result<Box<dyn Clock>> {
    match now {
        Some(value) => Ok(Box::new(FixedClock::new(parse_now(value)?))),
        None => Ok(Box::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_array_payload() {
        let page = parse_sessions(r#"[{"id": 1, "status": "scheduled"}]"#, "test").unwrap();
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn invalid_json_is_json_error() {
        let err = parse_sessions("{not json", "test").unwrap_err();
        assert!(matches!(err, SessionError::Json { .. }));
    }

    #[test]
    fn invalid_shape_is_protocol_error() {
        let err = parse_sessions("42", "test").unwrap_err();
        assert!(matches!(err, SessionError::Protocol(_)));
    }

    #[test]
    fn now_accepts_offsets() {
        let now = parse_now("2026-03-04T12:00:00+02:00").unwrap();
        assert_eq!(now, Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap());
        assert!(parse_now("yesterday").is_err());
    }

    #[test]
    fn configured_zone_wins() {
        let config = SessionConfig {
            utc_offset_minutes: Some(330),
            ..SessionConfig::default()
        };
        assert_eq!(viewer_zone(&config), FixedOffset::east_opt(330 * 60).unwrap());
    }

    #[test]
    fn fixed_clock_for_explicit_now() {
        let clock = clock_for(Some("2026-03-04T10:00:00Z")).unwrap();
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap());
    }
}

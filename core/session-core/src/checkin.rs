//! The join action layered on top of resolution.
//!
//! Joining is the only side-effecting step: a check-in call to the backend
//! that validates attendance and hands back the meeting URL. It is attempted
//! only when the resolver says `can_join`.

use portal_protocol::{CheckInResponse, SessionId, SessionRecord};

use crate::error::{Result, SessionError};
use crate::patterns::RE_MEETING_LINK;
use crate::resolver::ResolvedSession;

/// Backend check-in endpoint.
pub trait CheckIn {
    fn check_in(&self, session_id: &SessionId) -> Result<CheckInResponse>;
}

/// Check-in that never contacts a backend; the record's own meeting link is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCheckIn;

impl CheckIn for OfflineCheckIn {
    fn check_in(&self, _session_id: &SessionId) -> Result<CheckInResponse> {
        Ok(CheckInResponse::default())
    }
}

/// A validated absolute http(s) meeting URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingUrl(String);

impl MeetingUrl {
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if RE_MEETING_LINK.is_match(value) {
            Ok(MeetingUrl(value.to_string()))
        } else {
            Err(SessionError::InvalidMeetingLink(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MeetingUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks in and returns the meeting URL to open.
///
/// Refuses without calling `checkin` unless `resolved.can_join`. A response
/// without a link falls back to the record's `meeting_link`.
pub fn join_session<C: CheckIn + ?Sized>(
    checkin: &C,
    session: &SessionRecord,
    resolved: &ResolvedSession,
) -> Result<MeetingUrl> {
    if !resolved.can_join {
        tracing::debug!(
            session_id = %session.id,
            bucket = %resolved.status_bucket,
            "Join refused; session outside its join window"
        );
        return Err(SessionError::NotJoinable {
            id: session.id.to_string(),
        });
    }

    let response = checkin.check_in(&session.id)?;
    let link = response
        .meeting_link
        .as_deref()
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .or_else(|| session.meeting_link())
        .ok_or_else(|| SessionError::CheckInFailed {
            id: session.id.to_string(),
            details: response
                .message
                .clone()
                .unwrap_or_else(|| "no meeting link available".to_string()),
        })?;

    let url = MeetingUrl::parse(link)?;
    tracing::info!(session_id = %session.id, "Checked in to session");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusBucket;
    use std::cell::Cell;

    struct RecordingCheckIn {
        calls: Cell<usize>,
        response: CheckInResponse,
    }

    impl RecordingCheckIn {
        fn returning(link: Option<&str>) -> Self {
            Self {
                calls: Cell::new(0),
                response: CheckInResponse {
                    meeting_link: link.map(str::to_string),
                    message: None,
                },
            }
        }
    }

    impl CheckIn for RecordingCheckIn {
        fn check_in(&self, _session_id: &SessionId) -> Result<CheckInResponse> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.response.clone())
        }
    }

    struct FailingCheckIn;

    impl CheckIn for FailingCheckIn {
        fn check_in(&self, session_id: &SessionId) -> Result<CheckInResponse> {
            Err(SessionError::CheckInFailed {
                id: session_id.to_string(),
                details: "503".to_string(),
            })
        }
    }

    fn resolved(can_join: bool) -> ResolvedSession {
        ResolvedSession {
            is_upcoming: true,
            can_join,
            status_bucket: StatusBucket::Upcoming,
            join_window: None,
        }
    }

    fn record_with_link(link: Option<&str>) -> SessionRecord {
        SessionRecord {
            meeting_link: link.map(str::to_string),
            ..SessionRecord::new("s-9")
        }
    }

    #[test]
    fn refuses_without_calling_backend() {
        let checkin = RecordingCheckIn::returning(Some("https://meet.example.com/x"));
        let err = join_session(&checkin, &record_with_link(None), &resolved(false)).unwrap_err();
        assert!(matches!(err, SessionError::NotJoinable { .. }));
        assert_eq!(checkin.calls.get(), 0);
    }

    #[test]
    fn prefers_check_in_response_link() {
        let checkin = RecordingCheckIn::returning(Some("https://meet.example.com/fresh"));
        let record = record_with_link(Some("https://meet.example.com/stale"));
        let url = join_session(&checkin, &record, &resolved(true)).unwrap();
        assert_eq!(url.as_str(), "https://meet.example.com/fresh");
        assert_eq!(checkin.calls.get(), 1);
    }

    #[test]
    fn falls_back_to_record_link() {
        let record = record_with_link(Some(" https://zoom.us/j/123 "));
        let url = join_session(&OfflineCheckIn, &record, &resolved(true)).unwrap();
        assert_eq!(url.to_string(), "https://zoom.us/j/123");
    }

    #[test]
    fn missing_link_is_check_in_failure() {
        let err =
            join_session(&OfflineCheckIn, &record_with_link(None), &resolved(true)).unwrap_err();
        assert!(matches!(err, SessionError::CheckInFailed { .. }));
    }

    #[test]
    fn rejects_non_http_links() {
        let record = record_with_link(Some("javascript:alert(1)"));
        let err = join_session(&OfflineCheckIn, &record, &resolved(true)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidMeetingLink(_)));
    }

    #[test]
    fn propagates_backend_errors() {
        let record = record_with_link(Some("https://meet.example.com/x"));
        let err = join_session(&FailingCheckIn, &record, &resolved(true)).unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}

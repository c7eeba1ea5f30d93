//! Wire types for the tutoring portal backend payloads.
//!
//! This crate is shared by the session library and its clients to prevent
//! schema drift. Records are parsed leniently: the backend is the authority on
//! session data, so optional fields that arrive missing, null or in an
//! unexpected shape become `None` instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Upper bound for a single list payload accepted from the backend.
pub const MAX_SESSIONS_PER_PAGE: usize = 1000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorInfo {}

// ─────────────────────────────────────────────────────────────────────────────
// Session records
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque session identifier. The backend sends either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawSessionId")]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSessionId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawSessionId> for SessionId {
    fn from(raw: RawSessionId) -> Self {
        match raw {
            RawSessionId::Text(value) => SessionId(value),
            RawSessionId::Signed(value) => SessionId(value.to_string()),
            RawSessionId::Unsigned(value) => SessionId(value.to_string()),
        }
    }
}

/// A session as returned by the session-list endpoints (admin calendar,
/// tutor sessions, student sessions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    #[serde(default)]
    pub session_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration_minutes: Option<i64>,
    /// Persisted lifecycle status. Interpreted by the resolver, not here.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "meeting_url")]
    pub meeting_link: Option<String>,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(id),
            session_date: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            status: None,
            meeting_link: None,
        }
    }

    pub fn validate(&self) -> Result<(), ErrorInfo> {
        if self.id.as_str().trim().is_empty() {
            return Err(ErrorInfo::new("invalid_session", "id is required"));
        }
        if let Some(link) = &self.meeting_link {
            if link.len() > 2048 {
                return Err(ErrorInfo::new(
                    "invalid_session",
                    "meeting_link must be 2048 characters or fewer",
                ));
            }
        }
        Ok(())
    }

    /// Meeting link, ignoring blank strings the backend sends for "no meeting".
    pub fn meeting_link(&self) -> Option<&str> {
        self.meeting_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integer_from_value))
}

/// Reads an integer from a JSON number or numeric string.
/// Fractional numbers are accepted only when they carry no fraction.
pub fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Paginated lists
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPage {
    pub data: Vec<SessionRecord>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default = "default_page")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn default_page() -> u32 {
    1
}

impl SessionPage {
    pub fn single(data: Vec<SessionRecord>) -> Self {
        let total = data.len() as u64;
        Self {
            data,
            current_page: 1,
            last_page: 1,
            per_page: None,
            total: Some(total),
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn validate(&self) -> Result<(), ErrorInfo> {
        if self.data.len() > MAX_SESSIONS_PER_PAGE {
            return Err(ErrorInfo::new(
                "invalid_payload",
                format!(
                    "page holds {} sessions; limit is {}",
                    self.data.len(),
                    MAX_SESSIONS_PER_PAGE
                ),
            ));
        }
        for (index, record) in self.data.iter().enumerate() {
            record.validate().map_err(|err| {
                ErrorInfo::new(&err.code, format!("sessions[{}]: {}", index, err.message))
            })?;
        }
        Ok(())
    }
}

/// Parses a paginated session envelope (`{"data": [...], "current_page": ..}`).
/// A `{"data": {...page...}}` wrapper is unwrapped once.
pub fn parse_session_page(payload: Value) -> Result<SessionPage, ErrorInfo> {
    let payload = match payload {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    let page: SessionPage = serde_json::from_value(payload).map_err(|err| {
        ErrorInfo::new(
            "invalid_payload",
            format!("session page is invalid JSON: {}", err),
        )
    })?;
    page.validate()?;
    Ok(page)
}

/// Parses either a bare array of sessions or any paginated envelope.
pub fn parse_session_list(payload: Value) -> Result<SessionPage, ErrorInfo> {
    match payload {
        Value::Array(_) => {
            let data: Vec<SessionRecord> = serde_json::from_value(payload).map_err(|err| {
                ErrorInfo::new(
                    "invalid_payload",
                    format!("session list is invalid JSON: {}", err),
                )
            })?;
            let page = SessionPage::single(data);
            page.validate()?;
            Ok(page)
        }
        Value::Object(_) => parse_session_page(payload),
        _ => Err(ErrorInfo::new(
            "invalid_payload",
            "session list must be an array or an object",
        )),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App settings and check-in
// ─────────────────────────────────────────────────────────────────────────────

/// App settings as served by the settings endpoint. Only the fields the
/// session views consume are typed; the raw value of `before_start_session`
/// is kept so callers can apply their own fallback rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub before_start_session: Option<Value>,
}

pub fn parse_settings(payload: Value) -> Result<AppSettings, ErrorInfo> {
    let payload = match payload {
        Value::Object(mut map) if matches!(map.get("data"), Some(Value::Object(_))) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        Value::Null => return Ok(AppSettings::default()),
        other => other,
    };

    serde_json::from_value(payload).map_err(|err| {
        ErrorInfo::new(
            "invalid_payload",
            format!("settings payload is invalid JSON: {}", err),
        )
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckInResponse {
    #[serde(default, alias = "meeting_url")]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

//! Error types for session-core operations.
//!
//! The resolver itself is infallible; these cover configuration loading,
//! payload parsing and the check-in path layered on top of it.

use std::path::PathBuf;

use portal_protocol::ErrorInfo;

/// All errors that can occur in session-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Payload Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid payload: {0}")]
    Protocol(#[from] ErrorInfo),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // ─────────────────────────────────────────────────────────────────────
    // Join Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session {id} is not joinable right now")]
    NotJoinable { id: String },

    #[error("Check-in failed for session {id}: {details}")]
    CheckInFailed { id: String, details: String },

    #[error("Invalid meeting link: {0}")]
    InvalidMeetingLink(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

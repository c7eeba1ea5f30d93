//! # session-core
//!
//! Shared session logic for the tutoring portal's session views (admin
//! calendar, tutor sessions, student sessions).
//!
//! ## Design Principles
//!
//! - **Pure resolution**: the resolver never reads a clock. Callers take one
//!   `now` per render from a [`Clock`] and pass it in.
//! - **Synchronous**: No async runtime dependency. Network collaborators
//!   (session lists, settings, check-in) sit behind traits or plain payloads.
//! - **Graceful degradation**: Missing or malformed fields degrade to
//!   `can_join = false` and a best-effort bucket, never an error.
//! - **Single conversion point**: every wall-clock to instant decision lives
//!   in [`time`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use session_core::{resolve_session_state, BucketGranularity, Clock, GracePeriod, SystemClock};
//!
//! let now = SystemClock.now().with_timezone(&chrono::Local);
//! let state = resolve_session_state(&record, &now, GracePeriod::default(), BucketGranularity::Coarse);
//! if state.can_join { /* enable the join button */ }
//! ```

pub mod checkin;
pub mod clock;
pub mod config;
pub mod error;
pub mod grace;
pub mod listing;
pub mod patterns;
pub mod resolver;
pub mod status;
pub mod time;

pub use checkin::{join_session, CheckIn, MeetingUrl, OfflineCheckIn};
pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use config::{default_config_path, load_config, SessionConfig};
pub use error::{Result, SessionError};
pub use grace::{GracePeriod, DEFAULT_GRACE_MINUTES};
pub use listing::{
    filter_range, group_by_date, next_joinable, resolve_all, BucketSummary, ResolvedEntry,
};
pub use portal_protocol::{SessionId, SessionPage, SessionRecord};
pub use resolver::{
    resolve_session_state, resolve_with_default_grace, resolve_with_options, JoinWindow,
    ResolveOptions, ResolvedSession, SessionTimes,
};
pub use status::{BucketGranularity, PersistedStatus, StatusBucket};
pub use time::NaiveTimeBasis;

//! Configuration loading for session resolution.
//!
//! Settings live in `~/.tutor-portal/sessions.toml`. A missing file yields
//! defaults; a malformed one is an error so typos don't silently change
//! join windows. Every field is optional.
//!
//! ```toml
//! grace_minutes = 10
//! granularity = "fine"          # or "coarse"
//! naive_time_basis = "utc"      # or "viewer"
//! utc_offset_minutes = 120      # viewer zone override; system zone otherwise
//! watch_interval_secs = 30
//! ```

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::grace::{GracePeriod, DEFAULT_GRACE_MINUTES};
use crate::resolver::ResolveOptions;
use crate::status::BucketGranularity;
use crate::time::NaiveTimeBasis;

const DEFAULT_CONFIG_RELATIVE_PATH: &str = ".tutor-portal/sessions.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub grace_minutes: u32,
    pub granularity: BucketGranularity,
    pub naive_time_basis: NaiveTimeBasis,
    pub utc_offset_minutes: Option<i32>,
    pub watch_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grace_minutes: DEFAULT_GRACE_MINUTES,
            granularity: BucketGranularity::default(),
            naive_time_basis: NaiveTimeBasis::default(),
            utc_offset_minutes: None,
            watch_interval_secs: 30,
        }
    }
}

impl SessionConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            grace: GracePeriod::from_minutes(self.grace_minutes),
            granularity: self.granularity,
            basis: self.naive_time_basis,
        }
    }

    /// Viewer zone override, if configured and in range.
    pub fn viewer_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.utc_offset_minutes.is_some() && self.viewer_offset().is_none() {
            return Err(SessionError::ConfigMalformed {
                path: path.to_path_buf(),
                details: "utc_offset_minutes must be within ±1439".to_string(),
            });
        }
        if self.watch_interval_secs == 0 {
            return Err(SessionError::ConfigMalformed {
                path: path.to_path_buf(),
                details: "watch_interval_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the path to the default configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_RELATIVE_PATH))
}

/// Loads configuration from `path`, or the default path when `None`.
pub fn load_config(path: Option<PathBuf>) -> Result<SessionConfig> {
    let Some(config_path) = path.or_else(default_config_path) else {
        tracing::debug!("Home directory not found; using default session config");
        return Ok(SessionConfig::default());
    };

    if !config_path.exists() {
        return Ok(SessionConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| SessionError::Io {
        context: format!("reading {}", config_path.display()),
        source,
    })?;

    let config: SessionConfig =
        toml::from_str(&content).map_err(|err| SessionError::ConfigMalformed {
            path: config_path.clone(),
            details: err.to_string(),
        })?;
    config.validate(&config_path)?;

    tracing::debug!(
        path = %config_path.display(),
        grace_minutes = config.grace_minutes,
        granularity = ?config.granularity,
        "Session config loaded"
    );
    Ok(config)
}

//! Grace period before a session's start during which joining is allowed.

use chrono::Duration;
use portal_protocol::{integer_from_value, AppSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Used when the settings endpoint provides no usable `before_start_session`.
pub const DEFAULT_GRACE_MINUTES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GracePeriod(u32);

impl Default for GracePeriod {
    fn default() -> Self {
        GracePeriod(DEFAULT_GRACE_MINUTES)
    }
}

impl GracePeriod {
    pub fn from_minutes(minutes: u32) -> Self {
        GracePeriod(minutes)
    }

    /// Applies the settings fallback rules: absent, null, non-numeric and
    /// negative values all mean the default.
    pub fn from_setting(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return GracePeriod::default();
        };

        match integer_from_value(value).and_then(|minutes| u32::try_from(minutes).ok()) {
            Some(minutes) => GracePeriod(minutes),
            None => {
                if !value.is_null() {
                    tracing::debug!(value = %value, "Unusable before_start_session; using default");
                }
                GracePeriod::default()
            }
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        GracePeriod::from_setting(settings.before_start_session.as_ref())
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_fifteen_minutes() {
        assert_eq!(GracePeriod::default().minutes(), 15);
        assert_eq!(GracePeriod::default().as_duration(), Duration::minutes(15));
    }

    #[test]
    fn absent_null_and_garbage_fall_back() {
        assert_eq!(GracePeriod::from_setting(None), GracePeriod::default());
        assert_eq!(GracePeriod::from_setting(Some(&Value::Null)), GracePeriod::default());
        assert_eq!(GracePeriod::from_setting(Some(&json!("soon"))), GracePeriod::default());
        assert_eq!(GracePeriod::from_setting(Some(&json!({}))), GracePeriod::default());
        assert_eq!(GracePeriod::from_setting(Some(&json!(7.5))), GracePeriod::default());
    }

    #[test]
    fn negative_falls_back() {
        assert_eq!(GracePeriod::from_setting(Some(&json!(-5))), GracePeriod::default());
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(GracePeriod::from_setting(Some(&json!(10))).minutes(), 10);
        assert_eq!(GracePeriod::from_setting(Some(&json!("30"))).minutes(), 30);
        assert_eq!(GracePeriod::from_setting(Some(&json!(0))).minutes(), 0);
    }

    #[test]
    fn reads_from_app_settings() {
        let settings = AppSettings {
            before_start_session: Some(json!(5)),
        };
        assert_eq!(GracePeriod::from_settings(&settings).minutes(), 5);
        assert_eq!(
            GracePeriod::from_settings(&AppSettings::default()),
            GracePeriod::default()
        );
    }
}

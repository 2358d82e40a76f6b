//! Configuration for ledger checking.

use chrono::Duration;
use chrono_tz::Tz;

use crate::domain::NETWORK_TZ;

/// Largest accepted gap or delay limit: one week, in seconds.
pub const MAX_LIMIT_SECS: i64 = 7 * 24 * 60 * 60;

/// Error returned when a limit is outside `0..=MAX_LIMIT_SECS`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name} must be between 0 and {max} seconds, got {value}", max = MAX_LIMIT_SECS)]
pub struct ConfigError {
    name: &'static str,
    value: i64,
}

fn check_limit(name: &'static str, value: i64) -> Result<i64, ConfigError> {
    if (0..=MAX_LIMIT_SECS).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError { name, value })
    }
}

/// Configuration parameters for decoding and validating a ledger.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Timezone the ledger's clock values are recorded in.
    pub timezone: Tz,

    /// Largest allowed gap between the same time at adjacent stops (seconds).
    /// Gaps equal to this are accepted.
    pub max_gap_secs: i64,

    /// Largest allowed difference between actual and expected time at a
    /// stop, in either direction (seconds).
    pub max_delay_secs: i64,
}

impl CheckConfig {
    /// Create a new configuration, rejecting limits outside
    /// `0..=MAX_LIMIT_SECS`.
    pub fn new(
        timezone: Tz,
        max_gap_secs: i64,
        max_delay_secs: i64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            timezone,
            max_gap_secs: check_limit("max gap", max_gap_secs)?,
            max_delay_secs: check_limit("max delay", max_delay_secs)?,
        })
    }

    /// Returns the maximum gap as a Duration, clamped to `0..=MAX_LIMIT_SECS`.
    pub fn max_gap(&self) -> Duration {
        limit_duration(self.max_gap_secs)
    }

    /// Returns the maximum delay as a Duration, clamped to `0..=MAX_LIMIT_SECS`.
    pub fn max_delay(&self) -> Duration {
        limit_duration(self.max_delay_secs)
    }
}

fn limit_duration(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(0, MAX_LIMIT_SECS))
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            timezone: NETWORK_TZ,
            max_gap_secs: 3600,   // 1 hour
            max_delay_secs: 5400, // 90 minutes
        }
    }
}

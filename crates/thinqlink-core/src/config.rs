// Engine configuration
//
// Only the refresh cadence is configurable. The monitoring keep-alive
// runs on a fixed 60-second period the backend expects; making it
// configurable invites silently-stale snapshots.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed period for re-arming server-side status monitoring.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// Per-device synchronization settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyncConfig {
    refresh_interval_minutes: u64,
}

impl SyncConfig {
    /// Create a config with the given refresh cadence in minutes.
    ///
    /// Zero is rejected: a zero-period timer would spin the vendor API.
    pub fn new(refresh_interval_minutes: u64) -> Result<Self, CoreError> {
        if refresh_interval_minutes == 0 {
            return Err(CoreError::InvalidConfig {
                message: "refresh interval must be at least 1 minute".into(),
            });
        }
        Ok(Self {
            refresh_interval_minutes,
        })
    }

    pub fn refresh_interval_minutes(&self) -> u64 {
        self.refresh_interval_minutes
    }

    /// The refresh timer period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes * 60)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_interval() {
        assert!(SyncConfig::new(0).is_err());
    }

    #[test]
    fn interval_converts_minutes_to_duration() {
        let cfg = SyncConfig::new(5).unwrap();
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(300));
    }
}

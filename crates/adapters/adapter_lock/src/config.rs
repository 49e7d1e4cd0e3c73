//! Lock integration configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the lock integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Interval between coordinator refreshes, in seconds.
    pub poll_interval_secs: u16,
    /// Manufacturer recorded on every registered lock device.
    pub manufacturer: String,
}

impl LockConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_interval_secs))
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            manufacturer: "Schlage".to_string(),
        }
    }
}

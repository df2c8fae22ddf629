use std::time::Duration;

use crate::constants::{
    DEFAULT_FINISHED_TTL_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_REAP_INTERVAL_SECS,
};

/// Reaping policy for live sessions.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Sessions without a guess for this long are dropped.
    pub idle_timeout: Duration,
    /// Won sessions stay readable this long.
    pub finished_ttl: Duration,
    /// Reaper tick.
    pub reap_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            finished_ttl: Duration::from_secs(DEFAULT_FINISHED_TTL_SECS),
            reap_interval: Duration::from_secs(DEFAULT_REAP_INTERVAL_SECS),
        }
    }
}

//! Application Configuration
//!
//! Configuration for the Livestock application layer.

use std::time::Duration;

/// Livestock application configuration
#[derive(Debug, Clone)]
pub struct LivestockConfig {
    /// Rows returned by the recent-notifications widget
    pub recent_notifications_limit: i64,
    /// Lifetime of device SAS tokens (10 minutes)
    pub sas_token_ttl: Duration,
    /// History window when `?hours` is absent
    pub history_default_hours: u32,
    /// Upper bound for `?hours` (one week)
    pub history_max_hours: u32,
    /// Days covered by the daily-average chart, today included
    pub daily_average_days: u32,
}

impl Default for LivestockConfig {
    fn default() -> Self {
        Self {
            recent_notifications_limit: 4,
            sas_token_ttl: Duration::from_secs(600),
            history_default_hours: 24,
            history_max_hours: 168,
            daily_average_days: 7,
        }
    }
}

impl LivestockConfig {
    /// Development config. Device tokens last an hour so simulators can run
    /// longer without refreshing.
    pub fn development() -> Self {
        Self {
            sas_token_ttl: Duration::from_secs(3600),
            ..Self::default()
        }
    }
}

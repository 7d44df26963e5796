//! Domain Value Objects

use chrono::{DateTime, Utc};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{LivestockError, LivestockResult};

// ============================================================================
// Health status
// ============================================================================

/// The three status labels the dashboard counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
    Critical,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [
        HealthStatus::Healthy,
        HealthStatus::NeedsAttention,
        HealthStatus::Critical,
    ];

    /// Label stored in `livestock.status`
    pub const fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::NeedsAttention => "Needs Attention",
            HealthStatus::Critical => "Critical",
        }
    }

    /// Case-insensitive; `needs_attention` and `needs-attention` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == normalized)
    }

    /// Validate a client-supplied status and return the stored label.
    pub fn canonicalize(raw: &str) -> LivestockResult<String> {
        Self::parse(raw)
            .map(|status| status.as_str().to_string())
            .ok_or_else(|| {
                LivestockError::Validation(
                    "Status must be one of: Healthy, Needs Attention, Critical".to_string(),
                )
            })
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Sensor reading input
// ============================================================================

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 25.0..=45.0;
pub const HEART_RATE_RANGE: RangeInclusive<i32> = 1..=400;
pub const SP02_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub const RESPIRATORY_RATE_RANGE: RangeInclusive<f32> = 1.0..=200.0;

/// A validated reading ready to append to the time series.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub temperature: f32,
    pub heart_rate: i32,
    pub sp02: Option<f32>,
    pub respiratory_rate: Option<f32>,
    pub motion_level: Option<f32>,
    pub timestamp: DateTime<Utc>,
}

impl NewReading {
    pub fn new(
        temperature: f32,
        heart_rate: i32,
        sp02: Option<f32>,
        respiratory_rate: Option<f32>,
        motion_level: Option<f32>,
        timestamp: DateTime<Utc>,
    ) -> LivestockResult<Self> {
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(out_of_range("Temperature", "25 and 45 °C"));
        }
        if !HEART_RATE_RANGE.contains(&heart_rate) {
            return Err(out_of_range("Heart rate", "1 and 400 bpm"));
        }
        if sp02.is_some_and(|v| !SP02_RANGE.contains(&v)) {
            return Err(out_of_range("SpO2", "0 and 100 %"));
        }
        if respiratory_rate.is_some_and(|v| !RESPIRATORY_RATE_RANGE.contains(&v)) {
            return Err(out_of_range("Respiratory rate", "1 and 200 breaths/min"));
        }
        if motion_level.is_some_and(|v| v.is_nan() || v < 0.0) {
            return Err(LivestockError::Validation(
                "Motion level cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            temperature,
            heart_rate,
            sp02,
            respiratory_rate,
            motion_level,
            timestamp,
        })
    }
}

fn out_of_range(field: &str, bounds: &str) -> LivestockError {
    LivestockError::Validation(format!("{field} must be between {bounds}"))
}

// ============================================================================
// History window
// ============================================================================

/// Number of hours to look back, bounded by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow(u32);

impl HistoryWindow {
    /// `None` yields the default. Values above the maximum are clamped; zero
    /// is rejected.
    pub fn new(requested: Option<u32>, default_hours: u32, max_hours: u32) -> LivestockResult<Self> {
        match requested {
            Some(0) => Err(LivestockError::Validation(format!(
                "hours must be between 1 and {max_hours}"
            ))),
            Some(hours) => Ok(Self(hours.min(max_hours))),
            None => Ok(Self(default_hours.min(max_hours))),
        }
    }

    pub fn hours(&self) -> u32 {
        self.0
    }

    /// Start of the window relative to `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::hours(i64::from(self.0))
    }
}

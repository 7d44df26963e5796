//! Domain Entities
//!
//! Rows of the monitoring store and the joined read models the dashboard
//! consumes.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{FarmId, LivestockId, NotificationId, ReadingId, UserId};

// ============================================================================
// Farms
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Farm {
    pub id: FarmId,
    pub user_id: UserId,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub farm_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFarm {
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub farm_type: Option<String>,
}

// ============================================================================
// Livestock
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Livestock {
    pub id: LivestockId,
    /// `None` once the farm has been deleted
    pub farm_id: Option<FarmId>,
    pub user_id: UserId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub status: Option<String>,
    /// cm
    pub height: Option<f32>,
    /// kg
    pub weight: Option<f32>,
    pub body_condition_score: Option<i32>,
    pub notes: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLivestock {
    pub farm_id: FarmId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub status: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub body_condition_score: Option<i32>,
    pub notes: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Sensor readings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub id: ReadingId,
    pub livestock_id: LivestockId,
    /// °C
    pub temperature: Option<f32>,
    /// bpm
    pub heart_rate: Option<i32>,
    /// %
    pub sp02: Option<f32>,
    /// breaths per minute
    pub respiratory_rate: Option<f32>,
    pub motion_level: Option<f32>,
    pub timestamp: DateTime<Utc>,
}

/// One day of readings averaged across all of a user's animals.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverage {
    pub day: NaiveDate,
    pub avg_temperature: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub avg_sp02: Option<f64>,
    pub avg_respiratory_rate: Option<f64>,
    pub avg_motion_level: Option<f64>,
    pub readings: i64,
}

/// One clock hour of readings for a single animal.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyAverage {
    pub hour: DateTime<Utc>,
    pub avg_temperature: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub avg_sp02: Option<f64>,
    pub avg_respiratory_rate: Option<f64>,
    pub avg_motion_level: Option<f64>,
    pub readings: i64,
}

/// Most recent reading of one animal, with enough of the animal to label it.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub livestock_id: LivestockId,
    pub name: String,
    pub species: String,
    pub reading: SensorReading,
}

// ============================================================================
// Anomalies
// ============================================================================

/// Per-animal singleton. Seeded empty when the animal is created.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomaly {
    pub livestock_id: LivestockId,
    pub anomaly_type: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub detected_at: Option<DateTime<Utc>>,
    pub resolved: Option<bool>,
}

impl Anomaly {
    /// The placeholder row written alongside a new animal.
    pub fn empty(livestock_id: LivestockId) -> Self {
        Self {
            livestock_id,
            anomaly_type: None,
            severity: None,
            notes: None,
            detected_at: None,
            resolved: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnomalyReport {
    pub anomaly_type: String,
    pub severity: String,
    pub notes: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub resolved: bool,
}

/// An animal with its latest reading and anomaly row.
#[derive(Debug, Clone, PartialEq)]
pub struct LivestockDetail {
    pub livestock: Livestock,
    pub latest_reading: Option<SensorReading>,
    pub anomaly: Option<Anomaly>,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub livestock_id: LivestockId,
    pub message: Option<String>,
    pub notification_type: Option<String>,
    pub read: bool,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: UserId,
    pub livestock_id: LivestockId,
    pub message: String,
    pub notification_type: String,
}

/// Notification labelled with the animal it is about.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentNotification {
    pub notification: Notification,
    pub livestock_name: String,
    pub livestock_species: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDetail {
    pub notification: Notification,
    pub livestock: Livestock,
    pub latest_reading: Option<SensorReading>,
}

// ============================================================================
// Devices
// ============================================================================

/// Collar or tag bound to an animal.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub livestock_id: LivestockId,
    pub device_id: i32,
    pub last_update: Option<DateTime<Utc>>,
}

// ============================================================================
// Dashboard counts
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub healthy: i64,
    pub needs_attention: i64,
    pub critical: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCount {
    pub species: String,
    pub total: i64,
}

//! API DTOs (Data Transfer Objects)
//!
//! Request and response shapes for the livestock routes. All keys are
//! camelCase; every success body is wrapped in an [`Envelope`].

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{FarmId, LivestockId, NotificationId, ReadingId, UserId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::{
    Anomaly, DailyAverage, Device, Farm, HourlyAverage, LatestReading, Livestock,
    LivestockDetail, Notification, NotificationDetail, RecentNotification, SensorReading,
    SpeciesCount, StatusCounts,
};

/// `{ "message": ..., "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self { message, data }
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /farms` and `PUT /farms/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub farm_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLivestockRequest {
    #[serde(default)]
    pub farm_id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub body_condition_score: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Partial update. `null` clears the nullable numeric fields, `notes` and
/// `recordedAt`; an absent key keeps them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLivestockRequest {
    #[serde(default)]
    pub farm_id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub height: Option<Option<f32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub weight: Option<Option<f32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub body_condition_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub recorded_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReadingRequest {
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub heart_rate: Option<i32>,
    #[serde(default)]
    pub sp02: Option<f32>,
    #[serde(default)]
    pub respiratory_rate: Option<f32>,
    #[serde(default)]
    pub motion_level: Option<f32>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnomalyRequest {
    #[serde(default, rename = "type")]
    pub anomaly_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub detected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindDeviceRequest {
    #[serde(default)]
    pub device_id: Option<i32>,
}

/// IoT hub device ids are strings, but collars registered by number are sent
/// as JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeviceIdentifier {
    Number(i64),
    Text(String),
}

impl DeviceIdentifier {
    pub fn into_string(self) -> String {
        match self {
            DeviceIdentifier::Number(n) => n.to_string(),
            DeviceIdentifier::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SasTokenRequest {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub device_id: Option<DeviceIdentifier>,
    #[serde(default)]
    pub primary_key: Option<String>,
}

/// `?hours=N`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WindowQuery {
    pub hours: Option<u32>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmResponse {
    pub id: FarmId,
    pub user_id: UserId,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub farm_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Farm> for FarmResponse {
    fn from(farm: Farm) -> Self {
        Self {
            id: farm.id,
            user_id: farm.user_id,
            name: farm.name,
            location: farm.location,
            address: farm.address,
            farm_type: farm.farm_type,
            created_at: farm.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockResponse {
    pub id: LivestockId,
    pub farm_id: Option<FarmId>,
    pub user_id: UserId,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Livestock> for LivestockResponse {
    fn from(l: Livestock) -> Self {
        Self {
            id: l.id,
            farm_id: l.farm_id,
            user_id: l.user_id,
            name: l.name,
            species: l.species,
            breed: l.breed,
            gender: l.gender,
            birth_date: l.birth_date,
            photo_url: l.photo_url,
            status: l.status,
            height: l.height,
            weight: l.weight,
            body_condition_score: l.body_condition_score,
            notes: l.notes,
            recorded_at: l.recorded_at,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingResponse {
    pub id: ReadingId,
    pub livestock_id: LivestockId,
    pub temperature: Option<f32>,
    pub heart_rate: Option<i32>,
    pub sp02: Option<f32>,
    pub respiratory_rate: Option<f32>,
    pub motion_level: Option<f32>,
    pub timestamp: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingResponse {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            livestock_id: r.livestock_id,
            temperature: r.temperature,
            heart_rate: r.heart_rate,
            sp02: r.sp02,
            respiratory_rate: r.respiratory_rate,
            motion_level: r.motion_level,
            timestamp: r.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyResponse {
    pub livestock_id: LivestockId,
    #[serde(rename = "type")]
    pub anomaly_type: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub detected_at: Option<DateTime<Utc>>,
    pub resolved: Option<bool>,
}

impl From<Anomaly> for AnomalyResponse {
    fn from(a: Anomaly) -> Self {
        Self {
            livestock_id: a.livestock_id,
            anomaly_type: a.anomaly_type,
            severity: a.severity,
            notes: a.notes,
            detected_at: a.detected_at,
            resolved: a.resolved,
        }
    }
}

/// An animal's columns with `latestReading` and `anomaly` alongside.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockDetailResponse {
    #[serde(flatten)]
    pub livestock: LivestockResponse,
    pub latest_reading: Option<SensorReadingResponse>,
    pub anomaly: Option<AnomalyResponse>,
}

impl From<LivestockDetail> for LivestockDetailResponse {
    fn from(d: LivestockDetail) -> Self {
        Self {
            livestock: d.livestock.into(),
            latest_reading: d.latest_reading.map(Into::into),
            anomaly: d.anomaly.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsResponse {
    pub total: i64,
    pub healthy: i64,
    pub needs_attention: i64,
    pub critical: i64,
}

impl From<StatusCounts> for StatusCountsResponse {
    fn from(c: StatusCounts) -> Self {
        Self {
            total: c.total,
            healthy: c.healthy,
            needs_attention: c.needs_attention,
            critical: c.critical,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesCountResponse {
    pub species: String,
    pub total: i64,
}

impl From<SpeciesCount> for SpeciesCountResponse {
    fn from(c: SpeciesCount) -> Self {
        Self {
            species: c.species,
            total: c.total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverageResponse {
    pub day: NaiveDate,
    pub avg_temperature: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub avg_sp02: Option<f64>,
    pub avg_respiratory_rate: Option<f64>,
    pub avg_motion_level: Option<f64>,
    pub readings: i64,
}

impl From<DailyAverage> for DailyAverageResponse {
    fn from(a: DailyAverage) -> Self {
        Self {
            day: a.day,
            avg_temperature: a.avg_temperature,
            avg_heart_rate: a.avg_heart_rate,
            avg_sp02: a.avg_sp02,
            avg_respiratory_rate: a.avg_respiratory_rate,
            avg_motion_level: a.avg_motion_level,
            readings: a.readings,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyAverageResponse {
    pub hour: DateTime<Utc>,
    pub avg_temperature: Option<f64>,
    pub avg_heart_rate: Option<f64>,
    pub avg_sp02: Option<f64>,
    pub avg_respiratory_rate: Option<f64>,
    pub avg_motion_level: Option<f64>,
    pub readings: i64,
}

impl From<HourlyAverage> for HourlyAverageResponse {
    fn from(a: HourlyAverage) -> Self {
        Self {
            hour: a.hour,
            avg_temperature: a.avg_temperature,
            avg_heart_rate: a.avg_heart_rate,
            avg_sp02: a.avg_sp02,
            avg_respiratory_rate: a.avg_respiratory_rate,
            avg_motion_level: a.avg_motion_level,
            readings: a.readings,
        }
    }
}

/// Reading columns plus the animal's `name` and `species`.
#[derive(Debug, Clone, Serialize)]
pub struct LatestReadingResponse {
    pub name: String,
    pub species: String,
    #[serde(flatten)]
    pub reading: SensorReadingResponse,
}

impl From<LatestReading> for LatestReadingResponse {
    fn from(l: LatestReading) -> Self {
        Self {
            name: l.name,
            species: l.species,
            reading: l.reading.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: NotificationId,
    pub user_id: UserId,
    pub livestock_id: LivestockId,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub read: bool,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            livestock_id: n.livestock_id,
            message: n.message,
            notification_type: n.notification_type,
            read: n.read,
            sent_at: n.sent_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentNotificationResponse {
    #[serde(flatten)]
    pub notification: NotificationResponse,
    pub livestock_name: String,
    pub livestock_species: String,
}

impl From<RecentNotification> for RecentNotificationResponse {
    fn from(r: RecentNotification) -> Self {
        Self {
            notification: r.notification.into(),
            livestock_name: r.livestock_name,
            livestock_species: r.livestock_species,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDetailResponse {
    #[serde(flatten)]
    pub notification: NotificationResponse,
    pub livestock: LivestockResponse,
    pub latest_reading: Option<SensorReadingResponse>,
}

impl From<NotificationDetail> for NotificationDetailResponse {
    fn from(d: NotificationDetail) -> Self {
        Self {
            notification: d.notification.into(),
            livestock: d.livestock.into(),
            latest_reading: d.latest_reading.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub livestock_id: LivestockId,
    pub device_id: i32,
    pub last_update: Option<DateTime<Utc>>,
}

impl From<Device> for DeviceResponse {
    fn from(d: Device) -> Self {
        Self {
            livestock_id: d.livestock_id,
            device_id: d.device_id,
            last_update: d.last_update,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SasTokenResponse {
    pub sas_token: String,
}

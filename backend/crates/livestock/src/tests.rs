//! Use case and router tests for the livestock crate against an in-memory
//! store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use kernel::id::{FarmId, LivestockId, NotificationId, ReadingId, UserId};
use kernel::session::CurrentUser;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::anomalies::ANOMALY_NOTIFICATION_TYPE;
use crate::application::config::LivestockConfig;
use crate::application::{
    AnomalyUseCases, DeviceUseCases, FarmUseCases, HerdUseCases, NotificationUseCases,
    RecordReadingInput, ReportAnomalyInput, SensorDataUseCases,
};
use crate::domain::entities::{
    Anomaly, AnomalyReport, DailyAverage, Device, Farm, HourlyAverage, LatestReading, Livestock,
    LivestockDetail, NewFarm, NewLivestock, NewNotification, Notification, NotificationDetail,
    RecentNotification, SensorReading, SpeciesCount, StatusCounts,
};
use crate::domain::patch::LivestockPatch;
use crate::domain::repository::{
    AnomalyRepository, DeviceRepository, FarmRepository, LivestockRepository,
    NotificationRepository, SensorDataRepository,
};
use crate::domain::value_objects::{HealthStatus, NewReading};
use crate::error::{LivestockError, LivestockResult};
use crate::presentation::router::livestock_router_generic;

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemState {
    next_id: i32,
    farms: Vec<Farm>,
    livestock: Vec<Livestock>,
    readings: Vec<SensorReading>,
    anomalies: Vec<Anomaly>,
    notifications: Vec<Notification>,
    devices: Vec<Device>,
}

impl MemState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn owns(&self, livestock_id: LivestockId, user_id: UserId) -> bool {
        self.livestock
            .iter()
            .any(|l| l.id == livestock_id && l.user_id == user_id)
    }

    fn latest_reading(&self, livestock_id: LivestockId) -> Option<SensorReading> {
        self.readings
            .iter()
            .filter(|r| r.livestock_id == livestock_id)
            .max_by_key(|r| (r.timestamp, r.id))
            .cloned()
    }
}

#[derive(Clone, Default)]
struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap()
    }

    /// Insert a reading without going through validation.
    fn push_reading(&self, livestock_id: LivestockId, temperature: f32, at: DateTime<Utc>) {
        let mut state = self.state();
        let id = state.next_id();
        state.readings.push(SensorReading {
            id: ReadingId::new(id),
            livestock_id,
            temperature: Some(temperature),
            heart_rate: Some(70),
            sp02: None,
            respiratory_rate: None,
            motion_level: None,
            timestamp: at,
        });
    }

    fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }
}

fn average<I>(values: I) -> Option<f64>
where
    I: Iterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

struct Bucket {
    avg_temperature: Option<f64>,
    avg_heart_rate: Option<f64>,
    avg_sp02: Option<f64>,
    avg_respiratory_rate: Option<f64>,
    avg_motion_level: Option<f64>,
    readings: i64,
}

fn bucket(readings: &[&SensorReading]) -> Bucket {
    Bucket {
        avg_temperature: average(readings.iter().map(|r| r.temperature.map(f64::from))),
        avg_heart_rate: average(readings.iter().map(|r| r.heart_rate.map(f64::from))),
        avg_sp02: average(readings.iter().map(|r| r.sp02.map(f64::from))),
        avg_respiratory_rate: average(readings.iter().map(|r| r.respiratory_rate.map(f64::from))),
        avg_motion_level: average(readings.iter().map(|r| r.motion_level.map(f64::from))),
        readings: readings.len() as i64,
    }
}

impl FarmRepository for MemStore {
    async fn create_farm(&self, user_id: UserId, farm: &NewFarm) -> LivestockResult<Farm> {
        let mut state = self.state();
        let created = Farm {
            id: FarmId::new(state.next_id()),
            user_id,
            name: farm.name.clone(),
            location: farm.location.clone(),
            address: farm.address.clone(),
            farm_type: farm.farm_type.clone(),
            created_at: Utc::now(),
        };
        state.farms.push(created.clone());
        Ok(created)
    }

    async fn list_farms(&self, user_id: UserId) -> LivestockResult<Vec<Farm>> {
        Ok(self
            .state()
            .farms
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_farm(&self, id: FarmId, user_id: UserId) -> LivestockResult<Option<Farm>> {
        Ok(self
            .state()
            .farms
            .iter()
            .find(|f| f.id == id && f.user_id == user_id)
            .cloned())
    }

    async fn update_farm(&self, farm: &Farm) -> LivestockResult<Farm> {
        let mut state = self.state();
        let slot = state
            .farms
            .iter_mut()
            .find(|f| f.id == farm.id)
            .ok_or(LivestockError::FarmNotFound)?;
        *slot = farm.clone();
        Ok(farm.clone())
    }

    async fn delete_farm(&self, id: FarmId) -> LivestockResult<()> {
        let mut state = self.state();
        state.farms.retain(|f| f.id != id);
        for animal in state.livestock.iter_mut().filter(|l| l.farm_id == Some(id)) {
            animal.farm_id = None;
        }
        Ok(())
    }
}

impl LivestockRepository for MemStore {
    async fn create_livestock(
        &self,
        user_id: UserId,
        livestock: &NewLivestock,
    ) -> LivestockResult<Livestock> {
        let mut state = self.state();
        let now = Utc::now();
        let created = Livestock {
            id: LivestockId::new(state.next_id()),
            farm_id: Some(livestock.farm_id),
            user_id,
            name: livestock.name.clone(),
            species: livestock.species.clone(),
            breed: livestock.breed.clone(),
            gender: livestock.gender.clone(),
            birth_date: livestock.birth_date,
            photo_url: livestock.photo_url.clone(),
            status: livestock.status.clone(),
            height: livestock.height,
            weight: livestock.weight,
            body_condition_score: livestock.body_condition_score,
            notes: livestock.notes.clone(),
            recorded_at: livestock.recorded_at,
            created_at: now,
            updated_at: now,
        };
        state.anomalies.push(Anomaly::empty(created.id));
        state.livestock.push(created.clone());
        Ok(created)
    }

    async fn list_livestock(&self, user_id: UserId) -> LivestockResult<Vec<Livestock>> {
        Ok(self
            .state()
            .livestock
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_livestock(
        &self,
        id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Option<Livestock>> {
        Ok(self
            .state()
            .livestock
            .iter()
            .find(|l| l.id == id && l.user_id == user_id)
            .cloned())
    }

    async fn update_livestock(&self, livestock: &Livestock) -> LivestockResult<Livestock> {
        let mut state = self.state();
        let slot = state
            .livestock
            .iter_mut()
            .find(|l| l.id == livestock.id)
            .ok_or(LivestockError::LivestockNotFound)?;
        *slot = Livestock {
            updated_at: Utc::now(),
            ..livestock.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_livestock(&self, id: LivestockId) -> LivestockResult<()> {
        let mut state = self.state();
        state.livestock.retain(|l| l.id != id);
        state.readings.retain(|r| r.livestock_id != id);
        state.anomalies.retain(|a| a.livestock_id != id);
        state.devices.retain(|d| d.livestock_id != id);
        state.notifications.retain(|n| n.livestock_id != id);
        Ok(())
    }

    async fn status_counts(&self, user_id: UserId) -> LivestockResult<StatusCounts> {
        let state = self.state();
        let owned: Vec<&Livestock> = state
            .livestock
            .iter()
            .filter(|l| l.user_id == user_id)
            .collect();
        let count = |status: HealthStatus| {
            owned
                .iter()
                .filter(|l| l.status.as_deref() == Some(status.as_str()))
                .count() as i64
        };

        Ok(StatusCounts {
            total: owned.len() as i64,
            healthy: count(HealthStatus::Healthy),
            needs_attention: count(HealthStatus::NeedsAttention),
            critical: count(HealthStatus::Critical),
        })
    }

    async fn species_counts(&self, user_id: UserId) -> LivestockResult<Vec<SpeciesCount>> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for animal in self.state().livestock.iter().filter(|l| l.user_id == user_id) {
            *totals.entry(animal.species.clone()).or_default() += 1;
        }

        let mut counts: Vec<SpeciesCount> = totals
            .into_iter()
            .map(|(species, total)| SpeciesCount { species, total })
            .collect();
        counts.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.species.cmp(&b.species)));
        Ok(counts)
    }

    async fn livestock_overview(&self, user_id: UserId) -> LivestockResult<Vec<LivestockDetail>> {
        let state = self.state();
        Ok(state
            .livestock
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| LivestockDetail {
                livestock: l.clone(),
                latest_reading: state.latest_reading(l.id),
                anomaly: state.anomalies.iter().find(|a| a.livestock_id == l.id).cloned(),
            })
            .collect())
    }
}

impl SensorDataRepository for MemStore {
    async fn insert_reading(
        &self,
        livestock_id: LivestockId,
        reading: &NewReading,
    ) -> LivestockResult<SensorReading> {
        let mut state = self.state();
        let stored = SensorReading {
            id: ReadingId::new(state.next_id()),
            livestock_id,
            temperature: Some(reading.temperature),
            heart_rate: Some(reading.heart_rate),
            sp02: reading.sp02,
            respiratory_rate: reading.respiratory_rate,
            motion_level: reading.motion_level,
            timestamp: reading.timestamp,
        };
        state.readings.push(stored.clone());
        Ok(stored)
    }

    async fn latest_reading(
        &self,
        livestock_id: LivestockId,
    ) -> LivestockResult<Option<SensorReading>> {
        Ok(self.state().latest_reading(livestock_id))
    }

    async fn readings_since(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<SensorReading>> {
        let mut readings: Vec<SensorReading> = self
            .state()
            .readings
            .iter()
            .filter(|r| r.livestock_id == livestock_id && r.timestamp >= since)
            .cloned()
            .collect();
        readings.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        Ok(readings)
    }

    async fn hourly_averages(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<HourlyAverage>> {
        let state = self.state();
        let mut hours: BTreeMap<i64, Vec<&SensorReading>> = BTreeMap::new();
        for reading in state
            .readings
            .iter()
            .filter(|r| r.livestock_id == livestock_id && r.timestamp >= since)
        {
            let ts = reading.timestamp.timestamp();
            hours.entry(ts - ts.rem_euclid(3600)).or_default().push(reading);
        }

        Ok(hours
            .into_iter()
            .filter_map(|(hour, readings)| {
                let b = bucket(&readings);
                Some(HourlyAverage {
                    hour: DateTime::from_timestamp(hour, 0)?,
                    avg_temperature: b.avg_temperature,
                    avg_heart_rate: b.avg_heart_rate,
                    avg_sp02: b.avg_sp02,
                    avg_respiratory_rate: b.avg_respiratory_rate,
                    avg_motion_level: b.avg_motion_level,
                    readings: b.readings,
                })
            })
            .collect())
    }

    async fn daily_averages(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<DailyAverage>> {
        let state = self.state();
        let mut days: BTreeMap<NaiveDate, Vec<&SensorReading>> = BTreeMap::new();
        for reading in state
            .readings
            .iter()
            .filter(|r| r.timestamp >= since && state.owns(r.livestock_id, user_id))
        {
            days.entry(reading.timestamp.date_naive())
                .or_default()
                .push(reading);
        }

        Ok(days
            .into_iter()
            .map(|(day, readings)| {
                let b = bucket(&readings);
                DailyAverage {
                    day,
                    avg_temperature: b.avg_temperature,
                    avg_heart_rate: b.avg_heart_rate,
                    avg_sp02: b.avg_sp02,
                    avg_respiratory_rate: b.avg_respiratory_rate,
                    avg_motion_level: b.avg_motion_level,
                    readings: b.readings,
                }
            })
            .collect())
    }

    async fn latest_readings(&self, user_id: UserId) -> LivestockResult<Vec<LatestReading>> {
        let state = self.state();
        Ok(state
            .livestock
            .iter()
            .filter(|l| l.user_id == user_id)
            .filter_map(|l| {
                state.latest_reading(l.id).map(|reading| LatestReading {
                    livestock_id: l.id,
                    name: l.name.clone(),
                    species: l.species.clone(),
                    reading,
                })
            })
            .collect())
    }
}

impl AnomalyRepository for MemStore {
    async fn find_anomaly(&self, livestock_id: LivestockId) -> LivestockResult<Option<Anomaly>> {
        Ok(self
            .state()
            .anomalies
            .iter()
            .find(|a| a.livestock_id == livestock_id)
            .cloned())
    }

    async fn upsert_anomaly(
        &self,
        livestock_id: LivestockId,
        report: &AnomalyReport,
        alert: Option<&NewNotification>,
    ) -> LivestockResult<Anomaly> {
        let mut state = self.state();
        let anomaly = Anomaly {
            livestock_id,
            anomaly_type: Some(report.anomaly_type.clone()),
            severity: Some(report.severity.clone()),
            notes: report.notes.clone(),
            detected_at: Some(report.detected_at),
            resolved: Some(report.resolved),
        };
        state.anomalies.retain(|a| a.livestock_id != livestock_id);
        state.anomalies.push(anomaly.clone());

        if let Some(alert) = alert {
            let id = state.next_id();
            state.notifications.push(Notification {
                id: NotificationId::new(id),
                user_id: alert.user_id,
                livestock_id: alert.livestock_id,
                message: Some(alert.message.clone()),
                notification_type: Some(alert.notification_type.clone()),
                read: false,
                sent_at: Some(Utc::now()),
            });
        }
        Ok(anomaly)
    }
}

impl NotificationRepository for MemStore {
    async fn recent_notifications(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> LivestockResult<Vec<RecentNotification>> {
        let state = self.state();
        let mut recent: Vec<RecentNotification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter_map(|n| {
                let animal = state.livestock.iter().find(|l| l.id == n.livestock_id)?;
                Some(RecentNotification {
                    notification: n.clone(),
                    livestock_name: animal.name.clone(),
                    livestock_species: animal.species.clone(),
                })
            })
            .collect();
        recent.sort_by(|a, b| {
            (b.notification.sent_at, b.notification.id).cmp(&(a.notification.sent_at, a.notification.id))
        });
        recent.truncate(usize::try_from(limit).unwrap_or_default());
        Ok(recent)
    }

    async fn notification_details(
        &self,
        user_id: UserId,
    ) -> LivestockResult<Vec<NotificationDetail>> {
        let state = self.state();
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .filter_map(|n| {
                let animal = state.livestock.iter().find(|l| l.id == n.livestock_id)?;
                Some(NotificationDetail {
                    notification: n.clone(),
                    livestock: animal.clone(),
                    latest_reading: state.latest_reading(animal.id),
                })
            })
            .collect())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> LivestockResult<Option<Notification>> {
        let mut state = self.state();
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|n| {
                n.read = true;
                n.clone()
            }))
    }
}

impl DeviceRepository for MemStore {
    async fn bind_device(
        &self,
        livestock_id: LivestockId,
        device_id: i32,
    ) -> LivestockResult<Device> {
        let mut state = self.state();
        let device = Device {
            livestock_id,
            device_id,
            last_update: Some(Utc::now()),
        };
        state
            .devices
            .retain(|d| !(d.livestock_id == livestock_id && d.device_id == device_id));
        state.devices.push(device.clone());
        Ok(device)
    }

    async fn list_devices(&self, livestock_id: LivestockId) -> LivestockResult<Vec<Device>> {
        let mut devices: Vec<Device> = self
            .state()
            .devices
            .iter()
            .filter(|d| d.livestock_id == livestock_id)
            .cloned()
            .collect();
        devices.sort_by_key(|d| d.device_id);
        Ok(devices)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const OWNER: UserId = UserId::new(1);
const STRANGER: UserId = UserId::new(2);

fn config() -> Arc<LivestockConfig> {
    Arc::new(LivestockConfig::default())
}

fn new_farm(name: &str) -> NewFarm {
    NewFarm {
        name: name.to_string(),
        location: Some("Bogor".to_string()),
        address: None,
        farm_type: Some("dairy".to_string()),
    }
}

fn new_cow(farm_id: FarmId, name: &str) -> NewLivestock {
    NewLivestock {
        farm_id,
        name: name.to_string(),
        species: "Cow".to_string(),
        breed: Some("Holstein".to_string()),
        gender: Some("female".to_string()),
        birth_date: NaiveDate::from_ymd_opt(2021, 4, 2),
        photo_url: None,
        status: Some("healthy".to_string()),
        height: Some(140.0),
        weight: Some(550.0),
        body_condition_score: Some(3),
        notes: None,
        recorded_at: None,
    }
}

/// Store with one farm and one cow belonging to [`OWNER`].
async fn seeded() -> (Arc<MemStore>, Farm, Livestock) {
    let store = Arc::new(MemStore::default());
    let farm = FarmUseCases::new(store.clone())
        .create(OWNER, new_farm("North Paddock"))
        .await
        .unwrap();
    let cow = HerdUseCases::new(store.clone())
        .create(OWNER, new_cow(farm.id, "Bessie"))
        .await
        .unwrap();
    (store, farm, cow)
}

fn reading(temperature: Option<f32>, heart_rate: Option<i32>) -> RecordReadingInput {
    RecordReadingInput {
        temperature,
        heart_rate,
        ..Default::default()
    }
}

fn anomaly_report(resolved: bool) -> ReportAnomalyInput {
    ReportAnomalyInput {
        anomaly_type: Some("fever".to_string()),
        severity: Some("high".to_string()),
        notes: Some("temperature spike".to_string()),
        detected_at: None,
        resolved: Some(resolved),
    }
}

// ============================================================================
// Use cases
// ============================================================================

#[tokio::test]
async fn test_create_livestock_seeds_anomaly_and_canonical_status() {
    let (store, _, cow) = seeded().await;

    assert_eq!(cow.status.as_deref(), Some("Healthy"));
    let anomaly = store.find_anomaly(cow.id).await.unwrap();
    assert_eq!(anomaly, Some(Anomaly::empty(cow.id)));
}

#[tokio::test]
async fn test_create_livestock_on_foreign_farm_is_forbidden() {
    let (store, farm, _) = seeded().await;

    let err = HerdUseCases::new(store.clone())
        .create(STRANGER, new_cow(farm.id, "Intruder"))
        .await
        .unwrap_err();
    assert!(matches!(err, LivestockError::FarmForbidden));
}

#[tokio::test]
async fn test_create_livestock_rejects_unknown_status() {
    let (store, farm, _) = seeded().await;
    let mut cow = new_cow(farm.id, "Daisy");
    cow.status = Some("sleepy".to_string());

    let err = HerdUseCases::new(store).create(OWNER, cow).await.unwrap_err();
    assert!(matches!(err, LivestockError::Validation(_)));
}

#[tokio::test]
async fn test_other_users_livestock_is_not_found() {
    let (store, _, cow) = seeded().await;
    let herd = HerdUseCases::new(store.clone());

    assert!(matches!(
        herd.get(cow.id, STRANGER).await,
        Err(LivestockError::LivestockNotFound)
    ));
    assert!(matches!(
        herd.delete(cow.id, STRANGER).await,
        Err(LivestockError::LivestockNotFound)
    ));
    assert!(herd.get(cow.id, OWNER).await.is_ok());
}

#[tokio::test]
async fn test_update_livestock_applies_patch() {
    let (store, _, cow) = seeded().await;

    let patch = LivestockPatch {
        name: Some(String::new()),
        status: Some("needs_attention".to_string()),
        weight: Some(None),
        notes: Some(Some("limping".to_string())),
        ..Default::default()
    };
    let updated = HerdUseCases::new(store)
        .update(cow.id, OWNER, patch)
        .await
        .unwrap();

    assert_eq!(updated.name, "Bessie");
    assert_eq!(updated.status.as_deref(), Some("Needs Attention"));
    assert_eq!(updated.weight, None);
    assert_eq!(updated.height, Some(140.0));
    assert_eq!(updated.notes.as_deref(), Some("limping"));
}

#[tokio::test]
async fn test_update_livestock_to_foreign_farm_is_forbidden() {
    let (store, _, cow) = seeded().await;
    let foreign = FarmUseCases::new(store.clone())
        .create(STRANGER, new_farm("Elsewhere"))
        .await
        .unwrap();

    let patch = LivestockPatch {
        farm_id: Some(foreign.id),
        ..Default::default()
    };
    let err = HerdUseCases::new(store)
        .update(cow.id, OWNER, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, LivestockError::FarmForbidden));
}

#[tokio::test]
async fn test_delete_farm_keeps_its_livestock() {
    let (store, farm, cow) = seeded().await;

    FarmUseCases::new(store.clone())
        .delete(farm.id, OWNER)
        .await
        .unwrap();

    let kept = HerdUseCases::new(store).get(cow.id, OWNER).await.unwrap();
    assert_eq!(kept.farm_id, None);
}

#[tokio::test]
async fn test_record_reading_validates_input() {
    let (store, _, cow) = seeded().await;
    let sensors = SensorDataUseCases::new(store.clone(), config());

    assert!(matches!(
        sensors.record(cow.id, OWNER, reading(Some(38.5), None)).await,
        Err(LivestockError::MissingFields(_))
    ));
    assert!(matches!(
        sensors.record(cow.id, OWNER, reading(Some(60.0), Some(70))).await,
        Err(LivestockError::Validation(_))
    ));
    assert!(matches!(
        sensors.record(cow.id, STRANGER, reading(Some(38.5), Some(70))).await,
        Err(LivestockError::LivestockNotFound)
    ));

    let stored = sensors
        .record(cow.id, OWNER, reading(Some(38.5), Some(70)))
        .await
        .unwrap();
    assert_eq!(sensors.latest(cow.id, OWNER).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_history_and_hourly_averages_respect_window() {
    let (store, _, cow) = seeded().await;
    let recent = Utc::now() - Duration::minutes(5);
    store.push_reading(cow.id, 38.0, recent);
    store.push_reading(cow.id, 39.0, recent);
    store.push_reading(cow.id, 40.0, Utc::now() - Duration::hours(30));

    let sensors = SensorDataUseCases::new(store.clone(), config());

    let history = sensors.history(cow.id, OWNER, None).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(sensors.history(cow.id, OWNER, Some(48)).await.unwrap().len(), 3);

    let hourly = sensors.hourly_averages(cow.id, OWNER, None).await.unwrap();
    assert_eq!(hourly.len(), 1);
    assert_eq!(hourly[0].readings, 2);
    assert_eq!(hourly[0].avg_temperature, Some(38.5));

    assert!(matches!(
        sensors.history(cow.id, OWNER, Some(0)).await,
        Err(LivestockError::Validation(_))
    ));
}

#[tokio::test]
async fn test_daily_averages_and_latest_readings_span_the_herd() {
    let (store, farm, bessie) = seeded().await;
    let daisy = HerdUseCases::new(store.clone())
        .create(OWNER, new_cow(farm.id, "Daisy"))
        .await
        .unwrap();
    let now = Utc::now();
    store.push_reading(bessie.id, 38.0, now);
    store.push_reading(daisy.id, 40.0, now);
    store.push_reading(daisy.id, 39.0, now - Duration::days(30));

    let sensors = SensorDataUseCases::new(store.clone(), config());

    let daily = sensors.daily_averages(OWNER).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].readings, 2);
    assert_eq!(daily[0].avg_temperature, Some(39.0));

    let latest = sensors.latest_per_livestock(OWNER).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest.iter().all(|l| l.reading.timestamp == now));
    assert!(sensors.latest_per_livestock(STRANGER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unresolved_anomaly_notifies_owner() {
    let (store, _, cow) = seeded().await;
    let anomalies = AnomalyUseCases::new(store.clone());

    let anomaly = anomalies
        .report(cow.id, OWNER, anomaly_report(false))
        .await
        .unwrap();
    assert_eq!(anomaly.resolved, Some(false));
    assert_eq!(anomaly.anomaly_type.as_deref(), Some("fever"));

    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, OWNER);
    assert_eq!(
        notifications[0].notification_type.as_deref(),
        Some(ANOMALY_NOTIFICATION_TYPE)
    );
    assert_eq!(
        notifications[0].message.as_deref(),
        Some("fever anomaly (high) detected on Bessie")
    );

    // Resolving overwrites the singleton and stays quiet.
    let resolved = anomalies
        .report(cow.id, OWNER, anomaly_report(true))
        .await
        .unwrap();
    assert_eq!(resolved.resolved, Some(true));
    assert_eq!(store.notifications().len(), 1);
    assert_eq!(anomalies.get(cow.id, OWNER).await.unwrap(), Some(resolved));
}

#[tokio::test]
async fn test_report_anomaly_requires_fields() {
    let (store, _, cow) = seeded().await;
    let input = ReportAnomalyInput {
        resolved: None,
        ..anomaly_report(false)
    };

    let err = AnomalyUseCases::new(store)
        .report(cow.id, OWNER, input)
        .await
        .unwrap_err();
    assert!(matches!(err, LivestockError::MissingFields(_)));
}

#[tokio::test]
async fn test_recent_notifications_are_limited_and_markable() {
    let (store, _, cow) = seeded().await;
    let anomalies = AnomalyUseCases::new(store.clone());
    for _ in 0..6 {
        anomalies
            .report(cow.id, OWNER, anomaly_report(false))
            .await
            .unwrap();
    }

    let notifications = NotificationUseCases::new(store.clone(), config());
    let recent = notifications.recent(OWNER).await.unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0].livestock_name, "Bessie");
    assert_eq!(notifications.details(OWNER).await.unwrap().len(), 6);

    let id = recent[0].notification.id;
    assert!(matches!(
        notifications.mark_read(id, STRANGER).await,
        Err(LivestockError::NotificationNotFound)
    ));
    assert!(notifications.mark_read(id, OWNER).await.unwrap().read);
}

#[tokio::test]
async fn test_bind_device_is_idempotent() {
    let (store, _, cow) = seeded().await;
    let devices = DeviceUseCases::new(store.clone(), config());

    devices.bind(cow.id, OWNER, Some(7)).await.unwrap();
    devices.bind(cow.id, OWNER, Some(7)).await.unwrap();
    devices.bind(cow.id, OWNER, Some(3)).await.unwrap();

    let bound: Vec<i32> = devices
        .list(cow.id, OWNER)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.device_id)
        .collect();
    assert_eq!(bound, vec![3, 7]);

    assert!(matches!(
        devices.bind(cow.id, OWNER, None).await,
        Err(LivestockError::MissingFields(_))
    ));
    assert!(matches!(
        devices.bind(cow.id, OWNER, Some(-1)).await,
        Err(LivestockError::Validation(_))
    ));
}

// ============================================================================
// Router
// ============================================================================

fn test_app(store: MemStore, caller: Option<UserId>) -> Router {
    let router = livestock_router_generic(store, LivestockConfig::default());
    match caller {
        Some(user_id) => router.layer(Extension(CurrentUser::new(user_id, "owner@example.com"))),
        None => router,
    }
}

async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let body = body.map_or_else(Body::empty, |body| {
        Body::from(serde_json::to_string(&body).unwrap())
    });

    let response = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

#[tokio::test]
async fn test_farm_and_livestock_routes() {
    let store = MemStore::default();
    let app = test_app(store.clone(), Some(OWNER));

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/farms",
        Some(json!({"name": "North Paddock", "type": "dairy"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Farm created successfully");
    assert_eq!(body["data"]["type"], "dairy");
    let farm_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/livestock",
        Some(json!({
            "farmId": farm_id,
            "name": "Bessie",
            "species": "Cow",
            "status": "Critical",
            "weight": 550.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["farmId"], farm_id);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &format!("/livestock/{id}"),
        Some(json!({"weight": null, "name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bessie");
    assert_eq!(body["data"]["weight"], Value::Null);

    let (status, body) =
        request_json(app.clone(), "GET", &format!("/livestock/{id}/detail"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bessie");
    assert_eq!(body["data"]["latestReading"], Value::Null);
    assert_eq!(body["data"]["anomaly"]["livestockId"], id);

    let (status, body) =
        request_json(app.clone(), "DELETE", &format!("/livestock/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, body) = request_json(app, "GET", &format!("/livestock/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Livestock not found or you do not have access");
}

#[tokio::test]
async fn test_create_livestock_requires_fields() {
    let (status, body) = request_json(
        test_app(MemStore::default(), Some(OWNER)),
        "POST",
        "/livestock",
        Some(json!({"name": "Bessie"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Farm ID, name, and species are required");
}

#[tokio::test]
async fn test_invalid_path_id() {
    let app = test_app(MemStore::default(), Some(OWNER));

    let (status, body) = request_json(app.clone(), "GET", "/livestock/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid livestock ID");

    let (status, body) = request_json(app, "GET", "/farms/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid farm ID");
}

#[tokio::test]
async fn test_requires_session() {
    let (status, body) = request_json(test_app(MemStore::default(), None), "GET", "/farms", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn test_user_scoped_routes() {
    let (store, _, cow) = seeded().await;
    store.push_reading(cow.id, 38.2, Utc::now());
    let app = test_app(store.as_ref().clone(), Some(OWNER));

    let (status, body) = request_json(app.clone(), "GET", "/livestock/1/status-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["healthy"], 1);
    assert_eq!(body["data"]["needsAttention"], 0);

    let (status, body) = request_json(app.clone(), "GET", "/livestock/1/latest-readings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Bessie");
    assert_eq!(body["data"][0]["livestockId"], cow.id.get());

    let (status, body) = request_json(app.clone(), "GET", "/livestock/1/sensor-anomalies", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!((body["data"][0]["latestReading"]["temperature"].as_f64().unwrap() - 38.2).abs() < 1e-4);

    let (status, _) = request_json(app, "GET", "/livestock/2/species-counts", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_empty_dashboard_returns_zeros() {
    let app = test_app(MemStore::default(), Some(STRANGER));

    let (status, body) = request_json(app.clone(), "GET", "/livestock/2/status-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"total": 0, "healthy": 0, "needsAttention": 0, "critical": 0})
    );

    let (status, body) = request_json(app, "GET", "/livestock/2/species-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_dashboard_counts_every_status_and_orders_species() {
    let (store, farm, _) = seeded().await;
    let herd = HerdUseCases::new(store.clone());
    for (name, status) in [("Dolly", "needs attention"), ("Shaun", "CRITICAL")] {
        herd.create(
            OWNER,
            NewLivestock {
                species: "Sheep".to_string(),
                status: Some(status.to_string()),
                ..new_cow(farm.id, name)
            },
        )
        .await
        .unwrap();
    }
    let app = test_app(store.as_ref().clone(), Some(OWNER));

    let (status, body) = request_json(app.clone(), "GET", "/livestock/1/status-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"total": 3, "healthy": 1, "needsAttention": 1, "critical": 1})
    );

    let (status, body) = request_json(app, "GET", "/livestock/1/species-counts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            {"species": "Sheep", "total": 2},
            {"species": "Cow", "total": 1}
        ])
    );
}

#[tokio::test]
async fn test_malformed_body_and_query_get_json_error() {
    let (store, _, cow) = seeded().await;
    let app = test_app(store.as_ref().clone(), Some(OWNER));

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &format!("/livestock/{}/sensor-data", cow.id),
        Some(json!({"temperature": 38.5, "heartRate": 72.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("heartRate"));
    assert_eq!(body["status"], 400);

    let (status, body) = request_json(
        app,
        "GET",
        &format!("/livestock/{}/sensor-data/history?hours=abc", cow.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(store.state().readings.is_empty());
}

#[tokio::test]
async fn test_sensor_data_routes() {
    let (store, _, cow) = seeded().await;
    let app = test_app(store.as_ref().clone(), Some(OWNER));
    let uri = format!("/livestock/{}/sensor-data", cow.id);

    let (status, body) = request_json(app.clone(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &uri,
        Some(json!({"temperature": 38.6, "heartRate": 72, "sp02": 97.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["heartRate"], 72);

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &uri,
        Some(json!({"temperature": 38.6, "heartRate": 900})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Heart rate must be between 1 and 400 bpm");

    let (status, body) = request_json(app.clone(), "GET", &format!("{uri}/history?hours=2"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = request_json(
        app,
        "GET",
        &format!("/livestock/{}/avg-metrics-hourly?hours=0", cow.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anomaly_and_notification_routes() {
    let (store, _, cow) = seeded().await;
    let app = test_app(store.as_ref().clone(), Some(OWNER));

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &format!("/livestock/{}/anomalies", cow.id),
        Some(json!({"type": "fever", "severity": "high", "resolved": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["type"], "fever");

    let (status, body) = request_json(app.clone(), "GET", "/livestock/1/recent-notifs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["livestockName"], "Bessie");
    assert_eq!(body["data"][0]["read"], false);
    let notification_id = body["data"][0]["id"].as_i64().unwrap();

    let (status, body) = request_json(
        app.clone(),
        "PUT",
        &format!("/notifications/{notification_id}/read"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["read"], true);

    let (status, body) = request_json(app, "GET", "/livestock/1/notif-detail", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["livestock"]["name"], "Bessie");
}

#[tokio::test]
async fn test_device_routes() {
    let (store, _, cow) = seeded().await;
    let app = test_app(store.as_ref().clone(), Some(OWNER));
    let uri = format!("/livestock/{}/devices", cow.id);

    let (status, body) = request_json(app.clone(), "POST", &uri, Some(json!({"deviceId": 12}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["deviceId"], 12);

    let (status, body) = request_json(app.clone(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/devices/sas-token",
        Some(json!({"hostname": "farm-hub.azure-devices.net", "deviceId": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: hostname, deviceId, primaryKey");

    let (status, body) = request_json(
        app,
        "POST",
        "/devices/sas-token",
        Some(json!({
            "hostname": "farm-hub.azure-devices.net",
            "deviceId": 12,
            "primaryKey": "c2VjcmV0LWtleQ=="
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["sasToken"].as_str().unwrap();
    assert!(token.starts_with(
        "SharedAccessSignature sr=farm-hub.azure-devices.net%2Fdevices%2F12&sig="
    ));
}

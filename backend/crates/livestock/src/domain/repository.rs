//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Lookups that take a `UserId` only return rows owned by that user.

use chrono::{DateTime, Utc};
use kernel::id::{FarmId, LivestockId, NotificationId, UserId};

use crate::domain::entities::{
    Anomaly, AnomalyReport, DailyAverage, Device, Farm, HourlyAverage, LatestReading, Livestock,
    LivestockDetail, NewFarm, NewLivestock, NewNotification, Notification, NotificationDetail,
    RecentNotification, SensorReading, SpeciesCount, StatusCounts,
};
use crate::domain::value_objects::NewReading;
use crate::error::LivestockResult;

/// Farm repository trait
#[trait_variant::make(FarmRepository: Send)]
pub trait LocalFarmRepository {
    async fn create_farm(&self, user_id: UserId, farm: &NewFarm) -> LivestockResult<Farm>;

    async fn list_farms(&self, user_id: UserId) -> LivestockResult<Vec<Farm>>;

    async fn find_farm(&self, id: FarmId, user_id: UserId) -> LivestockResult<Option<Farm>>;

    async fn update_farm(&self, farm: &Farm) -> LivestockResult<Farm>;

    /// Animals on the farm keep existing with `farm_id = NULL`.
    async fn delete_farm(&self, id: FarmId) -> LivestockResult<()>;
}

/// Livestock repository trait
#[trait_variant::make(LivestockRepository: Send)]
pub trait LocalLivestockRepository {
    /// Insert the animal and its empty anomaly row in one transaction.
    async fn create_livestock(
        &self,
        user_id: UserId,
        livestock: &NewLivestock,
    ) -> LivestockResult<Livestock>;

    async fn list_livestock(&self, user_id: UserId) -> LivestockResult<Vec<Livestock>>;

    async fn find_livestock(
        &self,
        id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Option<Livestock>>;

    /// Write every column and refresh `updated_at`.
    async fn update_livestock(&self, livestock: &Livestock) -> LivestockResult<Livestock>;

    /// Readings, anomaly, devices and notifications cascade.
    async fn delete_livestock(&self, id: LivestockId) -> LivestockResult<()>;

    async fn status_counts(&self, user_id: UserId) -> LivestockResult<StatusCounts>;

    /// Ordered by count, largest first.
    async fn species_counts(&self, user_id: UserId) -> LivestockResult<Vec<SpeciesCount>>;

    /// Every animal of the user with its latest reading and anomaly row.
    async fn livestock_overview(&self, user_id: UserId) -> LivestockResult<Vec<LivestockDetail>>;
}

/// Sensor time series repository trait
#[trait_variant::make(SensorDataRepository: Send)]
pub trait LocalSensorDataRepository {
    async fn insert_reading(
        &self,
        livestock_id: LivestockId,
        reading: &NewReading,
    ) -> LivestockResult<SensorReading>;

    async fn latest_reading(
        &self,
        livestock_id: LivestockId,
    ) -> LivestockResult<Option<SensorReading>>;

    /// Newest first.
    async fn readings_since(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<SensorReading>>;

    /// Oldest hour first.
    async fn hourly_averages(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<HourlyAverage>>;

    /// Averages across all of the user's animals, oldest day first.
    async fn daily_averages(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<DailyAverage>>;

    /// One row per animal that has at least one reading.
    async fn latest_readings(&self, user_id: UserId) -> LivestockResult<Vec<LatestReading>>;
}

/// Anomaly repository trait
#[trait_variant::make(AnomalyRepository: Send)]
pub trait LocalAnomalyRepository {
    async fn find_anomaly(&self, livestock_id: LivestockId) -> LivestockResult<Option<Anomaly>>;

    /// Insert or overwrite the singleton row. `alert` is written in the same
    /// transaction.
    async fn upsert_anomaly(
        &self,
        livestock_id: LivestockId,
        report: &AnomalyReport,
        alert: Option<&NewNotification>,
    ) -> LivestockResult<Anomaly>;
}

/// Notification repository trait
#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    /// Newest first.
    async fn recent_notifications(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> LivestockResult<Vec<RecentNotification>>;

    /// Newest first.
    async fn notification_details(
        &self,
        user_id: UserId,
    ) -> LivestockResult<Vec<NotificationDetail>>;

    /// `None` when the notification does not exist or is not the user's.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> LivestockResult<Option<Notification>>;
}

/// Device binding repository trait
#[trait_variant::make(DeviceRepository: Send)]
pub trait LocalDeviceRepository {
    /// Binding twice only refreshes `last_update`.
    async fn bind_device(&self, livestock_id: LivestockId, device_id: i32)
    -> LivestockResult<Device>;

    async fn list_devices(&self, livestock_id: LivestockId) -> LivestockResult<Vec<Device>>;
}

/// Everything the livestock routes need from storage.
pub trait LivestockStore:
    FarmRepository
    + LivestockRepository
    + SensorDataRepository
    + AnomalyRepository
    + NotificationRepository
    + DeviceRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> LivestockStore for T where
    T: FarmRepository
        + LivestockRepository
        + SensorDataRepository
        + AnomalyRepository
        + NotificationRepository
        + DeviceRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

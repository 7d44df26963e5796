//! Sensor Data Use Cases
//!
//! Readings are an append-only time series per animal. The dashboard reads
//! the newest reading, a bounded history, hourly averages for one animal and
//! daily averages across the herd.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use kernel::id::{LivestockId, UserId};

use crate::application::config::LivestockConfig;
use crate::application::herd::owned_livestock;
use crate::domain::entities::{DailyAverage, HourlyAverage, LatestReading, SensorReading};
use crate::domain::repository::{LivestockRepository, SensorDataRepository};
use crate::domain::value_objects::{HistoryWindow, NewReading};
use crate::error::{LivestockError, LivestockResult};

/// Reading as submitted by a collar gateway or the dashboard.
#[derive(Debug, Clone, Default)]
pub struct RecordReadingInput {
    pub temperature: Option<f32>,
    pub heart_rate: Option<i32>,
    pub sp02: Option<f32>,
    pub respiratory_rate: Option<f32>,
    pub motion_level: Option<f32>,
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct SensorDataUseCases<R>
where
    R: LivestockRepository + SensorDataRepository,
{
    repo: Arc<R>,
    config: Arc<LivestockConfig>,
}

impl<R> SensorDataUseCases<R>
where
    R: LivestockRepository + SensorDataRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LivestockConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn latest(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Option<SensorReading>> {
        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        self.repo.latest_reading(livestock_id).await
    }

    pub async fn record(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
        input: RecordReadingInput,
    ) -> LivestockResult<SensorReading> {
        let (Some(temperature), Some(heart_rate)) = (input.temperature, input.heart_rate) else {
            return Err(LivestockError::MissingFields(
                "Temperature and heart rate are required",
            ));
        };

        let reading = NewReading::new(
            temperature,
            heart_rate,
            input.sp02,
            input.respiratory_rate,
            input.motion_level,
            input.timestamp.unwrap_or_else(Utc::now),
        )?;

        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        let stored = self.repo.insert_reading(livestock_id, &reading).await?;

        tracing::debug!(
            livestock_id = %livestock_id,
            temperature = reading.temperature,
            heart_rate = reading.heart_rate,
            "Sensor reading recorded"
        );
        Ok(stored)
    }

    pub async fn history(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
        hours: Option<u32>,
    ) -> LivestockResult<Vec<SensorReading>> {
        let window = self.window(hours)?;
        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        self.repo
            .readings_since(livestock_id, window.since(Utc::now()))
            .await
    }

    pub async fn hourly_averages(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
        hours: Option<u32>,
    ) -> LivestockResult<Vec<HourlyAverage>> {
        let window = self.window(hours)?;
        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        self.repo
            .hourly_averages(livestock_id, window.since(Utc::now()))
            .await
    }

    /// Daily averages from midnight UTC `daily_average_days - 1` days ago.
    pub async fn daily_averages(&self, user_id: UserId) -> LivestockResult<Vec<DailyAverage>> {
        let since = daily_window_start(Utc::now(), self.config.daily_average_days);
        self.repo.daily_averages(user_id, since).await
    }

    pub async fn latest_per_livestock(&self, user_id: UserId) -> LivestockResult<Vec<LatestReading>> {
        self.repo.latest_readings(user_id).await
    }

    fn window(&self, hours: Option<u32>) -> LivestockResult<HistoryWindow> {
        HistoryWindow::new(
            hours,
            self.config.history_default_hours,
            self.config.history_max_hours,
        )
    }
}

/// Midnight UTC at the start of the oldest day in a `days`-day window ending today.
pub fn daily_window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let first_day = now.date_naive() - chrono::Duration::days(i64::from(days.max(1)) - 1);
    first_day.and_time(NaiveTime::MIN).and_utc()
}

//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{FarmId, LivestockId, NotificationId, ReadingId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{
    Anomaly, AnomalyReport, DailyAverage, Device, Farm, HourlyAverage, LatestReading, Livestock,
    LivestockDetail, NewFarm, NewLivestock, NewNotification, Notification, NotificationDetail,
    RecentNotification, SensorReading, SpeciesCount, StatusCounts,
};
use crate::domain::repository::{
    AnomalyRepository, DeviceRepository, FarmRepository, LivestockRepository,
    NotificationRepository, SensorDataRepository,
};
use crate::domain::value_objects::{HealthStatus, NewReading};
use crate::error::LivestockResult;

const FARM_COLUMNS: &str = "id, user_id, name, location, address, type, created_at";

const LIVESTOCK_COLUMNS: &str = "id, farm_id, user_id, name, species, breed, gender, \
    birth_date, photo_url, status, height, weight, body_condition_score, notes, recorded_at, \
    created_at, updated_at";

const LIVESTOCK_COLUMNS_L: &str = "l.id, l.farm_id, l.user_id, l.name, l.species, l.breed, \
    l.gender, l.birth_date, l.photo_url, l.status, l.height, l.weight, l.body_condition_score, \
    l.notes, l.recorded_at, l.created_at, l.updated_at";

const READING_COLUMNS: &str = "id, livestock_id, temperature, heart_rate, sp02, \
    respiratory_rate, motion_level, \"timestamp\"";

/// Latest reading columns of the `latest` CTE, prefixed `r_`.
const LATEST_READING_COLUMNS_R: &str = "r.id AS r_id, r.temperature AS r_temperature, \
    r.heart_rate AS r_heart_rate, r.sp02 AS r_sp02, r.respiratory_rate AS r_respiratory_rate, \
    r.motion_level AS r_motion_level, r.\"timestamp\" AS r_timestamp";

const ANOMALY_COLUMNS: &str = "livestock_id, type, severity, notes, detected_at, resolved";

const NOTIFICATION_COLUMNS: &str = "id, user_id, livestock_id, message, type, read, sent_at";

/// Ranks each animal's readings newest first. `$1` is the owner.
const LATEST_READINGS_CTE: &str = r#"
    WITH latest AS (
        SELECT
            s.id,
            s.livestock_id,
            s.temperature,
            s.heart_rate,
            s.sp02,
            s.respiratory_rate,
            s.motion_level,
            s."timestamp",
            ROW_NUMBER() OVER (
                PARTITION BY s.livestock_id
                ORDER BY s."timestamp" DESC, s.id DESC
            ) AS rn
        FROM sensor_data s
        JOIN livestock owned ON owned.id = s.livestock_id
        WHERE owned.user_id = $1
    )
"#;

/// PostgreSQL-backed livestock repository
#[derive(Clone)]
pub struct PgLivestockRepository {
    pool: PgPool,
}

impl PgLivestockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Farm Repository Implementation
// ============================================================================

impl FarmRepository for PgLivestockRepository {
    async fn create_farm(&self, user_id: UserId, farm: &NewFarm) -> LivestockResult<Farm> {
        let sql = format!(
            "INSERT INTO farms (user_id, name, location, address, type) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {FARM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FarmRow>(&sql)
            .bind(user_id.get())
            .bind(&farm.name)
            .bind(&farm.location)
            .bind(&farm.address)
            .bind(&farm.farm_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_farms(&self, user_id: UserId) -> LivestockResult<Vec<Farm>> {
        let sql = format!("SELECT {FARM_COLUMNS} FROM farms WHERE user_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, FarmRow>(&sql)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Farm::from).collect())
    }

    async fn find_farm(&self, id: FarmId, user_id: UserId) -> LivestockResult<Option<Farm>> {
        let sql = format!("SELECT {FARM_COLUMNS} FROM farms WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, FarmRow>(&sql)
            .bind(id.get())
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Farm::from))
    }

    async fn update_farm(&self, farm: &Farm) -> LivestockResult<Farm> {
        let sql = format!(
            "UPDATE farms SET name = $2, location = $3, address = $4, type = $5 \
             WHERE id = $1 RETURNING {FARM_COLUMNS}"
        );
        let row = sqlx::query_as::<_, FarmRow>(&sql)
            .bind(farm.id.get())
            .bind(&farm.name)
            .bind(&farm.location)
            .bind(&farm.address)
            .bind(&farm.farm_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn delete_farm(&self, id: FarmId) -> LivestockResult<()> {
        sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Livestock Repository Implementation
// ============================================================================

impl LivestockRepository for PgLivestockRepository {
    async fn create_livestock(
        &self,
        user_id: UserId,
        livestock: &NewLivestock,
    ) -> LivestockResult<Livestock> {
        let sql = format!(
            r#"
            INSERT INTO livestock (
                farm_id, user_id, name, species, breed, gender, birth_date, photo_url,
                status, height, weight, body_condition_score, notes, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {LIVESTOCK_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, LivestockRow>(&sql)
            .bind(livestock.farm_id.get())
            .bind(user_id.get())
            .bind(&livestock.name)
            .bind(&livestock.species)
            .bind(&livestock.breed)
            .bind(&livestock.gender)
            .bind(livestock.birth_date)
            .bind(&livestock.photo_url)
            .bind(&livestock.status)
            .bind(livestock.height)
            .bind(livestock.weight)
            .bind(livestock.body_condition_score)
            .bind(&livestock.notes)
            .bind(livestock.recorded_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO anomalies (livestock_id) VALUES ($1)")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn list_livestock(&self, user_id: UserId) -> LivestockResult<Vec<Livestock>> {
        let sql =
            format!("SELECT {LIVESTOCK_COLUMNS} FROM livestock WHERE user_id = $1 ORDER BY id");
        let rows = sqlx::query_as::<_, LivestockRow>(&sql)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Livestock::from).collect())
    }

    async fn find_livestock(
        &self,
        id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Option<Livestock>> {
        let sql =
            format!("SELECT {LIVESTOCK_COLUMNS} FROM livestock WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, LivestockRow>(&sql)
            .bind(id.get())
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Livestock::from))
    }

    async fn update_livestock(&self, livestock: &Livestock) -> LivestockResult<Livestock> {
        let sql = format!(
            r#"
            UPDATE livestock SET
                farm_id = $2,
                name = $3,
                species = $4,
                breed = $5,
                gender = $6,
                birth_date = $7,
                photo_url = $8,
                status = $9,
                height = $10,
                weight = $11,
                body_condition_score = $12,
                notes = $13,
                recorded_at = $14,
                updated_at = now()
            WHERE id = $1
            RETURNING {LIVESTOCK_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, LivestockRow>(&sql)
            .bind(livestock.id.get())
            .bind(livestock.farm_id.map(|id| id.get()))
            .bind(&livestock.name)
            .bind(&livestock.species)
            .bind(&livestock.breed)
            .bind(&livestock.gender)
            .bind(livestock.birth_date)
            .bind(&livestock.photo_url)
            .bind(&livestock.status)
            .bind(livestock.height)
            .bind(livestock.weight)
            .bind(livestock.body_condition_score)
            .bind(&livestock.notes)
            .bind(livestock.recorded_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn delete_livestock(&self, id: LivestockId) -> LivestockResult<()> {
        sqlx::query("DELETE FROM livestock WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn status_counts(&self, user_id: UserId) -> LivestockResult<StatusCounts> {
        let row = sqlx::query_as::<_, StatusCountsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = $2) AS healthy,
                COUNT(*) FILTER (WHERE status = $3) AS needs_attention,
                COUNT(*) FILTER (WHERE status = $4) AS critical
            FROM livestock
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.get())
        .bind(HealthStatus::Healthy.as_str())
        .bind(HealthStatus::NeedsAttention.as_str())
        .bind(HealthStatus::Critical.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(StatusCounts {
            total: row.total,
            healthy: row.healthy,
            needs_attention: row.needs_attention,
            critical: row.critical,
        })
    }

    async fn species_counts(&self, user_id: UserId) -> LivestockResult<Vec<SpeciesCount>> {
        let rows = sqlx::query_as::<_, SpeciesCountRow>(
            r#"
            SELECT species, COUNT(*) AS total
            FROM livestock
            WHERE user_id = $1
            GROUP BY species
            ORDER BY total DESC, species
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SpeciesCount {
                species: row.species,
                total: row.total,
            })
            .collect())
    }

    async fn livestock_overview(&self, user_id: UserId) -> LivestockResult<Vec<LivestockDetail>> {
        let sql = format!(
            r#"
            {LATEST_READINGS_CTE}
            SELECT
                {LIVESTOCK_COLUMNS_L},
                {LATEST_READING_COLUMNS_R},
                a.livestock_id AS a_livestock_id,
                a.type AS a_type,
                a.severity AS a_severity,
                a.notes AS a_notes,
                a.detected_at AS a_detected_at,
                a.resolved AS a_resolved
            FROM livestock l
            LEFT JOIN latest r ON r.livestock_id = l.id AND r.rn = 1
            LEFT JOIN anomalies a ON a.livestock_id = l.id
            WHERE l.user_id = $1
            ORDER BY l.id
            "#
        );
        let rows = sqlx::query_as::<_, OverviewRow>(&sql)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(OverviewRow::into_detail).collect())
    }
}

// ============================================================================
// Sensor Data Repository Implementation
// ============================================================================

impl SensorDataRepository for PgLivestockRepository {
    async fn insert_reading(
        &self,
        livestock_id: LivestockId,
        reading: &NewReading,
    ) -> LivestockResult<SensorReading> {
        let sql = format!(
            r#"
            INSERT INTO sensor_data (
                livestock_id, temperature, heart_rate, sp02, respiratory_rate, motion_level,
                "timestamp"
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {READING_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ReadingRow>(&sql)
            .bind(livestock_id.get())
            .bind(reading.temperature)
            .bind(reading.heart_rate)
            .bind(reading.sp02)
            .bind(reading.respiratory_rate)
            .bind(reading.motion_level)
            .bind(reading.timestamp)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn latest_reading(
        &self,
        livestock_id: LivestockId,
    ) -> LivestockResult<Option<SensorReading>> {
        let sql = format!(
            "SELECT {READING_COLUMNS} FROM sensor_data WHERE livestock_id = $1 \
             ORDER BY \"timestamp\" DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, ReadingRow>(&sql)
            .bind(livestock_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(SensorReading::from))
    }

    async fn readings_since(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<SensorReading>> {
        let sql = format!(
            "SELECT {READING_COLUMNS} FROM sensor_data \
             WHERE livestock_id = $1 AND \"timestamp\" >= $2 \
             ORDER BY \"timestamp\" DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ReadingRow>(&sql)
            .bind(livestock_id.get())
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SensorReading::from).collect())
    }

    async fn hourly_averages(
        &self,
        livestock_id: LivestockId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<HourlyAverage>> {
        // AVG over an integer column yields NUMERIC; cast everything to float8.
        let rows = sqlx::query_as::<_, HourlyAverageRow>(
            r#"
            SELECT
                date_trunc('hour', "timestamp", 'UTC') AS hour,
                AVG(temperature)::float8 AS avg_temperature,
                AVG(heart_rate)::float8 AS avg_heart_rate,
                AVG(sp02)::float8 AS avg_sp02,
                AVG(respiratory_rate)::float8 AS avg_respiratory_rate,
                AVG(motion_level)::float8 AS avg_motion_level,
                COUNT(*) AS readings
            FROM sensor_data
            WHERE livestock_id = $1 AND "timestamp" >= $2
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(livestock_id.get())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| HourlyAverage {
                hour: row.hour,
                avg_temperature: row.avg_temperature,
                avg_heart_rate: row.avg_heart_rate,
                avg_sp02: row.avg_sp02,
                avg_respiratory_rate: row.avg_respiratory_rate,
                avg_motion_level: row.avg_motion_level,
                readings: row.readings,
            })
            .collect())
    }

    async fn daily_averages(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> LivestockResult<Vec<DailyAverage>> {
        let rows = sqlx::query_as::<_, DailyAverageRow>(
            r#"
            SELECT
                (s."timestamp" AT TIME ZONE 'UTC')::date AS day,
                AVG(s.temperature)::float8 AS avg_temperature,
                AVG(s.heart_rate)::float8 AS avg_heart_rate,
                AVG(s.sp02)::float8 AS avg_sp02,
                AVG(s.respiratory_rate)::float8 AS avg_respiratory_rate,
                AVG(s.motion_level)::float8 AS avg_motion_level,
                COUNT(*) AS readings
            FROM sensor_data s
            JOIN livestock l ON l.id = s.livestock_id
            WHERE l.user_id = $1 AND s."timestamp" >= $2
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(user_id.get())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyAverage {
                day: row.day,
                avg_temperature: row.avg_temperature,
                avg_heart_rate: row.avg_heart_rate,
                avg_sp02: row.avg_sp02,
                avg_respiratory_rate: row.avg_respiratory_rate,
                avg_motion_level: row.avg_motion_level,
                readings: row.readings,
            })
            .collect())
    }

    async fn latest_readings(&self, user_id: UserId) -> LivestockResult<Vec<LatestReading>> {
        let sql = format!(
            r#"
            {LATEST_READINGS_CTE}
            SELECT
                r.id,
                r.livestock_id,
                r.temperature,
                r.heart_rate,
                r.sp02,
                r.respiratory_rate,
                r.motion_level,
                r."timestamp",
                l.name AS livestock_name,
                l.species AS livestock_species
            FROM latest r
            JOIN livestock l ON l.id = r.livestock_id
            WHERE r.rn = 1
            ORDER BY l.id
            "#
        );
        let rows = sqlx::query_as::<_, LatestReadingRow>(&sql)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| LatestReading {
                livestock_id: LivestockId::new(row.reading.livestock_id),
                name: row.livestock_name,
                species: row.livestock_species,
                reading: row.reading.into(),
            })
            .collect())
    }
}

// ============================================================================
// Anomaly Repository Implementation
// ============================================================================

impl AnomalyRepository for PgLivestockRepository {
    async fn find_anomaly(&self, livestock_id: LivestockId) -> LivestockResult<Option<Anomaly>> {
        let sql = format!("SELECT {ANOMALY_COLUMNS} FROM anomalies WHERE livestock_id = $1");
        let row = sqlx::query_as::<_, AnomalyRow>(&sql)
            .bind(livestock_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Anomaly::from))
    }

    async fn upsert_anomaly(
        &self,
        livestock_id: LivestockId,
        report: &AnomalyReport,
        alert: Option<&NewNotification>,
    ) -> LivestockResult<Anomaly> {
        let sql = format!(
            r#"
            INSERT INTO anomalies (livestock_id, type, severity, notes, detected_at, resolved)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (livestock_id) DO UPDATE SET
                type = EXCLUDED.type,
                severity = EXCLUDED.severity,
                notes = EXCLUDED.notes,
                detected_at = EXCLUDED.detected_at,
                resolved = EXCLUDED.resolved
            RETURNING {ANOMALY_COLUMNS}
            "#
        );

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AnomalyRow>(&sql)
            .bind(livestock_id.get())
            .bind(&report.anomaly_type)
            .bind(&report.severity)
            .bind(&report.notes)
            .bind(report.detected_at)
            .bind(report.resolved)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(alert) = alert {
            sqlx::query(
                r#"
                INSERT INTO notifications (user_id, livestock_id, message, type, read, sent_at)
                VALUES ($1, $2, $3, $4, FALSE, now())
                "#,
            )
            .bind(alert.user_id.get())
            .bind(alert.livestock_id.get())
            .bind(&alert.message)
            .bind(&alert.notification_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }
}

// ============================================================================
// Notification Repository Implementation
// ============================================================================

impl NotificationRepository for PgLivestockRepository {
    async fn recent_notifications(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> LivestockResult<Vec<RecentNotification>> {
        let rows = sqlx::query_as::<_, RecentNotificationRow>(
            r#"
            SELECT
                n.id, n.user_id, n.livestock_id, n.message, n.type, n.read, n.sent_at,
                l.name AS livestock_name,
                l.species AS livestock_species
            FROM notifications n
            JOIN livestock l ON l.id = n.livestock_id
            WHERE n.user_id = $1
            ORDER BY n.sent_at DESC NULLS LAST, n.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.get())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RecentNotification {
                notification: row.notification.into(),
                livestock_name: row.livestock_name,
                livestock_species: row.livestock_species,
            })
            .collect())
    }

    async fn notification_details(
        &self,
        user_id: UserId,
    ) -> LivestockResult<Vec<NotificationDetail>> {
        let sql = format!(
            r#"
            {LATEST_READINGS_CTE}
            SELECT
                n.id AS n_id,
                n.user_id AS n_user_id,
                n.livestock_id AS n_livestock_id,
                n.message AS n_message,
                n.type AS n_type,
                n.read AS n_read,
                n.sent_at AS n_sent_at,
                {LIVESTOCK_COLUMNS_L},
                {LATEST_READING_COLUMNS_R}
            FROM notifications n
            JOIN livestock l ON l.id = n.livestock_id
            LEFT JOIN latest r ON r.livestock_id = l.id AND r.rn = 1
            WHERE n.user_id = $1
            ORDER BY n.sent_at DESC NULLS LAST, n.id DESC
            "#
        );
        let rows = sqlx::query_as::<_, NotificationDetailRow>(&sql)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(NotificationDetailRow::into_detail)
            .collect())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> LivestockResult<Option<Notification>> {
        let sql = format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2 \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(id.get())
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Notification::from))
    }
}

// ============================================================================
// Device Repository Implementation
// ============================================================================

impl DeviceRepository for PgLivestockRepository {
    async fn bind_device(
        &self,
        livestock_id: LivestockId,
        device_id: i32,
    ) -> LivestockResult<Device> {
        let row = sqlx::query_as::<_, DeviceRow>(
            r#"
            INSERT INTO devices (livestock_id, device_id, last_update)
            VALUES ($1, $2, now())
            ON CONFLICT (livestock_id, device_id) DO UPDATE SET last_update = EXCLUDED.last_update
            RETURNING livestock_id, device_id, last_update
            "#,
        )
        .bind(livestock_id.get())
        .bind(device_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_devices(&self, livestock_id: LivestockId) -> LivestockResult<Vec<Device>> {
        let rows = sqlx::query_as::<_, DeviceRow>(
            r#"
            SELECT livestock_id, device_id, last_update
            FROM devices
            WHERE livestock_id = $1
            ORDER BY device_id
            "#,
        )
        .bind(livestock_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Device::from).collect())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct FarmRow {
    id: i32,
    user_id: i32,
    name: String,
    location: Option<String>,
    address: Option<String>,
    #[sqlx(rename = "type")]
    farm_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FarmRow> for Farm {
    fn from(row: FarmRow) -> Self {
        Self {
            id: FarmId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            location: row.location,
            address: row.address,
            farm_type: row.farm_type,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LivestockRow {
    id: i32,
    farm_id: Option<i32>,
    user_id: i32,
    name: String,
    species: String,
    breed: Option<String>,
    gender: Option<String>,
    birth_date: Option<NaiveDate>,
    photo_url: Option<String>,
    status: Option<String>,
    height: Option<f32>,
    weight: Option<f32>,
    body_condition_score: Option<i32>,
    notes: Option<String>,
    recorded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LivestockRow> for Livestock {
    fn from(row: LivestockRow) -> Self {
        Self {
            id: LivestockId::new(row.id),
            farm_id: row.farm_id.map(FarmId::new),
            user_id: UserId::new(row.user_id),
            name: row.name,
            species: row.species,
            breed: row.breed,
            gender: row.gender,
            birth_date: row.birth_date,
            photo_url: row.photo_url,
            status: row.status,
            height: row.height,
            weight: row.weight,
            body_condition_score: row.body_condition_score,
            notes: row.notes,
            recorded_at: row.recorded_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReadingRow {
    id: i32,
    livestock_id: i32,
    temperature: Option<f32>,
    heart_rate: Option<i32>,
    sp02: Option<f32>,
    respiratory_rate: Option<f32>,
    motion_level: Option<f32>,
    timestamp: DateTime<Utc>,
}

impl From<ReadingRow> for SensorReading {
    fn from(row: ReadingRow) -> Self {
        Self {
            id: ReadingId::new(row.id),
            livestock_id: LivestockId::new(row.livestock_id),
            temperature: row.temperature,
            heart_rate: row.heart_rate,
            sp02: row.sp02,
            respiratory_rate: row.respiratory_rate,
            motion_level: row.motion_level,
            timestamp: row.timestamp,
        }
    }
}

/// Latest reading columns from a LEFT JOIN; all NULL when the animal has none.
#[derive(sqlx::FromRow)]
struct JoinedReadingRow {
    r_id: Option<i32>,
    r_temperature: Option<f32>,
    r_heart_rate: Option<i32>,
    r_sp02: Option<f32>,
    r_respiratory_rate: Option<f32>,
    r_motion_level: Option<f32>,
    r_timestamp: Option<DateTime<Utc>>,
}

impl JoinedReadingRow {
    fn into_reading(self, livestock_id: LivestockId) -> Option<SensorReading> {
        let (Some(id), Some(timestamp)) = (self.r_id, self.r_timestamp) else {
            return None;
        };
        Some(SensorReading {
            id: ReadingId::new(id),
            livestock_id,
            temperature: self.r_temperature,
            heart_rate: self.r_heart_rate,
            sp02: self.r_sp02,
            respiratory_rate: self.r_respiratory_rate,
            motion_level: self.r_motion_level,
            timestamp,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LatestReadingRow {
    #[sqlx(flatten)]
    reading: ReadingRow,
    livestock_name: String,
    livestock_species: String,
}

#[derive(sqlx::FromRow)]
struct AnomalyRow {
    livestock_id: i32,
    #[sqlx(rename = "type")]
    anomaly_type: Option<String>,
    severity: Option<String>,
    notes: Option<String>,
    detected_at: Option<DateTime<Utc>>,
    resolved: Option<bool>,
}

impl From<AnomalyRow> for Anomaly {
    fn from(row: AnomalyRow) -> Self {
        Self {
            livestock_id: LivestockId::new(row.livestock_id),
            anomaly_type: row.anomaly_type,
            severity: row.severity,
            notes: row.notes,
            detected_at: row.detected_at,
            resolved: row.resolved,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OverviewRow {
    #[sqlx(flatten)]
    livestock: LivestockRow,
    #[sqlx(flatten)]
    reading: JoinedReadingRow,
    a_livestock_id: Option<i32>,
    a_type: Option<String>,
    a_severity: Option<String>,
    a_notes: Option<String>,
    a_detected_at: Option<DateTime<Utc>>,
    a_resolved: Option<bool>,
}

impl OverviewRow {
    fn into_detail(self) -> LivestockDetail {
        let livestock = Livestock::from(self.livestock);
        let anomaly = self.a_livestock_id.map(|id| Anomaly {
            livestock_id: LivestockId::new(id),
            anomaly_type: self.a_type,
            severity: self.a_severity,
            notes: self.a_notes,
            detected_at: self.a_detected_at,
            resolved: self.a_resolved,
        });

        LivestockDetail {
            latest_reading: self.reading.into_reading(livestock.id),
            anomaly,
            livestock,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i32,
    user_id: i32,
    livestock_id: i32,
    message: Option<String>,
    #[sqlx(rename = "type")]
    notification_type: Option<String>,
    read: bool,
    sent_at: Option<DateTime<Utc>>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::new(row.id),
            user_id: UserId::new(row.user_id),
            livestock_id: LivestockId::new(row.livestock_id),
            message: row.message,
            notification_type: row.notification_type,
            read: row.read,
            sent_at: row.sent_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecentNotificationRow {
    #[sqlx(flatten)]
    notification: NotificationRow,
    livestock_name: String,
    livestock_species: String,
}

#[derive(sqlx::FromRow)]
struct NotificationDetailRow {
    n_id: i32,
    n_user_id: i32,
    n_livestock_id: i32,
    n_message: Option<String>,
    n_type: Option<String>,
    n_read: bool,
    n_sent_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    livestock: LivestockRow,
    #[sqlx(flatten)]
    reading: JoinedReadingRow,
}

impl NotificationDetailRow {
    fn into_detail(self) -> NotificationDetail {
        let livestock = Livestock::from(self.livestock);
        NotificationDetail {
            notification: Notification {
                id: NotificationId::new(self.n_id),
                user_id: UserId::new(self.n_user_id),
                livestock_id: LivestockId::new(self.n_livestock_id),
                message: self.n_message,
                notification_type: self.n_type,
                read: self.n_read,
                sent_at: self.n_sent_at,
            },
            latest_reading: self.reading.into_reading(livestock.id),
            livestock,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DeviceRow {
    livestock_id: i32,
    device_id: i32,
    last_update: Option<DateTime<Utc>>,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Self {
            livestock_id: LivestockId::new(row.livestock_id),
            device_id: row.device_id,
            last_update: row.last_update,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatusCountsRow {
    total: i64,
    healthy: i64,
    needs_attention: i64,
    critical: i64,
}

#[derive(sqlx::FromRow)]
struct SpeciesCountRow {
    species: String,
    total: i64,
}

#[derive(sqlx::FromRow)]
struct HourlyAverageRow {
    hour: DateTime<Utc>,
    avg_temperature: Option<f64>,
    avg_heart_rate: Option<f64>,
    avg_sp02: Option<f64>,
    avg_respiratory_rate: Option<f64>,
    avg_motion_level: Option<f64>,
    readings: i64,
}

#[derive(sqlx::FromRow)]
struct DailyAverageRow {
    day: NaiveDate,
    avg_temperature: Option<f64>,
    avg_heart_rate: Option<f64>,
    avg_sp02: Option<f64>,
    avg_respiratory_rate: Option<f64>,
    avg_motion_level: Option<f64>,
    readings: i64,
}

//! HTTP Handlers
//!
//! Every handler takes the [`CurrentUser`] put in place by the session
//! middleware and passes its id down so that lookups only see the caller's
//! rows. Routes whose path segment is a user id reject any other user with
//! 403.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::extract::{AppJson, AppQuery};
use kernel::id::{FarmId, Id, UserId};
use kernel::session::CurrentUser;
use std::sync::Arc;

use crate::application::config::LivestockConfig;
use crate::application::{
    AnomalyUseCases, DashboardUseCases, DeviceUseCases, FarmUseCases, HerdUseCases,
    NotificationUseCases, RecordReadingInput, ReportAnomalyInput, SasTokenInput,
    SensorDataUseCases,
};
use crate::domain::entities::{NewFarm, NewLivestock};
use crate::domain::patch::{FarmPatch, LivestockPatch};
use crate::domain::repository::LivestockStore;
use crate::error::{LivestockError, LivestockResult};
use crate::presentation::dto::{
    AnomalyResponse, BindDeviceRequest, CreateLivestockRequest, DailyAverageResponse,
    DeviceResponse, Envelope, FarmRequest, FarmResponse, HourlyAverageResponse,
    LatestReadingResponse, LivestockDetailResponse, LivestockResponse, NotificationDetailResponse,
    NotificationResponse, RecentNotificationResponse, RecordReadingRequest, ReportAnomalyRequest,
    SasTokenRequest, SasTokenResponse, SensorReadingResponse, SpeciesCountResponse,
    StatusCountsResponse, UpdateLivestockRequest, WindowQuery,
};

/// Shared state for livestock handlers
#[derive(Clone)]
pub struct LivestockAppState<R>
where
    R: LivestockStore,
{
    pub repo: Arc<R>,
    pub config: Arc<LivestockConfig>,
}

type JsonResult<T> = LivestockResult<Json<Envelope<T>>>;
type CreatedResult<T> = LivestockResult<(StatusCode, Json<Envelope<T>>)>;

fn ok<T>(message: &'static str, data: T) -> JsonResult<T> {
    Ok(Json(Envelope::new(message, data)))
}

fn created<T>(message: &'static str, data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(Envelope::new(message, data))))
}

fn parse_id<T>(raw: &str, entity: &'static str) -> LivestockResult<Id<T>> {
    Id::parse(raw).ok_or(LivestockError::InvalidId(entity))
}

/// Parse a user id path segment and require it to be the caller.
fn scoped_user(caller: &CurrentUser, raw: &str) -> LivestockResult<UserId> {
    let user_id = parse_id(raw, "user")?;
    caller.ensure_owner(user_id)?;
    Ok(user_id)
}

fn body_farm_id(raw: i32) -> LivestockResult<FarmId> {
    if raw > 0 {
        Ok(FarmId::new(raw))
    } else {
        Err(LivestockError::InvalidId("farm"))
    }
}

// ============================================================================
// Farms
// ============================================================================

/// POST /farms
pub async fn create_farm<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    AppJson(req): AppJson<FarmRequest>,
) -> CreatedResult<FarmResponse> {
    let farm = FarmUseCases::new(state.repo.clone())
        .create(
            caller.user_id,
            NewFarm {
                name: req.name.unwrap_or_default(),
                location: req.location,
                address: req.address,
                farm_type: req.farm_type,
            },
        )
        .await?;

    created("Farm created successfully", farm.into())
}

/// GET /farms
pub async fn list_farms<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
) -> JsonResult<Vec<FarmResponse>> {
    let farms = FarmUseCases::new(state.repo.clone())
        .list(caller.user_id)
        .await?;

    ok(
        "Farms retrieved successfully",
        farms.into_iter().map(Into::into).collect(),
    )
}

/// GET /farms/{id}
pub async fn get_farm<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<FarmResponse> {
    let id = parse_id(&raw_id, "farm")?;
    let farm = FarmUseCases::new(state.repo.clone())
        .get(id, caller.user_id)
        .await?;

    ok("Farm retrieved successfully", farm.into())
}

/// PUT /farms/{id}
pub async fn update_farm<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppJson(req): AppJson<FarmRequest>,
) -> JsonResult<FarmResponse> {
    let id = parse_id(&raw_id, "farm")?;
    let patch = FarmPatch {
        name: req.name,
        location: req.location,
        address: req.address,
        farm_type: req.farm_type,
    };
    let farm = FarmUseCases::new(state.repo.clone())
        .update(id, caller.user_id, patch)
        .await?;

    ok("Farm updated successfully", farm.into())
}

/// DELETE /farms/{id}
pub async fn delete_farm<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<Option<()>> {
    let id = parse_id(&raw_id, "farm")?;
    FarmUseCases::new(state.repo.clone())
        .delete(id, caller.user_id)
        .await?;

    ok("Farm deleted successfully", None)
}

// ============================================================================
// Livestock
// ============================================================================

/// POST /livestock
pub async fn create_livestock<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    AppJson(req): AppJson<CreateLivestockRequest>,
) -> CreatedResult<LivestockResponse> {
    let (Some(raw_farm_id), Some(name), Some(species)) = (req.farm_id, req.name, req.species)
    else {
        return Err(LivestockError::MissingFields(
            "Farm ID, name, and species are required",
        ));
    };

    let new = NewLivestock {
        farm_id: body_farm_id(raw_farm_id)?,
        name,
        species,
        breed: req.breed,
        gender: req.gender,
        birth_date: req.birth_date,
        photo_url: req.photo_url,
        status: req.status,
        height: req.height,
        weight: req.weight,
        body_condition_score: req.body_condition_score,
        notes: req.notes,
        recorded_at: req.recorded_at,
    };
    let livestock = HerdUseCases::new(state.repo.clone())
        .create(caller.user_id, new)
        .await?;

    created("Livestock created successfully", livestock.into())
}

/// GET /livestock
pub async fn list_livestock<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
) -> JsonResult<Vec<LivestockResponse>> {
    let herd = HerdUseCases::new(state.repo.clone())
        .list(caller.user_id)
        .await?;

    ok(
        "Livestock retrieved successfully",
        herd.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{id}
pub async fn get_livestock<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<LivestockResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let livestock = HerdUseCases::new(state.repo.clone())
        .get(id, caller.user_id)
        .await?;

    ok("Livestock retrieved successfully", livestock.into())
}

/// PUT /livestock/{id}
pub async fn update_livestock<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppJson(req): AppJson<UpdateLivestockRequest>,
) -> JsonResult<LivestockResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let patch = LivestockPatch {
        farm_id: req.farm_id.map(body_farm_id).transpose()?,
        name: req.name,
        species: req.species,
        breed: req.breed,
        gender: req.gender,
        birth_date: req.birth_date,
        photo_url: req.photo_url,
        status: req.status,
        height: req.height,
        weight: req.weight,
        body_condition_score: req.body_condition_score,
        notes: req.notes,
        recorded_at: req.recorded_at,
    };
    let livestock = HerdUseCases::new(state.repo.clone())
        .update(id, caller.user_id, patch)
        .await?;

    ok("Livestock updated successfully", livestock.into())
}

/// DELETE /livestock/{id}
pub async fn delete_livestock<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<Option<()>> {
    let id = parse_id(&raw_id, "livestock")?;
    HerdUseCases::new(state.repo.clone())
        .delete(id, caller.user_id)
        .await?;

    ok("Livestock deleted successfully", None)
}

/// GET /livestock/{id}/detail
pub async fn livestock_detail<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<LivestockDetailResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let detail = HerdUseCases::new(state.repo.clone())
        .detail(id, caller.user_id)
        .await?;

    ok("Livestock detail retrieved successfully", detail.into())
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /livestock/{userId}/status-counts
pub async fn status_counts<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<StatusCountsResponse> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let counts = DashboardUseCases::new(state.repo.clone())
        .status_counts(user_id)
        .await?;

    ok("Status counts retrieved successfully", counts.into())
}

/// GET /livestock/{userId}/species-counts
pub async fn species_counts<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<SpeciesCountResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let counts = DashboardUseCases::new(state.repo.clone())
        .species_counts(user_id)
        .await?;

    ok(
        "Species counts retrieved successfully",
        counts.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{userId}/sensor-anomalies
pub async fn sensor_anomalies<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<LivestockDetailResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let overview = DashboardUseCases::new(state.repo.clone())
        .overview(user_id)
        .await?;

    ok(
        "Sensor data and anomalies retrieved successfully",
        overview.into_iter().map(Into::into).collect(),
    )
}

// ============================================================================
// Sensor data
// ============================================================================

/// GET /livestock/{id}/sensor-data
pub async fn latest_sensor_data<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<Option<SensorReadingResponse>> {
    let id = parse_id(&raw_id, "livestock")?;
    let reading = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .latest(id, caller.user_id)
        .await?;

    ok("Sensor data retrieved successfully", reading.map(Into::into))
}

/// PUT /livestock/{id}/sensor-data
pub async fn record_sensor_data<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppJson(req): AppJson<RecordReadingRequest>,
) -> JsonResult<SensorReadingResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let input = RecordReadingInput {
        temperature: req.temperature,
        heart_rate: req.heart_rate,
        sp02: req.sp02,
        respiratory_rate: req.respiratory_rate,
        motion_level: req.motion_level,
        timestamp: req.timestamp,
    };
    let reading = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .record(id, caller.user_id, input)
        .await?;

    ok("Sensor data recorded successfully", reading.into())
}

/// GET /livestock/{id}/sensor-data/history?hours=N
pub async fn sensor_history<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> JsonResult<Vec<SensorReadingResponse>> {
    let id = parse_id(&raw_id, "livestock")?;
    let readings = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .history(id, caller.user_id, query.hours)
        .await?;

    ok(
        "Sensor history retrieved successfully",
        readings.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{id}/avg-metrics-hourly?hours=N
pub async fn hourly_averages<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppQuery(query): AppQuery<WindowQuery>,
) -> JsonResult<Vec<HourlyAverageResponse>> {
    let id = parse_id(&raw_id, "livestock")?;
    let averages = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .hourly_averages(id, caller.user_id, query.hours)
        .await?;

    ok(
        "Hourly averages retrieved successfully",
        averages.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{userId}/avg-metrics-seven-day
pub async fn daily_averages<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<DailyAverageResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let averages = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .daily_averages(user_id)
        .await?;

    ok(
        "Daily averages retrieved successfully",
        averages.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{userId}/latest-readings
pub async fn latest_readings<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<LatestReadingResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let latest = SensorDataUseCases::new(state.repo.clone(), state.config.clone())
        .latest_per_livestock(user_id)
        .await?;

    ok(
        "Latest readings retrieved successfully",
        latest.into_iter().map(Into::into).collect(),
    )
}

// ============================================================================
// Anomalies
// ============================================================================

/// GET /livestock/{id}/anomalies
pub async fn get_anomaly<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<Option<AnomalyResponse>> {
    let id = parse_id(&raw_id, "livestock")?;
    let anomaly = AnomalyUseCases::new(state.repo.clone())
        .get(id, caller.user_id)
        .await?;

    ok("Anomaly retrieved successfully", anomaly.map(Into::into))
}

/// PUT /livestock/{id}/anomalies
pub async fn report_anomaly<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppJson(req): AppJson<ReportAnomalyRequest>,
) -> JsonResult<AnomalyResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let input = ReportAnomalyInput {
        anomaly_type: req.anomaly_type,
        severity: req.severity,
        notes: req.notes,
        detected_at: req.detected_at,
        resolved: req.resolved,
    };
    let anomaly = AnomalyUseCases::new(state.repo.clone())
        .report(id, caller.user_id, input)
        .await?;

    ok("Anomaly updated successfully", anomaly.into())
}

// ============================================================================
// Notifications
// ============================================================================

/// GET /livestock/{userId}/recent-notifs
pub async fn recent_notifications<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<RecentNotificationResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let recent = NotificationUseCases::new(state.repo.clone(), state.config.clone())
        .recent(user_id)
        .await?;

    ok(
        "Recent notifications retrieved successfully",
        recent.into_iter().map(Into::into).collect(),
    )
}

/// GET /livestock/{userId}/notif-detail
pub async fn notification_details<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_user_id): Path<String>,
) -> JsonResult<Vec<NotificationDetailResponse>> {
    let user_id = scoped_user(&caller, &raw_user_id)?;
    let details = NotificationUseCases::new(state.repo.clone(), state.config.clone())
        .details(user_id)
        .await?;

    ok(
        "Notification details retrieved successfully",
        details.into_iter().map(Into::into).collect(),
    )
}

/// PUT /notifications/{id}/read
pub async fn mark_notification_read<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<NotificationResponse> {
    let id = parse_id(&raw_id, "notification")?;
    let notification = NotificationUseCases::new(state.repo.clone(), state.config.clone())
        .mark_read(id, caller.user_id)
        .await?;

    ok("Notification marked as read", notification.into())
}

// ============================================================================
// Devices
// ============================================================================

/// POST /livestock/{id}/devices
pub async fn bind_device<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
    AppJson(req): AppJson<BindDeviceRequest>,
) -> CreatedResult<DeviceResponse> {
    let id = parse_id(&raw_id, "livestock")?;
    let device = DeviceUseCases::new(state.repo.clone(), state.config.clone())
        .bind(id, caller.user_id, req.device_id)
        .await?;

    created("Device bound successfully", device.into())
}

/// GET /livestock/{id}/devices
pub async fn list_devices<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> JsonResult<Vec<DeviceResponse>> {
    let id = parse_id(&raw_id, "livestock")?;
    let devices = DeviceUseCases::new(state.repo.clone(), state.config.clone())
        .list(id, caller.user_id)
        .await?;

    ok(
        "Devices retrieved successfully",
        devices.into_iter().map(Into::into).collect(),
    )
}

/// POST /devices/sas-token
pub async fn sas_token<R: LivestockStore>(
    State(state): State<LivestockAppState<R>>,
    _caller: CurrentUser,
    AppJson(req): AppJson<SasTokenRequest>,
) -> JsonResult<SasTokenResponse> {
    let input = SasTokenInput {
        hostname: req.hostname.unwrap_or_default(),
        device_id: req
            .device_id
            .map(|id| id.into_string())
            .unwrap_or_default(),
        primary_key: req.primary_key.unwrap_or_default(),
    };
    let sas_token = DeviceUseCases::new(state.repo.clone(), state.config.clone()).sas_token(input)?;

    ok("SAS token generated successfully", SasTokenResponse { sas_token })
}

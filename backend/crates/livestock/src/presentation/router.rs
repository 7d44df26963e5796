//! Livestock Router
//!
//! The `{id}` segment under `/livestock` is a livestock id for per-animal
//! routes and the caller's user id for the dashboard routes.

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::LivestockConfig;
use crate::domain::repository::LivestockStore;
use crate::infra::postgres::PgLivestockRepository;
use crate::presentation::handlers::{self, LivestockAppState};

/// Create the Livestock router with PostgreSQL repository
pub fn livestock_router(repo: PgLivestockRepository, config: LivestockConfig) -> Router {
    livestock_router_generic(repo, config)
}

/// Create a generic Livestock router for any repository implementation.
///
/// Handlers extract [`kernel::session::CurrentUser`]; layer the session
/// middleware on top of the returned router.
pub fn livestock_router_generic<R>(repo: R, config: LivestockConfig) -> Router
where
    R: LivestockStore,
{
    let state = LivestockAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        // Farms
        .route(
            "/farms",
            post(handlers::create_farm::<R>).get(handlers::list_farms::<R>),
        )
        .route(
            "/farms/{id}",
            get(handlers::get_farm::<R>)
                .put(handlers::update_farm::<R>)
                .delete(handlers::delete_farm::<R>),
        )
        // Livestock
        .route(
            "/livestock",
            post(handlers::create_livestock::<R>).get(handlers::list_livestock::<R>),
        )
        .route(
            "/livestock/{id}",
            get(handlers::get_livestock::<R>)
                .put(handlers::update_livestock::<R>)
                .delete(handlers::delete_livestock::<R>),
        )
        .route("/livestock/{id}/detail", get(handlers::livestock_detail::<R>))
        // Dashboard (user scoped)
        .route("/livestock/{id}/status-counts", get(handlers::status_counts::<R>))
        .route("/livestock/{id}/species-counts", get(handlers::species_counts::<R>))
        .route(
            "/livestock/{id}/sensor-anomalies",
            get(handlers::sensor_anomalies::<R>),
        )
        .route(
            "/livestock/{id}/avg-metrics-seven-day",
            get(handlers::daily_averages::<R>),
        )
        .route(
            "/livestock/{id}/latest-readings",
            get(handlers::latest_readings::<R>),
        )
        .route(
            "/livestock/{id}/recent-notifs",
            get(handlers::recent_notifications::<R>),
        )
        .route(
            "/livestock/{id}/notif-detail",
            get(handlers::notification_details::<R>),
        )
        // Sensor data
        .route(
            "/livestock/{id}/sensor-data",
            get(handlers::latest_sensor_data::<R>).put(handlers::record_sensor_data::<R>),
        )
        .route(
            "/livestock/{id}/sensor-data/history",
            get(handlers::sensor_history::<R>),
        )
        .route(
            "/livestock/{id}/avg-metrics-hourly",
            get(handlers::hourly_averages::<R>),
        )
        // Anomalies
        .route(
            "/livestock/{id}/anomalies",
            get(handlers::get_anomaly::<R>).put(handlers::report_anomaly::<R>),
        )
        // Devices
        .route(
            "/livestock/{id}/devices",
            post(handlers::bind_device::<R>).get(handlers::list_devices::<R>),
        )
        .route("/devices/sas-token", post(handlers::sas_token::<R>))
        // Notifications
        .route(
            "/notifications/{id}/read",
            put(handlers::mark_notification_read::<R>),
        )
        .with_state(state)
}

//! Livestock Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Farms, animals, sensor readings, anomalies, notifications, devices
//! - `application/` - Use cases and dashboard aggregates
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Every route is scoped to the caller. The router expects a
//! [`kernel::session::CurrentUser`] in the request extensions and is meant to
//! be wrapped in the auth crate's session middleware.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::LivestockConfig;
pub use error::{LivestockError, LivestockResult};
pub use infra::postgres::PgLivestockRepository;
pub use presentation::router::{livestock_router, livestock_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;

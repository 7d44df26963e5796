//! Domain Layer
//!
//! This layer contains:
//! - Entities and joined read models (Farm, Livestock, SensorReading, ...)
//! - Value objects (HealthStatus, NewReading, HistoryWindow)
//! - Partial-update rules for farms and animals
//! - Repository traits (interfaces)

pub mod entities;
pub mod patch;
pub mod repository;
pub mod value_objects;

//! Application Layer
//!
//! Use cases, grouped by the resource they serve.

pub mod anomalies;
pub mod config;
pub mod dashboard;
pub mod devices;
pub mod farms;
pub mod herd;
pub mod notifications;
pub mod sensor_data;

pub use anomalies::{AnomalyUseCases, ReportAnomalyInput};
pub use dashboard::DashboardUseCases;
pub use devices::{DeviceUseCases, SasTokenInput};
pub use farms::FarmUseCases;
pub use herd::HerdUseCases;
pub use notifications::NotificationUseCases;
pub use sensor_data::{RecordReadingInput, SensorDataUseCases};

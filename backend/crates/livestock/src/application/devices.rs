//! Device Use Cases
//!
//! Device bindings and the short-lived SAS tokens collars use to publish
//! telemetry to the IoT hub.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{LivestockId, UserId};

use crate::application::config::LivestockConfig;
use crate::application::herd::owned_livestock;
use crate::domain::entities::Device;
use crate::domain::repository::{DeviceRepository, LivestockRepository};
use crate::error::{LivestockError, LivestockResult};

#[derive(Debug, Clone, Default)]
pub struct SasTokenInput {
    pub hostname: String,
    pub device_id: String,
    pub primary_key: String,
}

pub struct DeviceUseCases<R>
where
    R: LivestockRepository + DeviceRepository,
{
    repo: Arc<R>,
    config: Arc<LivestockConfig>,
}

impl<R> DeviceUseCases<R>
where
    R: LivestockRepository + DeviceRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LivestockConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn bind(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
        device_id: Option<i32>,
    ) -> LivestockResult<Device> {
        let device_id = device_id.ok_or(LivestockError::MissingFields("Device ID is required"))?;
        if device_id <= 0 {
            return Err(LivestockError::Validation(
                "Device ID must be a positive integer".to_string(),
            ));
        }

        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        let device = self.repo.bind_device(livestock_id, device_id).await?;

        tracing::info!(livestock_id = %livestock_id, device_id, "Device bound");
        Ok(device)
    }

    pub async fn list(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Vec<Device>> {
        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        self.repo.list_devices(livestock_id).await
    }

    /// Sign a token for `{hostname}/devices/{deviceId}`.
    pub fn sas_token(&self, input: SasTokenInput) -> LivestockResult<String> {
        if [&input.hostname, &input.device_id, &input.primary_key]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(LivestockError::MissingFields(
                "Missing required fields: hostname, deviceId, primaryKey",
            ));
        }

        let resource_uri = format!("{}/devices/{}", input.hostname.trim(), input.device_id.trim());
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let token = platform::sas::generate_sas_token(
            &resource_uri,
            input.primary_key.trim(),
            self.config.sas_token_ttl.as_secs(),
            now,
        )?;

        tracing::info!(device_id = %input.device_id, "SAS token issued");
        Ok(token)
    }
}

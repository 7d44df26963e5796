//! Livestock Use Cases
//!
//! CRUD for animals. Creating or moving an animal requires the target farm to
//! belong to the caller.

use std::sync::Arc;

use kernel::id::{FarmId, LivestockId, UserId};

use crate::domain::entities::{Livestock, LivestockDetail, NewLivestock};
use crate::domain::patch::LivestockPatch;
use crate::domain::repository::{
    AnomalyRepository, FarmRepository, LivestockRepository, SensorDataRepository,
};
use crate::domain::value_objects::HealthStatus;
use crate::error::{LivestockError, LivestockResult};

/// Fetch an animal the caller owns, or `LivestockNotFound`.
pub(crate) async fn owned_livestock<R>(
    repo: &R,
    id: LivestockId,
    user_id: UserId,
) -> LivestockResult<Livestock>
where
    R: LivestockRepository,
{
    repo.find_livestock(id, user_id)
        .await?
        .ok_or(LivestockError::LivestockNotFound)
}

pub struct HerdUseCases<R>
where
    R: FarmRepository + LivestockRepository + SensorDataRepository + AnomalyRepository,
{
    repo: Arc<R>,
}

impl<R> HerdUseCases<R>
where
    R: FarmRepository + LivestockRepository + SensorDataRepository + AnomalyRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    async fn ensure_farm_owned(&self, farm_id: FarmId, user_id: UserId) -> LivestockResult<()> {
        match self.repo.find_farm(farm_id, user_id).await? {
            Some(_) => Ok(()),
            None => Err(LivestockError::FarmForbidden),
        }
    }

    pub async fn create(
        &self,
        user_id: UserId,
        mut livestock: NewLivestock,
    ) -> LivestockResult<Livestock> {
        if livestock.name.trim().is_empty() || livestock.species.trim().is_empty() {
            return Err(LivestockError::MissingFields(
                "Farm ID, name, and species are required",
            ));
        }
        livestock.status = livestock
            .status
            .as_deref()
            .map(HealthStatus::canonicalize)
            .transpose()?;

        self.ensure_farm_owned(livestock.farm_id, user_id).await?;

        let created = self.repo.create_livestock(user_id, &livestock).await?;
        tracing::info!(
            livestock_id = %created.id,
            farm_id = %livestock.farm_id,
            species = %created.species,
            "Livestock created"
        );
        Ok(created)
    }

    pub async fn list(&self, user_id: UserId) -> LivestockResult<Vec<Livestock>> {
        self.repo.list_livestock(user_id).await
    }

    pub async fn get(&self, id: LivestockId, user_id: UserId) -> LivestockResult<Livestock> {
        owned_livestock(self.repo.as_ref(), id, user_id).await
    }

    pub async fn update(
        &self,
        id: LivestockId,
        user_id: UserId,
        mut patch: LivestockPatch,
    ) -> LivestockResult<Livestock> {
        let current = owned_livestock(self.repo.as_ref(), id, user_id).await?;

        if let Some(farm_id) = patch.farm_id {
            self.ensure_farm_owned(farm_id, user_id).await?;
        }
        patch.status = match patch.status.take() {
            Some(status) if !status.trim().is_empty() => Some(HealthStatus::canonicalize(&status)?),
            other => other,
        };

        let updated = self.repo.update_livestock(&patch.apply(&current)).await?;
        tracing::info!(livestock_id = %id, "Livestock updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: LivestockId, user_id: UserId) -> LivestockResult<()> {
        owned_livestock(self.repo.as_ref(), id, user_id).await?;
        self.repo.delete_livestock(id).await?;

        tracing::info!(livestock_id = %id, user_id = %user_id, "Livestock deleted");
        Ok(())
    }

    /// The animal with its latest reading and anomaly row.
    pub async fn detail(&self, id: LivestockId, user_id: UserId) -> LivestockResult<LivestockDetail> {
        let livestock = owned_livestock(self.repo.as_ref(), id, user_id).await?;
        let latest_reading = self.repo.latest_reading(id).await?;
        let anomaly = self.repo.find_anomaly(id).await?;

        Ok(LivestockDetail {
            livestock,
            latest_reading,
            anomaly,
        })
    }
}

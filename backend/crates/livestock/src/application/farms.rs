//! Farm Use Cases

use std::sync::Arc;

use kernel::id::{FarmId, UserId};

use crate::domain::entities::{Farm, NewFarm};
use crate::domain::patch::FarmPatch;
use crate::domain::repository::FarmRepository;
use crate::error::{LivestockError, LivestockResult};

pub struct FarmUseCases<R>
where
    R: FarmRepository,
{
    repo: Arc<R>,
}

impl<R> FarmUseCases<R>
where
    R: FarmRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, user_id: UserId, farm: NewFarm) -> LivestockResult<Farm> {
        if farm.name.trim().is_empty() {
            return Err(LivestockError::MissingFields("Farm name is required"));
        }

        let farm = self.repo.create_farm(user_id, &farm).await?;
        tracing::info!(farm_id = %farm.id, user_id = %user_id, "Farm created");
        Ok(farm)
    }

    pub async fn list(&self, user_id: UserId) -> LivestockResult<Vec<Farm>> {
        self.repo.list_farms(user_id).await
    }

    pub async fn get(&self, id: FarmId, user_id: UserId) -> LivestockResult<Farm> {
        self.repo
            .find_farm(id, user_id)
            .await?
            .ok_or(LivestockError::FarmNotFound)
    }

    pub async fn update(
        &self,
        id: FarmId,
        user_id: UserId,
        patch: FarmPatch,
    ) -> LivestockResult<Farm> {
        let current = self.get(id, user_id).await?;
        let farm = self.repo.update_farm(&patch.apply(&current)).await?;

        tracing::info!(farm_id = %farm.id, "Farm updated");
        Ok(farm)
    }

    pub async fn delete(&self, id: FarmId, user_id: UserId) -> LivestockResult<()> {
        self.get(id, user_id).await?;
        self.repo.delete_farm(id).await?;

        tracing::info!(farm_id = %id, user_id = %user_id, "Farm deleted");
        Ok(())
    }
}

//! Dashboard Use Cases
//!
//! Herd-wide counts and the overview grid.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entities::{LivestockDetail, SpeciesCount, StatusCounts};
use crate::domain::repository::LivestockRepository;
use crate::error::LivestockResult;

pub struct DashboardUseCases<R>
where
    R: LivestockRepository,
{
    repo: Arc<R>,
}

impl<R> DashboardUseCases<R>
where
    R: LivestockRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All zeros for a user without animals.
    pub async fn status_counts(&self, user_id: UserId) -> LivestockResult<StatusCounts> {
        self.repo.status_counts(user_id).await
    }

    pub async fn species_counts(&self, user_id: UserId) -> LivestockResult<Vec<SpeciesCount>> {
        self.repo.species_counts(user_id).await
    }

    pub async fn overview(&self, user_id: UserId) -> LivestockResult<Vec<LivestockDetail>> {
        self.repo.livestock_overview(user_id).await
    }
}

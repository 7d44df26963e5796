//! Notification Use Cases

use std::sync::Arc;

use kernel::id::{NotificationId, UserId};

use crate::application::config::LivestockConfig;
use crate::domain::entities::{Notification, NotificationDetail, RecentNotification};
use crate::domain::repository::NotificationRepository;
use crate::error::{LivestockError, LivestockResult};

pub struct NotificationUseCases<R>
where
    R: NotificationRepository,
{
    repo: Arc<R>,
    config: Arc<LivestockConfig>,
}

impl<R> NotificationUseCases<R>
where
    R: NotificationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<LivestockConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn recent(&self, user_id: UserId) -> LivestockResult<Vec<RecentNotification>> {
        self.repo
            .recent_notifications(user_id, self.config.recent_notifications_limit)
            .await
    }

    pub async fn details(&self, user_id: UserId) -> LivestockResult<Vec<NotificationDetail>> {
        self.repo.notification_details(user_id).await
    }

    pub async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> LivestockResult<Notification> {
        let notification = self
            .repo
            .mark_read(id, user_id)
            .await?
            .ok_or(LivestockError::NotificationNotFound)?;

        tracing::debug!(notification_id = %id, "Notification marked read");
        Ok(notification)
    }
}

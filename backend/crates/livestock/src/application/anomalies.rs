//! Anomaly Use Cases
//!
//! Each animal has exactly one anomaly row. Reporting overwrites it; an
//! unresolved report also notifies the owner.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::{LivestockId, UserId};

use crate::application::herd::owned_livestock;
use crate::domain::entities::{Anomaly, AnomalyReport, Livestock, NewNotification};
use crate::domain::repository::{AnomalyRepository, LivestockRepository};
use crate::error::{LivestockError, LivestockResult};

/// Notification type written for unresolved anomalies
pub const ANOMALY_NOTIFICATION_TYPE: &str = "anomaly";

#[derive(Debug, Clone, Default)]
pub struct ReportAnomalyInput {
    pub anomaly_type: Option<String>,
    pub severity: Option<String>,
    pub notes: Option<String>,
    pub detected_at: Option<DateTime<Utc>>,
    pub resolved: Option<bool>,
}

pub struct AnomalyUseCases<R>
where
    R: LivestockRepository + AnomalyRepository,
{
    repo: Arc<R>,
}

impl<R> AnomalyUseCases<R>
where
    R: LivestockRepository + AnomalyRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
    ) -> LivestockResult<Option<Anomaly>> {
        owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;
        self.repo.find_anomaly(livestock_id).await
    }

    pub async fn report(
        &self,
        livestock_id: LivestockId,
        user_id: UserId,
        input: ReportAnomalyInput,
    ) -> LivestockResult<Anomaly> {
        let (Some(anomaly_type), Some(severity), Some(resolved)) =
            (input.anomaly_type, input.severity, input.resolved)
        else {
            return Err(LivestockError::MissingFields(
                "Type, severity, and resolved status are required",
            ));
        };

        let livestock = owned_livestock(self.repo.as_ref(), livestock_id, user_id).await?;

        let report = AnomalyReport {
            anomaly_type,
            severity,
            notes: input.notes,
            detected_at: input.detected_at.unwrap_or_else(Utc::now),
            resolved,
        };
        let alert = (!report.resolved).then(|| alert_for(&livestock, &report));

        let anomaly = self
            .repo
            .upsert_anomaly(livestock_id, &report, alert.as_ref())
            .await?;

        tracing::info!(
            livestock_id = %livestock_id,
            anomaly_type = %report.anomaly_type,
            severity = %report.severity,
            resolved = report.resolved,
            "Anomaly reported"
        );
        Ok(anomaly)
    }
}

/// Owner notification for an unresolved anomaly.
pub fn alert_for(livestock: &Livestock, report: &AnomalyReport) -> NewNotification {
    NewNotification {
        user_id: livestock.user_id,
        livestock_id: livestock.id,
        message: format!(
            "{} anomaly ({}) detected on {}",
            report.anomaly_type, report.severity, livestock.name
        ),
        notification_type: ANOMALY_NOTIFICATION_TYPE.to_string(),
    }
}

use chrono::Utc;

use super::domain::{new_record_id, ModerationAction, Notification, Report};
use super::error::MarketplaceError;
use crate::store::Store;

/// Append-only log of moderation outcomes, readable by either party of a report.
#[derive(Clone)]
pub struct NotificationService {
    store: Store,
}

impl NotificationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub(crate) async fn record(
        &self,
        report: &Report,
        action: ModerationAction,
        message: String,
    ) -> Result<Notification, MarketplaceError> {
        let notification = Notification {
            id: new_record_id(),
            report_id: report.id.clone(),
            photographer_id: report.photographer_id.clone(),
            reporter_id: report.reporter_id.clone(),
            admin_action: action,
            message,
            timestamp: Utc::now(),
        };
        Ok(self
            .store
            .bounded(self.store.notifications.append(notification))
            .await?)
    }

    pub async fn for_reporter(&self, user_id: &str) -> Result<Vec<Notification>, MarketplaceError> {
        Ok(self
            .store
            .bounded(self.store.notifications.list_for_reporter(user_id))
            .await?)
    }

    pub async fn for_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Notification>, MarketplaceError> {
        Ok(self
            .store
            .bounded(self.store.notifications.list_for_photographer(photographer_id))
            .await?)
    }
}

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use super::auth::Principal;
use super::domain::{
    new_record_id, AboutMe, ModerationAction, Notification, PhotographerProfile, PublicUser,
    Report, ReportReason, ReportReview, ReportStatus, ReportSubmission, Restriction, UserIdentity,
};
use super::error::MarketplaceError;
use super::notifications::NotificationService;
use super::reviews::ReviewService;
use crate::store::Store;

const DELETE_MESSAGE: &str = "Photographer permanently deleted from the platform.";
const DISMISS_MESSAGE: &str = "Report dismissed with no action taken.";

/// Pending report with the context an admin needs to decide on it.
///
/// Each related record is resolved independently; a missing one leaves its field `None`.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedReport {
    #[serde(flatten)]
    pub report: Report,
    pub reporter: Option<PublicUser>,
    pub photographer_user: Option<PublicUser>,
    pub photographer_profile: Option<PhotographerProfile>,
    pub about_me: Option<AboutMe>,
}

/// Report with the reporter's identity attached.
#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    pub report: Report,
    pub reporter: Option<UserIdentity>,
}

/// Result of a completed moderation decision.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationOutcome {
    pub message: String,
    pub notification_sent: bool,
    #[serde(skip)]
    pub report: Report,
    #[serde(skip)]
    pub notification: Notification,
}

/// Report intake and the admin moderation workflow.
#[derive(Clone)]
pub struct ReportService {
    store: Store,
    notifications: NotificationService,
    reviews: ReviewService,
}

impl ReportService {
    pub fn new(store: Store, notifications: NotificationService, reviews: ReviewService) -> Self {
        Self {
            store,
            notifications,
            reviews,
        }
    }

    pub fn reasons(&self) -> Vec<&'static str> {
        ReportReason::labels()
    }

    /// File a report against a photographer. Repeat reports from the same reporter are allowed.
    pub async fn submit(&self, submission: ReportSubmission) -> Result<Report, MarketplaceError> {
        let reason = ReportReason::from_label(&submission.reason)
            .ok_or_else(|| MarketplaceError::InvalidArgument("Invalid report reason".to_string()))?;

        let report = Report {
            id: new_record_id(),
            reporter_id: submission.user_id,
            photographer_id: submission.photographer_id,
            reason,
            description: submission.description,
            status: ReportStatus::Pending,
            admin_action: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };

        let stored = self.store.bounded(self.store.reports.insert(report)).await?;
        info!(
            report_id = %stored.id,
            photographer_id = %stored.photographer_id,
            reason = stored.reason.label(),
            "report submitted"
        );
        Ok(stored)
    }

    /// Pending reports in store order, each joined with reporter and photographer context.
    pub async fn pending(
        &self,
        principal: &Principal,
    ) -> Result<Vec<EnrichedReport>, MarketplaceError> {
        principal.require_admin()?;
        let pending = self
            .store
            .bounded(self.store.reports.list_by_status(ReportStatus::Pending))
            .await?;

        let mut enriched = Vec::with_capacity(pending.len());
        for report in pending {
            enriched.push(self.enrich(report).await?);
        }
        Ok(enriched)
    }

    async fn enrich(&self, report: Report) -> Result<EnrichedReport, MarketplaceError> {
        let store = &self.store;
        let (reporter, photographer_user, photographer_profile, about_me) = tokio::try_join!(
            store.bounded(store.users.get(&report.reporter_id)),
            store.bounded(store.users.get(&report.photographer_id)),
            store.bounded(store.profiles.get_by_user(&report.photographer_id)),
            store.bounded(store.about_me.get_by_user(&report.photographer_id)),
        )?;

        Ok(EnrichedReport {
            reporter: reporter.map(|user| user.public()),
            photographer_user: photographer_user.map(|user| user.public()),
            photographer_profile,
            about_me,
            report,
        })
    }

    /// Every report filed against a photographer, regardless of status.
    pub async fn reports_for(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<ReportView>, MarketplaceError> {
        let reports = self
            .store
            .bounded(self.store.reports.list_by_photographer(photographer_id))
            .await?;
        self.attach_reporters(reports).await
    }

    pub(crate) async fn attach_reporters(
        &self,
        reports: Vec<Report>,
    ) -> Result<Vec<ReportView>, MarketplaceError> {
        let mut views = Vec::with_capacity(reports.len());
        for report in reports {
            let reporter = self
                .store
                .bounded(self.store.users.get(&report.reporter_id))
                .await?
                .map(|user| user.identity());
            views.push(ReportView { report, reporter });
        }
        Ok(views)
    }

    /// Apply an admin verdict to a pending report.
    ///
    /// The report is claimed with a compare-and-set on its status before any side effect runs, so
    /// concurrent decisions on one report yield exactly one transition and one notification.
    /// Already reviewed reports are rejected with `Conflict`.
    pub async fn moderate(
        &self,
        report_id: &str,
        action: &str,
        admin_id: &str,
    ) -> Result<ModerationOutcome, MarketplaceError> {
        let action = ModerationAction::parse(action).ok_or_else(|| {
            MarketplaceError::InvalidArgument(
                "Invalid action. Must be one of restrict, delete, dismiss".to_string(),
            )
        })?;

        let current = self
            .store
            .bounded(self.store.reports.get(report_id))
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("Report not found".to_string()))?;
        if current.status == ReportStatus::Reviewed {
            warn!(report_id, "attempt to moderate an already reviewed report");
            return Err(already_reviewed());
        }

        let review = ReportReview {
            action,
            reviewed_by: admin_id.to_string(),
            reviewed_at: Utc::now(),
        };
        let claimed = self
            .store
            .bounded(
                self.store
                    .reports
                    .transition(report_id, ReportStatus::Pending, review),
            )
            .await?;
        let Some(report) = claimed else {
            warn!(report_id, "report was moderated concurrently");
            return Err(already_reviewed());
        };

        let message = match self.apply(action, &report).await {
            Ok(message) => message,
            Err(err) => {
                error!(
                    report_id,
                    action = action.label(),
                    error = %err,
                    "report marked reviewed but moderation action failed"
                );
                return Err(err);
            }
        };

        let notification = match self
            .notifications
            .record(&report, action, message.clone())
            .await
        {
            Ok(notification) => notification,
            Err(err) => {
                error!(
                    report_id,
                    action = action.label(),
                    error = %err,
                    "moderation applied but notification was not recorded"
                );
                return Err(err);
            }
        };

        info!(
            report_id,
            action = action.label(),
            admin_id,
            photographer_id = %report.photographer_id,
            "report moderated"
        );

        Ok(ModerationOutcome {
            message: format!("Report reviewed successfully: {message}"),
            notification_sent: true,
            report,
            notification,
        })
    }

    async fn apply(
        &self,
        action: ModerationAction,
        report: &Report,
    ) -> Result<String, MarketplaceError> {
        let photographer_id = report.photographer_id.as_str();
        match action {
            ModerationAction::Delete => {
                // Packages, reviews, and reports keep their references to the removed account.
                let user_removed = self
                    .store
                    .bounded(self.store.users.delete(photographer_id))
                    .await?;
                let profile_removed = self
                    .store
                    .bounded(self.store.profiles.delete_by_user(photographer_id))
                    .await?;
                let portfolio_removed = self
                    .store
                    .bounded(self.store.portfolio.delete_by_photographer(photographer_id))
                    .await?;
                self.reviews.forget(photographer_id);
                info!(
                    photographer_id,
                    user_removed, profile_removed, portfolio_removed, "photographer deleted"
                );
                Ok(DELETE_MESSAGE.to_string())
            }
            ModerationAction::Restrict => {
                let reason = report.reason.label();
                let restriction = Restriction {
                    reason: reason.to_string(),
                    restricted_at: Utc::now(),
                };
                let restricted = self
                    .store
                    .bounded(self.store.users.restrict(photographer_id, restriction))
                    .await?;
                if !restricted {
                    warn!(photographer_id, "restriction target no longer exists");
                }
                Ok(format!(
                    "Photographer temporarily restricted due to: {reason}"
                ))
            }
            ModerationAction::Dismiss => Ok(DISMISS_MESSAGE.to_string()),
        }
    }
}

fn already_reviewed() -> MarketplaceError {
    MarketplaceError::Conflict("Report has already been reviewed".to_string())
}

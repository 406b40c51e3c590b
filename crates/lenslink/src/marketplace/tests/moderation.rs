use std::sync::Arc;

use super::common::*;
use crate::marketplace::domain::{ModerationAction, ReportStatus, ReviewSubmission, Role};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::Marketplace;

#[tokio::test]
async fn restrict_marks_photographer_and_notifies_both_parties() {
    let (market, store) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Spam or Scam").await;

    let outcome = market
        .reports
        .moderate(&report.id, "restrict", &admin.id)
        .await
        .expect("moderation succeeds");

    assert_eq!(
        outcome.message,
        "Report reviewed successfully: Photographer temporarily restricted due to: Spam or Scam"
    );
    assert!(outcome.notification_sent);
    assert_eq!(outcome.report.status, ReportStatus::Reviewed);
    assert_eq!(outcome.report.admin_action, Some(ModerationAction::Restrict));
    assert_eq!(outcome.report.reviewed_by.as_deref(), Some(admin.id.as_str()));
    assert!(outcome.report.reviewed_at.is_some());

    let user = store
        .users
        .get(&photographer.id)
        .await
        .unwrap()
        .expect("photographer still exists");
    let restriction = user.restriction.expect("restriction recorded");
    assert_eq!(restriction.reason, "Spam or Scam");

    let for_reporter = market.notifications.for_reporter(&client.id).await.unwrap();
    let for_photographer = market
        .notifications
        .for_photographer(&photographer.id)
        .await
        .unwrap();
    assert_eq!(for_reporter.len(), 1);
    assert_eq!(for_reporter, for_photographer);
    assert_eq!(
        for_reporter[0].message,
        "Photographer temporarily restricted due to: Spam or Scam"
    );
    assert_eq!(for_reporter[0].admin_action, ModerationAction::Restrict);
    assert_eq!(for_reporter[0].report_id, report.id);

    match market.guard.ensure_not_restricted(&photographer.id).await {
        Err(MarketplaceError::Forbidden(message)) => {
            assert_eq!(message, "Account restricted by admin: Spam or Scam")
        }
        other => panic!("expected restriction, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_removes_account_profile_and_portfolio_only() {
    let (market, store) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    market
        .catalog
        .create_package(&photographer, package_draft())
        .await
        .expect("package created");
    let report = file_report(&market, &client, &photographer, "Fake Profile").await;

    let outcome = market
        .reports
        .moderate(&report.id, "delete", &admin.id)
        .await
        .expect("moderation succeeds");
    assert_eq!(
        outcome.notification.message,
        "Photographer permanently deleted from the platform."
    );

    assert!(store.users.get(&photographer.id).await.unwrap().is_none());
    assert!(store
        .profiles
        .get_by_user(&photographer.id)
        .await
        .unwrap()
        .is_none());
    assert!(market
        .catalog
        .portfolio_for(&photographer.id)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        market.catalog.packages_for(&photographer.id).await.unwrap().len(),
        1
    );

    let reports = market.reports.reports_for(&photographer.id).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report.status, ReportStatus::Reviewed);
    assert_eq!(
        market
            .notifications
            .for_photographer(&photographer.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn delete_drops_the_cached_rating_tally() {
    let (market, _store) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    market
        .reviews
        .submit(ReviewSubmission {
            photographer_id: photographer.id.clone(),
            user_id: client.id.clone(),
            rating: 2,
            review_text: None,
        })
        .await
        .expect("review recorded");
    assert!(market.reviews.tracks(&photographer.id));

    let report = file_report(&market, &client, &photographer, "Fake Profile").await;
    market
        .reports
        .moderate(&report.id, "delete", &admin.id)
        .await
        .expect("moderation succeeds");

    assert!(!market.reviews.tracks(&photographer.id));
    assert_eq!(
        market.reviews.reviews_for(&photographer.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn dismiss_leaves_photographer_untouched() {
    let (market, store) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Other").await;

    let outcome = market
        .reports
        .moderate(&report.id, "dismiss", &admin.id)
        .await
        .expect("moderation succeeds");

    assert_eq!(
        outcome.message,
        "Report reviewed successfully: Report dismissed with no action taken."
    );
    let user = store.users.get(&photographer.id).await.unwrap().unwrap();
    assert!(!user.is_restricted());
    assert!(market.guard.ensure_not_restricted(&photographer.id).await.is_ok());
    assert!(market.reports.pending(&admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn reviewed_reports_cannot_be_moderated_again() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Harassment or Bullying").await;

    market
        .reports
        .moderate(&report.id, "dismiss", &admin.id)
        .await
        .expect("first decision");
    let second = market
        .reports
        .moderate(&report.id, "delete", &admin.id)
        .await;

    assert!(matches!(second, Err(MarketplaceError::Conflict(_))));
    let views = market.reports.reports_for(&photographer.id).await.unwrap();
    assert_eq!(views[0].report.admin_action, Some(ModerationAction::Dismiss));
    assert_eq!(
        market.notifications.for_reporter(&client.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn invalid_action_and_unknown_report_leave_state_unchanged() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Nudity or Pornographic Content").await;

    let invalid = market.reports.moderate(&report.id, "ban", &admin.id).await;
    assert!(matches!(invalid, Err(MarketplaceError::InvalidArgument(_))));

    let missing = market
        .reports
        .moderate("no-such-report", "restrict", &admin.id)
        .await;
    match missing {
        Err(MarketplaceError::NotFound(message)) => assert_eq!(message, "Report not found"),
        other => panic!("expected not found, got {other:?}"),
    }

    let pending = market.reports.pending(&admin).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].report.status, ReportStatus::Pending);
    assert!(market
        .notifications
        .for_reporter(&client.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decisions_produce_a_single_transition() {
    let (market, _) = marketplace();
    let market = Arc::new(market);
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Spam or Scam").await;

    let mut handles = Vec::new();
    for action in ["restrict", "dismiss", "delete", "restrict"] {
        let market: Arc<Marketplace> = market.clone();
        let report_id = report.id.clone();
        let admin_id = admin.id.clone();
        handles.push(tokio::spawn(async move {
            market.reports.moderate(&report_id, action, &admin_id).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.expect("task joins") {
            Ok(_) => succeeded += 1,
            Err(MarketplaceError::Conflict(_)) => {}
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(
        market.notifications.for_reporter(&client.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn notification_failure_is_reported_after_side_effects() {
    let store = store_without_notifications();
    let market = Marketplace::new(store.clone());
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let report = file_report(&market, &client, &photographer, "Abusive Language").await;

    let result = market
        .reports
        .moderate(&report.id, "restrict", &admin.id)
        .await;
    assert!(matches!(result, Err(MarketplaceError::Internal(_))));

    let stored = store.reports.get(&report.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReportStatus::Reviewed);
    let user = store.users.get(&photographer.id).await.unwrap().unwrap();
    assert!(user.is_restricted());
}

#[tokio::test]
async fn pending_reports_carry_context_and_tolerate_missing_records() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let ghost = crate::marketplace::auth::Principal {
        id: "ghost-reporter".to_string(),
        role: Role::User,
        restricted: false,
    };
    file_report(&market, &client, &photographer, "Spam or Scam").await;
    file_report(&market, &ghost, &photographer, "Other").await;

    let pending = market.reports.pending(&admin).await.expect("admin lists");
    assert_eq!(pending.len(), 2);

    let known = &pending[0];
    assert_eq!(
        known.reporter.as_ref().map(|user| user.id.as_str()),
        Some(client.id.as_str())
    );
    assert!(known.photographer_user.is_some());
    assert!(known.photographer_profile.is_some());
    assert!(known.about_me.is_none());

    assert!(pending[1].reporter.is_none());
    assert!(pending[1].photographer_user.is_some());

    let denied = market.reports.pending(&client).await;
    assert!(matches!(denied, Err(MarketplaceError::Forbidden(_))));
}

#[tokio::test]
async fn submission_validates_reason_and_allows_repeats() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;

    assert_eq!(market.reports.reasons().len(), 15);

    let err = market
        .reports
        .submit(crate::marketplace::domain::ReportSubmission {
            user_id: client.id.clone(),
            photographer_id: photographer.id.clone(),
            reason: "spam or scam".to_string(),
            description: None,
        })
        .await
        .expect_err("reason must match exactly");
    assert_eq!(err.to_string(), "Invalid report reason");

    let first = file_report(&market, &client, &photographer, "Spam or Scam").await;
    let second = file_report(&market, &client, &photographer, "Spam or Scam").await;
    assert_ne!(first.id, second.id);
    assert_eq!(first.status, ReportStatus::Pending);
    assert!(first.admin_action.is_none());
    assert_eq!(market.reports.pending(&admin).await.unwrap().len(), 2);
}

use super::common::*;
use crate::marketplace::domain::{BookingDraft, BookingStatus, ReviewSubmission, Role};
use crate::marketplace::error::MarketplaceError;

fn booking_draft(photographer_id: &str, package_id: &str) -> BookingDraft {
    BookingDraft {
        photographer_id: photographer_id.to_string(),
        package_id: package_id.to_string(),
        booking_date: "2026-11-14".to_string(),
        booking_time: "15:00".to_string(),
        location: "Botanic Garden".to_string(),
        message: "Small ceremony, about forty guests".to_string(),
    }
}

#[tokio::test]
async fn bookings_are_visible_to_both_parties_with_context() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let package = market
        .catalog
        .create_package(&photographer, package_draft())
        .await
        .unwrap();

    assert!(matches!(
        market
            .bookings
            .create(&photographer, booking_draft(&photographer.id, &package.id))
            .await,
        Err(MarketplaceError::Forbidden(_))
    ));
    let booking = market
        .bookings
        .create(&client, booking_draft(&photographer.id, &package.id))
        .await
        .expect("client books");
    assert_eq!(booking.status, BookingStatus::Pending);

    let mine = market.bookings.mine(&client).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].package.as_ref(), Some(&package));
    assert!(mine[0].photographer_profile.is_some());

    let received = market.bookings.mine(&photographer).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0].user.as_ref().map(|u| u.email.as_str()),
        Some("client@lens.test")
    );

    match market.bookings.mine(&admin).await {
        Err(MarketplaceError::Forbidden(message)) => {
            assert_eq!(message, "Invalid role for this endpoint")
        }
        other => panic!("expected forbidden, got {other:?}"),
    }
    assert_eq!(market.bookings.all(&admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn status_changes_are_limited_to_the_parties() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let rival = register(&market, "rival@lens.test", Role::Photographer).await;
    let booking = market
        .bookings
        .create(&client, booking_draft(&photographer.id, "pkg-missing"))
        .await
        .unwrap();

    assert!(matches!(
        market
            .bookings
            .set_status(&rival, &booking.id, "approved")
            .await,
        Err(MarketplaceError::Forbidden(_))
    ));
    assert!(matches!(
        market
            .bookings
            .set_status(&photographer, &booking.id, "maybe")
            .await,
        Err(MarketplaceError::InvalidArgument(_))
    ));
    assert!(matches!(
        market
            .bookings
            .set_status(&photographer, "missing", "approved")
            .await,
        Err(MarketplaceError::NotFound(_))
    ));

    let approved = market
        .bookings
        .set_status(&photographer, &booking.id, "approved")
        .await
        .unwrap();
    assert_eq!(approved.status, BookingStatus::Approved);
    let cancelled = market
        .bookings
        .set_status(&client, &booking.id, "cancelled")
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let views = market.bookings.all(&admin).await.unwrap();
    assert!(views[0].package.is_none());
}

#[tokio::test]
async fn stats_count_accounts_profiles_and_bookings() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    let newcomer = register(&market, "new@lens.test", Role::Photographer).await;
    market
        .profiles
        .create(&newcomer, profile_draft())
        .await
        .unwrap();
    let first = market
        .bookings
        .create(&client, booking_draft(&photographer.id, "pkg"))
        .await
        .unwrap();
    market
        .bookings
        .create(&client, booking_draft(&photographer.id, "pkg"))
        .await
        .unwrap();
    market
        .bookings
        .set_status(&photographer, &first.id, "approved")
        .await
        .unwrap();

    let stats = market.insights.stats(&admin).await.expect("admin stats");
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_photographers, 2);
    assert_eq!(stats.pending_photographers, 1);
    assert_eq!(stats.approved_photographers, 1);
    assert_eq!(stats.total_bookings, 2);
    assert_eq!(stats.pending_bookings, 1);

    assert!(matches!(
        market.insights.stats(&client).await,
        Err(MarketplaceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn photographer_dossier_collects_every_section() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;
    market
        .catalog
        .create_package(&photographer, package_draft())
        .await
        .unwrap();
    market
        .reviews
        .submit(ReviewSubmission {
            photographer_id: photographer.id.clone(),
            user_id: client.id.clone(),
            rating: 5,
            review_text: None,
        })
        .await
        .unwrap();
    file_report(&market, &client, &photographer, "Copyright Violation").await;

    let dossier = market
        .insights
        .photographer_full(&admin, &photographer.id)
        .await
        .expect("admin dossier");
    assert!(dossier.user.is_some());
    assert_eq!(
        dossier.profile.as_ref().map(|p| p.average_rating),
        Some(5.0)
    );
    assert!(dossier.about_me.is_none());
    assert_eq!(dossier.portfolio.len(), 1);
    assert_eq!(dossier.packages.len(), 1);
    assert_eq!(dossier.reviews.len(), 1);
    assert_eq!(dossier.reports.len(), 1);
    assert_eq!(
        dossier.reports[0].reporter.as_ref().map(|r| r.id.as_str()),
        Some(client.id.as_str())
    );

    let unknown = market
        .insights
        .photographer_full(&admin, "no-such-photographer")
        .await
        .expect("missing photographer degrades");
    assert!(unknown.user.is_none());
    assert!(unknown.reviews.is_empty());
}

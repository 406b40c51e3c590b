use std::sync::Arc;

use super::common::*;
use crate::marketplace::domain::{ReviewSubmission, Role};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::Marketplace;

fn review(photographer_id: &str, user_id: &str, rating: u8) -> ReviewSubmission {
    ReviewSubmission {
        photographer_id: photographer_id.to_string(),
        user_id: user_id.to_string(),
        rating,
        review_text: Some(format!("{rating} stars")),
    }
}

#[tokio::test]
async fn average_tracks_new_and_replaced_reviews() {
    let (market, store) = marketplace();
    let Cast {
        client,
        photographer,
        ..
    } = cast(&market).await;
    let second = register(&market, "second@lens.test", Role::User).await;

    let receipt = market
        .reviews
        .submit(review(&photographer.id, &client.id, 4))
        .await
        .expect("first review");
    assert_eq!(receipt.message, "Review added successfully");
    assert_eq!(receipt.average_rating, 4.0);

    let receipt = market
        .reviews
        .submit(review(&photographer.id, &second.id, 5))
        .await
        .expect("second review");
    assert_eq!(receipt.average_rating, 4.5);

    let receipt = market
        .reviews
        .submit(review(&photographer.id, &client.id, 2))
        .await
        .expect("replacement");
    assert_eq!(receipt.message, "Review updated successfully");
    assert_eq!(receipt.average_rating, 3.5);

    let stored = market.reviews.reviews_for(&photographer.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    let profile = store
        .profiles
        .get_by_user(&photographer.id)
        .await
        .unwrap()
        .expect("profile exists");
    assert_eq!(profile.average_rating, 3.5);
}

#[tokio::test]
async fn ratings_outside_range_are_rejected() {
    let (market, _) = marketplace();
    let Cast {
        client,
        photographer,
        ..
    } = cast(&market).await;

    for rating in [0, 6] {
        let result = market
            .reviews
            .submit(review(&photographer.id, &client.id, rating))
            .await;
        assert!(matches!(result, Err(MarketplaceError::InvalidArgument(_))));
    }
    assert!(market
        .reviews
        .reviews_for(&photographer.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reviews_keep_the_aggregate_exact() {
    let (market, store) = marketplace();
    let market = Arc::new(market);
    let Cast { photographer, .. } = cast(&market).await;

    let mut reviewers = Vec::new();
    for index in 0..12 {
        let reviewer = register(&market, &format!("reviewer{index}@lens.test"), Role::User).await;
        reviewers.push(reviewer.id);
    }

    let mut handles = Vec::new();
    for (index, reviewer) in reviewers.iter().enumerate() {
        let market: Arc<Marketplace> = market.clone();
        let submission = review(&photographer.id, reviewer, (index % 5) as u8 + 1);
        handles.push(tokio::spawn(async move {
            market.reviews.submit(submission).await
        }));
    }
    for handle in handles {
        handle.await.expect("task joins").expect("review stored");
    }

    let ratings: Vec<u8> = (0..12).map(|index| (index % 5) as u8 + 1).collect();
    let expected = {
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        ((sum as f64 / ratings.len() as f64) * 100.0).round() / 100.0
    };
    let profile = store
        .profiles
        .get_by_user(&photographer.id)
        .await
        .unwrap()
        .expect("profile exists");
    assert_eq!(profile.average_rating, expected);
}

#[tokio::test]
async fn reviewer_identity_is_attached_when_available() {
    let (market, _) = marketplace();
    let Cast {
        admin,
        client,
        photographer,
    } = cast(&market).await;

    market
        .reviews
        .submit(review(&photographer.id, &client.id, 5))
        .await
        .unwrap();
    market
        .reviews
        .submit(review(&photographer.id, "departed-user", 3))
        .await
        .unwrap();

    let views = market.reviews.reviews_for(&photographer.id).await.unwrap();
    assert_eq!(views.len(), 2);
    let named = views
        .iter()
        .find(|view| view.review.user_id == client.id)
        .expect("client review");
    assert_eq!(
        named.reviewer.as_ref().map(|who| who.email.as_str()),
        Some("client@lens.test")
    );
    let orphan = views
        .iter()
        .find(|view| view.review.user_id == "departed-user")
        .expect("orphan review");
    assert!(orphan.reviewer.is_none());

    assert_eq!(market.reviews.all(&admin).await.unwrap().len(), 2);
    assert!(matches!(
        market.reviews.all(&client).await,
        Err(MarketplaceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn aggregate_seeds_from_reviews_written_before_first_touch() {
    let store = store();
    let seeded = Marketplace::new(store.clone());
    let Cast {
        client,
        photographer,
        ..
    } = cast(&seeded).await;
    seeded
        .reviews
        .submit(review(&photographer.id, &client.id, 1))
        .await
        .unwrap();

    // A fresh service over the same store has no tally yet and must rebuild it.
    let restarted = Marketplace::new(store.clone());
    let other = register(&restarted, "late@lens.test", Role::User).await;
    let receipt = restarted
        .reviews
        .submit(review(&photographer.id, &other.id, 5))
        .await
        .unwrap();
    assert_eq!(receipt.average_rating, 3.0);
}

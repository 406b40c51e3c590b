use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::auth::Principal;
use super::domain::{new_record_id, Review, ReviewSubmission, UserIdentity};
use super::error::MarketplaceError;
use crate::store::Store;

/// Running totals for one photographer's ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    pub sum: u64,
    pub count: u64,
}

impl RatingTally {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        ratings.into_iter().fold(Self::default(), |mut tally, rating| {
            tally.sum += u64::from(rating);
            tally.count += 1;
            tally
        })
    }

    fn record(&mut self, rating: u8, replaced: Option<u8>) {
        match replaced {
            Some(previous) => {
                self.sum = self.sum - u64::from(previous) + u64::from(rating);
            }
            None => {
                self.sum += u64::from(rating);
                self.count += 1;
            }
        }
    }

    /// Mean rounded to two decimals with ties to even; zero when there are no ratings.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.sum as f64 / self.count as f64;
        (mean * 100.0).round_ties_even() / 100.0
    }
}

/// Outcome returned to the reviewer.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReceipt {
    pub message: &'static str,
    pub average_rating: f64,
    #[serde(skip)]
    pub review: Review,
}

/// Review with the reviewer's identity attached when the account still exists.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub reviewer: Option<UserIdentity>,
}

/// `None` until the tally has been seeded from the stored reviews.
type Ledger = Arc<Mutex<Option<RatingTally>>>;

/// Review upserts and the per-photographer rating aggregate.
///
/// Writes for one photographer are serialized through that photographer's ledger lock, and the
/// aggregate is maintained incrementally instead of rescanning every review.
#[derive(Clone)]
pub struct ReviewService {
    store: Store,
    ledgers: Arc<DashMap<String, Ledger>>,
}

impl ReviewService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            ledgers: Arc::new(DashMap::new()),
        }
    }

    fn ledger(&self, photographer_id: &str) -> Ledger {
        self.ledgers
            .entry(photographer_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the cached tally for a removed photographer; a later review reseeds it from the store.
    pub(crate) fn forget(&self, photographer_id: &str) {
        self.ledgers.remove(photographer_id);
    }

    #[cfg(test)]
    pub(crate) fn tracks(&self, photographer_id: &str) -> bool {
        self.ledgers.contains_key(photographer_id)
    }

    pub async fn submit(
        &self,
        submission: ReviewSubmission,
    ) -> Result<ReviewReceipt, MarketplaceError> {
        let ReviewSubmission {
            photographer_id,
            user_id,
            rating,
            review_text,
        } = submission;

        if !(1..=5).contains(&rating) {
            return Err(MarketplaceError::InvalidArgument(
                "rating must be between 1 and 5".to_string(),
            ));
        }

        let ledger = self.ledger(&photographer_id);
        let mut slot = ledger.lock().await;

        let mut tally = match *slot {
            Some(tally) => tally,
            None => {
                let existing = self
                    .store
                    .bounded(self.store.reviews.list_by_photographer(&photographer_id))
                    .await?;
                debug!(%photographer_id, reviews = existing.len(), "seeding rating tally");
                RatingTally::from_ratings(existing.iter().map(|review| review.rating))
            }
        };
        // Keep the seed even if the write below fails; it still matches the stored reviews.
        *slot = Some(tally);

        let review = Review {
            id: new_record_id(),
            photographer_id: photographer_id.clone(),
            user_id,
            rating,
            review_text,
            created_at: Utc::now(),
        };
        let upsert = self.store.bounded(self.store.reviews.upsert(review)).await?;

        tally.record(rating, upsert.replaced_rating);
        *slot = Some(tally);

        let average_rating = tally.average();
        self.store
            .bounded(
                self.store
                    .profiles
                    .set_average_rating(&photographer_id, average_rating),
            )
            .await?;

        let message = if upsert.replaced_rating.is_some() {
            "Review updated successfully"
        } else {
            "Review added successfully"
        };
        info!(
            %photographer_id,
            reviews = tally.count,
            average_rating,
            "review recorded"
        );

        Ok(ReviewReceipt {
            message,
            average_rating,
            review: upsert.review,
        })
    }

    pub async fn reviews_for(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<ReviewView>, MarketplaceError> {
        let reviews = self
            .store
            .bounded(self.store.reviews.list_by_photographer(photographer_id))
            .await?;
        self.attach_reviewers(reviews).await
    }

    /// Every review on the platform, newest first.
    pub async fn all(&self, principal: &Principal) -> Result<Vec<ReviewView>, MarketplaceError> {
        principal.require_admin()?;
        let mut reviews = self.store.bounded(self.store.reviews.list()).await?;
        reviews.sort_by_key(|review| Reverse(review.created_at));
        self.attach_reviewers(reviews).await
    }

    pub(crate) async fn attach_reviewers(
        &self,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewView>, MarketplaceError> {
        let mut views = Vec::with_capacity(reviews.len());
        for review in reviews {
            let reviewer = self
                .store
                .bounded(self.store.users.get(&review.user_id))
                .await?
                .map(|user| user.identity());
            views.push(ReviewView { review, reviewer });
        }
        Ok(views)
    }
}

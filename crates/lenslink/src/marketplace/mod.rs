//! Marketplace services: accounts, photographer listings, catalog, bookings, reviews, and the
//! report moderation pipeline.
//!
//! Every service receives the same [`Store`] handle at construction; [`Marketplace`] wires them
//! together and is the shared state behind the HTTP router.

pub mod accounts;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod guard;
pub mod insights;
pub mod notifications;
pub mod profiles;
pub mod reports;
pub mod reviews;
pub mod router;

#[cfg(test)]
mod tests;

pub use accounts::AccountService;
pub use auth::{enforce_restrictions, Principal, PRINCIPAL_HEADER};
pub use bookings::{BookingService, BookingView};
pub use catalog::CatalogService;
pub use error::MarketplaceError;
pub use guard::RestrictionGuard;
pub use insights::{InsightsService, PhotographerDossier, PlatformStats};
pub use notifications::NotificationService;
pub use profiles::{ProfileListing, ProfileService};
pub use reports::{EnrichedReport, ModerationOutcome, ReportService, ReportView};
pub use reviews::{RatingTally, ReviewReceipt, ReviewService, ReviewView};
pub use router::marketplace_router;

use crate::store::Store;

/// All marketplace services over one store.
#[derive(Clone)]
pub struct Marketplace {
    pub accounts: AccountService,
    pub guard: RestrictionGuard,
    pub profiles: ProfileService,
    pub catalog: CatalogService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub reports: ReportService,
    pub notifications: NotificationService,
    pub insights: InsightsService,
}

impl Marketplace {
    pub fn new(store: Store) -> Self {
        let notifications = NotificationService::new(store.clone());
        let reviews = ReviewService::new(store.clone());
        let reports = ReportService::new(store.clone(), notifications.clone(), reviews.clone());
        let insights = InsightsService::new(store.clone(), reviews.clone(), reports.clone());

        Self {
            accounts: AccountService::new(store.clone()),
            guard: RestrictionGuard::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            bookings: BookingService::new(store),
            reviews,
            reports,
            notifications,
            insights,
        }
    }
}

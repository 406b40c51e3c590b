use serde::Serialize;
use tracing::warn;

use super::auth::Principal;
use super::domain::{
    AboutMe, ApprovalStatus, BookingStatus, Package, PhotographerProfile, PortfolioItem,
    PublicUser, Role,
};
use super::error::MarketplaceError;
use super::reports::{ReportService, ReportView};
use super::reviews::{ReviewService, ReviewView};
use crate::store::Store;

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_photographers: usize,
    pub pending_photographers: usize,
    pub approved_photographers: usize,
    pub total_bookings: usize,
    pub pending_bookings: usize,
}

/// Everything known about one photographer. Sections that fail to load are left empty.
#[derive(Debug, Clone, Serialize)]
pub struct PhotographerDossier {
    pub user: Option<PublicUser>,
    pub profile: Option<PhotographerProfile>,
    pub about_me: Option<AboutMe>,
    pub portfolio: Vec<PortfolioItem>,
    pub packages: Vec<Package>,
    pub reviews: Vec<ReviewView>,
    pub reports: Vec<ReportView>,
}

#[derive(Clone)]
pub struct InsightsService {
    store: Store,
    reviews: ReviewService,
    reports: ReportService,
}

impl InsightsService {
    pub fn new(store: Store, reviews: ReviewService, reports: ReportService) -> Self {
        Self {
            store,
            reviews,
            reports,
        }
    }

    pub async fn stats(&self, principal: &Principal) -> Result<PlatformStats, MarketplaceError> {
        principal.require_admin()?;
        let store = &self.store;
        let (
            total_users,
            total_photographers,
            pending_photographers,
            approved_photographers,
            total_bookings,
            pending_bookings,
        ) = tokio::try_join!(
            store.bounded(store.users.count_by_role(Role::User)),
            store.bounded(store.users.count_by_role(Role::Photographer)),
            store.bounded(store.profiles.count_by_status(ApprovalStatus::Pending)),
            store.bounded(store.profiles.count_by_status(ApprovalStatus::Approved)),
            store.bounded(store.bookings.count(None)),
            store.bounded(store.bookings.count(Some(BookingStatus::Pending))),
        )?;

        Ok(PlatformStats {
            total_users,
            total_photographers,
            pending_photographers,
            approved_photographers,
            total_bookings,
            pending_bookings,
        })
    }

    pub async fn photographer_full(
        &self,
        principal: &Principal,
        photographer_id: &str,
    ) -> Result<PhotographerDossier, MarketplaceError> {
        principal.require_admin()?;
        let store = &self.store;

        let user = async {
            store
                .bounded(store.users.get(photographer_id))
                .await
                .map(|user| user.map(|user| user.public()))
                .map_err(MarketplaceError::from)
        };
        let profile = async {
            store
                .bounded(store.profiles.get_by_user(photographer_id))
                .await
                .map_err(MarketplaceError::from)
        };
        let about_me = async {
            store
                .bounded(store.about_me.get_by_user(photographer_id))
                .await
                .map_err(MarketplaceError::from)
        };
        let portfolio = async {
            store
                .bounded(store.portfolio.list_by_photographer(photographer_id))
                .await
                .map_err(MarketplaceError::from)
        };
        let packages = async {
            store
                .bounded(store.packages.list_by_photographer(photographer_id))
                .await
                .map_err(MarketplaceError::from)
        };

        let (user, profile, about_me, portfolio, packages, reviews, reports) = tokio::join!(
            user,
            profile,
            about_me,
            portfolio,
            packages,
            self.reviews.reviews_for(photographer_id),
            self.reports.reports_for(photographer_id),
        );

        Ok(PhotographerDossier {
            user: degrade(photographer_id, "user", user),
            profile: degrade(photographer_id, "profile", profile),
            about_me: degrade(photographer_id, "about_me", about_me),
            portfolio: degrade(photographer_id, "portfolio", portfolio),
            packages: degrade(photographer_id, "packages", packages),
            reviews: degrade(photographer_id, "reviews", reviews),
            reports: degrade(photographer_id, "reports", reports),
        })
    }
}

fn degrade<T: Default>(
    photographer_id: &str,
    section: &'static str,
    loaded: Result<T, MarketplaceError>,
) -> T {
    loaded.unwrap_or_else(|err| {
        warn!(photographer_id, section, error = %err, "photographer section unavailable");
        T::default()
    })
}

//! Record store abstraction: one repository trait per collection plus the [`Store`] handle that
//! services receive at construction time.

mod memory;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::marketplace::domain::{
    AboutMe, ApprovalStatus, Booking, BookingStatus, Notification, Package, PhotographerProfile,
    PortfolioItem, Report, ReportReview, ReportStatus, Restriction, Review, Role, User,
};

pub use memory::MemoryStore;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: User) -> Result<User, StoreError>;
    /// Sets the restriction fields; returns `false` when the user does not exist.
    async fn restrict(&self, id: &str, restriction: Restriction) -> Result<bool, StoreError>;
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn count_by_role(&self, role: Role) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get_by_user(&self, user_id: &str) -> Result<Option<PhotographerProfile>, StoreError>;
    /// Fails with `Conflict` when the user already owns a profile.
    async fn insert(&self, profile: PhotographerProfile)
        -> Result<PhotographerProfile, StoreError>;
    async fn update(&self, profile: PhotographerProfile) -> Result<(), StoreError>;
    async fn set_average_rating(&self, user_id: &str, average: f64) -> Result<bool, StoreError>;
    async fn delete_by_user(&self, user_id: &str) -> Result<bool, StoreError>;
    async fn list_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<PhotographerProfile>, StoreError>;
    async fn count_by_status(&self, status: ApprovalStatus) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait AboutMeRepository: Send + Sync {
    async fn get_by_user(&self, user_id: &str) -> Result<Option<AboutMe>, StoreError>;
    async fn insert(&self, about: AboutMe) -> Result<AboutMe, StoreError>;
    async fn update(&self, about: AboutMe) -> Result<(), StoreError>;
    async fn delete_by_user(&self, user_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn insert(&self, item: PortfolioItem) -> Result<PortfolioItem, StoreError>;
    async fn list_by_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<PortfolioItem>, StoreError>;
    /// Deletes only when the item belongs to `photographer_id`.
    async fn delete(&self, id: &str, photographer_id: &str) -> Result<bool, StoreError>;
    async fn delete_by_photographer(&self, photographer_id: &str) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn insert(&self, package: Package) -> Result<Package, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Package>, StoreError>;
    async fn list_by_photographer(&self, photographer_id: &str)
        -> Result<Vec<Package>, StoreError>;
    async fn delete(&self, id: &str, photographer_id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: Booking) -> Result<Booking, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Booking>, StoreError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;
    async fn list_for_photographer(&self, photographer_id: &str)
        -> Result<Vec<Booking>, StoreError>;
    async fn list(&self) -> Result<Vec<Booking>, StoreError>;
    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError>;
    async fn count(&self, status: Option<BookingStatus>) -> Result<usize, StoreError>;
}

/// Result of writing a review keyed by (photographer, reviewer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpsert {
    pub review: Review,
    /// Rating of the review that was overwritten, if any.
    pub replaced_rating: Option<u8>,
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Overwrites rating, text, and timestamp of an existing pair in place; inserts otherwise.
    async fn upsert(&self, review: Review) -> Result<ReviewUpsert, StoreError>;
    async fn list_by_photographer(&self, photographer_id: &str) -> Result<Vec<Review>, StoreError>;
    async fn list(&self) -> Result<Vec<Review>, StoreError>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn insert(&self, report: Report) -> Result<Report, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError>;
    async fn list_by_status(&self, status: ReportStatus) -> Result<Vec<Report>, StoreError>;
    async fn list_by_photographer(&self, photographer_id: &str) -> Result<Vec<Report>, StoreError>;
    /// Atomically moves the report to `Reviewed` only if its status still equals `from`.
    ///
    /// Returns `None` when the report is missing or another writer already moved it.
    async fn transition(
        &self,
        id: &str,
        from: ReportStatus,
        review: ReportReview,
    ) -> Result<Option<Report>, StoreError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn append(&self, notification: Notification) -> Result<Notification, StoreError>;
    async fn list_for_reporter(&self, reporter_id: &str) -> Result<Vec<Notification>, StoreError>;
    async fn list_for_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Notification>, StoreError>;
}

/// Handle bundling every collection. Owned by the process entry point and cloned into services.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub about_me: Arc<dyn AboutMeRepository>,
    pub portfolio: Arc<dyn PortfolioRepository>,
    pub packages: Arc<dyn PackageRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    timeout: Duration,
}

impl Store {
    /// Every collection served by one in-memory backend.
    pub fn in_memory(config: &StoreConfig) -> Self {
        Self::from_backend(Arc::new(MemoryStore::default()), config)
    }

    pub fn from_backend<B>(backend: Arc<B>, config: &StoreConfig) -> Self
    where
        B: UserRepository
            + ProfileRepository
            + AboutMeRepository
            + PortfolioRepository
            + PackageRepository
            + BookingRepository
            + ReviewRepository
            + ReportRepository
            + NotificationRepository
            + 'static,
    {
        Self {
            users: backend.clone(),
            profiles: backend.clone(),
            about_me: backend.clone(),
            portfolio: backend.clone(),
            packages: backend.clone(),
            bookings: backend.clone(),
            reviews: backend.clone(),
            reports: backend.clone(),
            notifications: backend,
            timeout: config.timeout,
        }
    }

    /// Run a single store call under the configured deadline.
    pub async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

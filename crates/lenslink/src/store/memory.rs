use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    AboutMeRepository, BookingRepository, NotificationRepository, PackageRepository,
    PortfolioRepository, ProfileRepository, ReportRepository, ReviewRepository, ReviewUpsert,
    StoreError, UserRepository,
};
use crate::marketplace::domain::{
    AboutMe, ApprovalStatus, Booking, BookingStatus, Notification, Package, PhotographerProfile,
    PortfolioItem, Report, ReportReview, ReportStatus, Restriction, Review, Role, User,
};

/// Process-local backend. Collections are vectors so listings keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    profiles: Mutex<Vec<PhotographerProfile>>,
    about_me: Mutex<Vec<AboutMe>>,
    portfolio: Mutex<Vec<PortfolioItem>>,
    packages: Mutex<Vec<Package>>,
    bookings: Mutex<Vec<Booking>>,
    reviews: Mutex<Vec<Review>>,
    reports: Mutex<Vec<Report>>,
    notifications: Mutex<Vec<Notification>>,
}

fn lock<T>(collection: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    collection
        .lock()
        .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
}

fn select<T, P>(collection: &Mutex<Vec<T>>, predicate: P) -> Result<Vec<T>, StoreError>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    Ok(lock(collection)?
        .iter()
        .filter(|record| predicate(record))
        .cloned()
        .collect())
}

fn remove_where<T, P>(collection: &Mutex<Vec<T>>, predicate: P) -> Result<usize, StoreError>
where
    P: Fn(&T) -> bool,
{
    let mut guard = lock(collection)?;
    let before = guard.len();
    guard.retain(|record| !predicate(record));
    Ok(before - guard.len())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut guard = lock(&self.users)?;
        if guard
            .iter()
            .any(|u| u.id == user.id || u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict);
        }
        guard.push(user.clone());
        Ok(user)
    }

    async fn restrict(&self, id: &str, restriction: Restriction) -> Result<bool, StoreError> {
        let mut guard = lock(&self.users)?;
        match guard.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.restriction = Some(restriction);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(remove_where(&self.users, |u: &User| u.id == id)? > 0)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(lock(&self.users)?.clone())
    }

    async fn count_by_role(&self, role: Role) -> Result<usize, StoreError> {
        Ok(lock(&self.users)?.iter().filter(|u| u.role == role).count())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get_by_user(&self, user_id: &str) -> Result<Option<PhotographerProfile>, StoreError> {
        Ok(lock(&self.profiles)?
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        profile: PhotographerProfile,
    ) -> Result<PhotographerProfile, StoreError> {
        let mut guard = lock(&self.profiles)?;
        if guard.iter().any(|p| p.user_id == profile.user_id) {
            return Err(StoreError::Conflict);
        }
        guard.push(profile.clone());
        Ok(profile)
    }

    async fn update(&self, profile: PhotographerProfile) -> Result<(), StoreError> {
        let mut guard = lock(&self.profiles)?;
        let slot = guard
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or(StoreError::NotFound)?;
        *slot = profile;
        Ok(())
    }

    async fn set_average_rating(&self, user_id: &str, average: f64) -> Result<bool, StoreError> {
        let mut guard = lock(&self.profiles)?;
        match guard.iter_mut().find(|p| p.user_id == user_id) {
            Some(profile) => {
                profile.average_rating = average;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(remove_where(&self.profiles, |p: &PhotographerProfile| p.user_id == user_id)? > 0)
    }

    async fn list_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<PhotographerProfile>, StoreError> {
        select(&self.profiles, |p| p.approval_status == status)
    }

    async fn count_by_status(&self, status: ApprovalStatus) -> Result<usize, StoreError> {
        Ok(lock(&self.profiles)?
            .iter()
            .filter(|p| p.approval_status == status)
            .count())
    }
}

#[async_trait]
impl AboutMeRepository for MemoryStore {
    async fn get_by_user(&self, user_id: &str) -> Result<Option<AboutMe>, StoreError> {
        Ok(lock(&self.about_me)?
            .iter()
            .find(|a| a.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, about: AboutMe) -> Result<AboutMe, StoreError> {
        let mut guard = lock(&self.about_me)?;
        if guard.iter().any(|a| a.user_id == about.user_id) {
            return Err(StoreError::Conflict);
        }
        guard.push(about.clone());
        Ok(about)
    }

    async fn update(&self, about: AboutMe) -> Result<(), StoreError> {
        let mut guard = lock(&self.about_me)?;
        let slot = guard
            .iter_mut()
            .find(|a| a.id == about.id)
            .ok_or(StoreError::NotFound)?;
        *slot = about;
        Ok(())
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(remove_where(&self.about_me, |a: &AboutMe| a.user_id == user_id)? > 0)
    }
}

#[async_trait]
impl PortfolioRepository for MemoryStore {
    async fn insert(&self, item: PortfolioItem) -> Result<PortfolioItem, StoreError> {
        lock(&self.portfolio)?.push(item.clone());
        Ok(item)
    }

    async fn list_by_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<PortfolioItem>, StoreError> {
        select(&self.portfolio, |i| i.photographer_id == photographer_id)
    }

    async fn delete(&self, id: &str, photographer_id: &str) -> Result<bool, StoreError> {
        let removed = remove_where(&self.portfolio, |i: &PortfolioItem| {
            i.id == id && i.photographer_id == photographer_id
        })?;
        Ok(removed > 0)
    }

    async fn delete_by_photographer(&self, photographer_id: &str) -> Result<usize, StoreError> {
        remove_where(&self.portfolio, |i: &PortfolioItem| {
            i.photographer_id == photographer_id
        })
    }
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn insert(&self, package: Package) -> Result<Package, StoreError> {
        lock(&self.packages)?.push(package.clone());
        Ok(package)
    }

    async fn get(&self, id: &str) -> Result<Option<Package>, StoreError> {
        Ok(lock(&self.packages)?.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Package>, StoreError> {
        select(&self.packages, |p| p.photographer_id == photographer_id)
    }

    async fn delete(&self, id: &str, photographer_id: &str) -> Result<bool, StoreError> {
        let removed = remove_where(&self.packages, |p: &Package| {
            p.id == id && p.photographer_id == photographer_id
        })?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: Booking) -> Result<Booking, StoreError> {
        lock(&self.bookings)?.push(booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(lock(&self.bookings)?.iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        select(&self.bookings, |b| b.user_id == user_id)
    }

    async fn list_for_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Booking>, StoreError> {
        select(&self.bookings, |b| b.photographer_id == photographer_id)
    }

    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(lock(&self.bookings)?.clone())
    }

    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StoreError> {
        let mut guard = lock(&self.bookings)?;
        Ok(guard.iter_mut().find(|b| b.id == id).map(|booking| {
            booking.status = status;
            booking.clone()
        }))
    }

    async fn count(&self, status: Option<BookingStatus>) -> Result<usize, StoreError> {
        Ok(lock(&self.bookings)?
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .count())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn upsert(&self, review: Review) -> Result<ReviewUpsert, StoreError> {
        let mut guard = lock(&self.reviews)?;
        let existing = guard.iter_mut().find(|r| {
            r.photographer_id == review.photographer_id && r.user_id == review.user_id
        });

        match existing {
            Some(stored) => {
                let replaced_rating = Some(stored.rating);
                stored.rating = review.rating;
                stored.review_text = review.review_text;
                stored.created_at = review.created_at;
                Ok(ReviewUpsert {
                    review: stored.clone(),
                    replaced_rating,
                })
            }
            None => {
                guard.push(review.clone());
                Ok(ReviewUpsert {
                    review,
                    replaced_rating: None,
                })
            }
        }
    }

    async fn list_by_photographer(&self, photographer_id: &str) -> Result<Vec<Review>, StoreError> {
        select(&self.reviews, |r| r.photographer_id == photographer_id)
    }

    async fn list(&self) -> Result<Vec<Review>, StoreError> {
        Ok(lock(&self.reviews)?.clone())
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn insert(&self, report: Report) -> Result<Report, StoreError> {
        let mut guard = lock(&self.reports)?;
        if guard.iter().any(|r| r.id == report.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(report.clone());
        Ok(report)
    }

    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(lock(&self.reports)?.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_status(&self, status: ReportStatus) -> Result<Vec<Report>, StoreError> {
        select(&self.reports, |r| r.status == status)
    }

    async fn list_by_photographer(&self, photographer_id: &str) -> Result<Vec<Report>, StoreError> {
        select(&self.reports, |r| r.photographer_id == photographer_id)
    }

    async fn transition(
        &self,
        id: &str,
        from: ReportStatus,
        review: ReportReview,
    ) -> Result<Option<Report>, StoreError> {
        let mut guard = lock(&self.reports)?;
        let Some(report) = guard.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if report.status != from {
            return Ok(None);
        }

        report.status = ReportStatus::Reviewed;
        report.admin_action = Some(review.action);
        report.reviewed_by = Some(review.reviewed_by);
        report.reviewed_at = Some(review.reviewed_at);
        Ok(Some(report.clone()))
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn append(&self, notification: Notification) -> Result<Notification, StoreError> {
        lock(&self.notifications)?.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_reporter(&self, reporter_id: &str) -> Result<Vec<Notification>, StoreError> {
        select(&self.notifications, |n| n.reporter_id == reporter_id)
    }

    async fn list_for_photographer(
        &self,
        photographer_id: &str,
    ) -> Result<Vec<Notification>, StoreError> {
        select(&self.notifications, |n| n.photographer_id == photographer_id)
    }
}

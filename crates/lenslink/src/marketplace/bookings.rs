use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::auth::Principal;
use super::domain::{
    new_record_id, Booking, BookingDraft, BookingStatus, Package, PhotographerProfile, PublicUser,
    Role,
};
use super::error::MarketplaceError;
use crate::store::Store;

/// Booking joined with the parties and package it references. Missing records stay `None`.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub booking: Booking,
    pub photographer: Option<PublicUser>,
    pub photographer_profile: Option<PhotographerProfile>,
    pub user: Option<PublicUser>,
    pub package: Option<Package>,
}

#[derive(Clone)]
pub struct BookingService {
    store: Store,
}

impl BookingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        draft: BookingDraft,
    ) -> Result<Booking, MarketplaceError> {
        principal.require_role(Role::User, "Only users can create bookings")?;

        let booking = Booking {
            id: new_record_id(),
            user_id: principal.id.clone(),
            photographer_id: draft.photographer_id,
            package_id: draft.package_id,
            booking_date: draft.booking_date,
            booking_time: draft.booking_time,
            location: draft.location,
            message: draft.message,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };
        let stored = self.store.bounded(self.store.bookings.insert(booking)).await?;
        info!(booking_id = %stored.id, photographer_id = %stored.photographer_id, "booking requested");
        Ok(stored)
    }

    /// Bookings made by a client, or received by a photographer.
    pub async fn mine(&self, principal: &Principal) -> Result<Vec<BookingView>, MarketplaceError> {
        let bookings = match principal.role {
            Role::User => {
                self.store
                    .bounded(self.store.bookings.list_for_user(&principal.id))
                    .await?
            }
            Role::Photographer => {
                self.store
                    .bounded(self.store.bookings.list_for_photographer(&principal.id))
                    .await?
            }
            Role::Admin => {
                return Err(MarketplaceError::Forbidden(
                    "Invalid role for this endpoint".to_string(),
                ))
            }
        };
        self.enrich(bookings).await
    }

    pub async fn all(&self, principal: &Principal) -> Result<Vec<BookingView>, MarketplaceError> {
        principal.require_admin()?;
        let bookings = self.store.bounded(self.store.bookings.list()).await?;
        self.enrich(bookings).await
    }

    pub async fn set_status(
        &self,
        principal: &Principal,
        booking_id: &str,
        status: &str,
    ) -> Result<Booking, MarketplaceError> {
        let status = BookingStatus::parse(status).ok_or_else(|| {
            MarketplaceError::InvalidArgument(format!(
                "Invalid status '{status}'. Must be one of pending, approved, rejected, cancelled"
            ))
        })?;

        let booking = self
            .store
            .bounded(self.store.bookings.get(booking_id))
            .await?
            .ok_or_else(booking_missing)?;

        let authorized = match principal.role {
            Role::Photographer => booking.photographer_id == principal.id,
            Role::User => booking.user_id == principal.id,
            Role::Admin => true,
        };
        if !authorized {
            return Err(MarketplaceError::Forbidden("Not authorized".to_string()));
        }

        let updated = self
            .store
            .bounded(self.store.bookings.update_status(booking_id, status))
            .await?
            .ok_or_else(booking_missing)?;
        info!(booking_id, ?status, actor = %principal.id, "booking status changed");
        Ok(updated)
    }

    async fn enrich(&self, bookings: Vec<Booking>) -> Result<Vec<BookingView>, MarketplaceError> {
        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let (photographer, photographer_profile, user, package) = tokio::try_join!(
                self.store.bounded(self.store.users.get(&booking.photographer_id)),
                self.store
                    .bounded(self.store.profiles.get_by_user(&booking.photographer_id)),
                self.store.bounded(self.store.users.get(&booking.user_id)),
                self.store.bounded(self.store.packages.get(&booking.package_id)),
            )?;

            views.push(BookingView {
                photographer: photographer.map(|u| u.public()),
                photographer_profile,
                user: user.map(|u| u.public()),
                package,
                booking,
            });
        }
        Ok(views)
    }
}

fn booking_missing() -> MarketplaceError {
    MarketplaceError::NotFound("Booking not found".to_string())
}

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::auth::Principal;
use super::domain::{
    new_record_id, AboutMe, AboutMeDraft, AboutMePatch, ApprovalStatus, PhotographerProfile,
    ProfileDraft, ProfilePatch, PublicUser, Role,
};
use super::error::MarketplaceError;
use crate::store::{Store, StoreError};

/// Profile joined with the owning account.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub profile: PhotographerProfile,
    pub user: PublicUser,
}

/// Photographer profiles, their approval lifecycle, and the about-me block.
#[derive(Clone)]
pub struct ProfileService {
    store: Store,
}

impl ProfileService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        draft: ProfileDraft,
    ) -> Result<PhotographerProfile, MarketplaceError> {
        principal.require_role(Role::Photographer, "Only photographers can create profiles")?;

        let profile = PhotographerProfile {
            id: new_record_id(),
            user_id: principal.id.clone(),
            bio: draft.bio,
            specialties: draft.specialties,
            experience_years: draft.experience_years,
            phone: draft.phone,
            location: draft.location,
            profile_image: draft.profile_image,
            cover_image: draft.cover_image,
            approval_status: ApprovalStatus::Pending,
            average_rating: 0.0,
            created_at: Utc::now(),
        };

        match self.store.bounded(self.store.profiles.insert(profile)).await {
            Ok(stored) => {
                info!(user_id = %stored.user_id, "photographer profile submitted for approval");
                Ok(stored)
            }
            Err(StoreError::Conflict) => Err(MarketplaceError::Conflict(
                "Profile already exists".to_string(),
            )),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn mine(&self, principal: &Principal) -> Result<PhotographerProfile, MarketplaceError> {
        self.get(&principal.id).await
    }

    pub async fn get(&self, user_id: &str) -> Result<PhotographerProfile, MarketplaceError> {
        self.store
            .bounded(self.store.profiles.get_by_user(user_id))
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("Profile not found".to_string()))
    }

    pub async fn update(
        &self,
        principal: &Principal,
        patch: ProfilePatch,
    ) -> Result<PhotographerProfile, MarketplaceError> {
        principal.require_role(Role::Photographer, "Only photographers can update profiles")?;
        if patch.is_empty() {
            return Err(MarketplaceError::InvalidArgument(
                "No update data provided".to_string(),
            ));
        }

        let mut profile = self.get(&principal.id).await?;
        patch.apply(&mut profile);
        self.store
            .bounded(self.store.profiles.update(profile.clone()))
            .await?;
        Ok(profile)
    }

    /// Approved photographers for the public directory.
    pub async fn approved(&self) -> Result<Vec<ProfileListing>, MarketplaceError> {
        self.listings(ApprovalStatus::Approved).await
    }

    pub async fn pending(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ProfileListing>, MarketplaceError> {
        principal.require_admin()?;
        self.listings(ApprovalStatus::Pending).await
    }

    async fn listings(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<ProfileListing>, MarketplaceError> {
        let profiles = self
            .store
            .bounded(self.store.profiles.list_by_status(status))
            .await?;

        let mut listings = Vec::with_capacity(profiles.len());
        for profile in profiles {
            // Profiles whose account vanished are left out of the listing.
            if let Some(user) = self
                .store
                .bounded(self.store.users.get(&profile.user_id))
                .await?
            {
                listings.push(ProfileListing {
                    profile,
                    user: user.public(),
                });
            }
        }
        Ok(listings)
    }

    pub async fn set_approval(
        &self,
        principal: &Principal,
        user_id: &str,
        status: ApprovalStatus,
    ) -> Result<PhotographerProfile, MarketplaceError> {
        principal.require_admin()?;
        let mut profile = self
            .store
            .bounded(self.store.profiles.get_by_user(user_id))
            .await?
            .ok_or_else(|| MarketplaceError::NotFound("Photographer not found".to_string()))?;

        profile.approval_status = status;
        self.store
            .bounded(self.store.profiles.update(profile.clone()))
            .await?;
        info!(user_id, ?status, admin_id = %principal.id, "photographer approval updated");
        Ok(profile)
    }

    pub async fn create_about_me(
        &self,
        principal: &Principal,
        draft: AboutMeDraft,
    ) -> Result<AboutMe, MarketplaceError> {
        ensure_owner(principal, &draft.user_id)?;

        let about = AboutMe {
            id: new_record_id(),
            user_id: draft.user_id,
            country: draft.country,
            languages: draft.languages,
            about: draft.about,
            social_links: draft.social_links,
        };

        match self.store.bounded(self.store.about_me.insert(about)).await {
            Ok(stored) => Ok(stored),
            Err(StoreError::Conflict) => Err(MarketplaceError::Conflict(
                "About Me profile already exists for this user".to_string(),
            )),
            Err(other) => Err(other.into()),
        }
    }

    pub async fn about_me(&self, user_id: &str) -> Result<AboutMe, MarketplaceError> {
        self.store
            .bounded(self.store.about_me.get_by_user(user_id))
            .await?
            .ok_or_else(about_me_missing)
    }

    pub async fn update_about_me(
        &self,
        principal: &Principal,
        user_id: &str,
        patch: AboutMePatch,
    ) -> Result<AboutMe, MarketplaceError> {
        ensure_owner(principal, user_id)?;
        let mut about = self.about_me(user_id).await?;
        if patch.is_empty() {
            return Err(MarketplaceError::InvalidArgument(
                "No valid fields to update".to_string(),
            ));
        }

        patch.apply(&mut about);
        self.store
            .bounded(self.store.about_me.update(about.clone()))
            .await?;
        Ok(about)
    }

    pub async fn delete_about_me(
        &self,
        principal: &Principal,
        user_id: &str,
    ) -> Result<(), MarketplaceError> {
        ensure_owner(principal, user_id)?;
        let removed = self
            .store
            .bounded(self.store.about_me.delete_by_user(user_id))
            .await?;
        if removed {
            Ok(())
        } else {
            Err(about_me_missing())
        }
    }
}

fn about_me_missing() -> MarketplaceError {
    MarketplaceError::NotFound("About Me profile not found".to_string())
}

fn ensure_owner(principal: &Principal, user_id: &str) -> Result<(), MarketplaceError> {
    if principal.id == user_id || principal.is_admin() {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden("Not authorized".to_string()))
    }
}

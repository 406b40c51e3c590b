use chrono::Utc;
use tracing::info;

use super::auth::Principal;
use super::domain::{new_record_id, PublicUser, Registration, Role, User};
use super::error::MarketplaceError;
use crate::store::{Store, StoreError};

/// Registration and lookup of marketplace accounts.
#[derive(Clone)]
pub struct AccountService {
    store: Store,
}

impl AccountService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn register(&self, registration: Registration) -> Result<PublicUser, MarketplaceError> {
        let Registration {
            email,
            full_name,
            role,
            password_hash,
        } = registration;

        let role = Role::parse(&role).ok_or_else(|| {
            MarketplaceError::InvalidArgument(format!(
                "Invalid role '{role}'. Must be one of user, photographer, admin"
            ))
        })?;
        let email = email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(MarketplaceError::InvalidArgument(
                "A valid email address is required".to_string(),
            ));
        }

        let user = User {
            id: new_record_id(),
            email,
            full_name,
            role,
            password_hash,
            restriction: None,
            created_at: Utc::now(),
        };

        let stored = match self.store.bounded(self.store.users.insert(user)).await {
            Ok(stored) => stored,
            Err(StoreError::Conflict) => {
                return Err(MarketplaceError::Conflict(
                    "Email already registered".to_string(),
                ))
            }
            Err(other) => return Err(other.into()),
        };

        info!(user_id = %stored.id, role = stored.role.label(), "account registered");
        Ok(stored.public())
    }

    pub async fn get(&self, user_id: &str) -> Result<PublicUser, MarketplaceError> {
        self.store
            .bounded(self.store.users.get(user_id))
            .await?
            .map(|user| user.public())
            .ok_or_else(|| MarketplaceError::NotFound("User not found".to_string()))
    }

    pub async fn list(&self, principal: &Principal) -> Result<Vec<PublicUser>, MarketplaceError> {
        principal.require_admin()?;
        let users = self.store.bounded(self.store.users.list()).await?;
        Ok(users.iter().map(User::public).collect())
    }

    /// Resolve the authenticated caller. Unknown ids are rejected as unauthenticated.
    pub async fn principal(&self, user_id: &str) -> Result<Principal, MarketplaceError> {
        let user = self
            .store
            .bounded(self.store.users.get(user_id))
            .await?
            .ok_or_else(|| MarketplaceError::Unauthorized("User not found".to_string()))?;
        Ok(Principal::from(&user))
    }

    /// Resolve an acting admin passed by id rather than by session.
    pub async fn require_admin(&self, admin_id: &str) -> Result<Principal, MarketplaceError> {
        match self.store.bounded(self.store.users.get(admin_id)).await? {
            Some(user) if user.role == Role::Admin => Ok(Principal::from(&user)),
            _ => Err(MarketplaceError::admin_required()),
        }
    }
}

use super::error::MarketplaceError;
use crate::store::Store;

const DEFAULT_RESTRICTION_REASON: &str = "Policy violation";

/// Precondition check blocking restricted accounts.
#[derive(Clone)]
pub struct RestrictionGuard {
    store: Store,
}

impl RestrictionGuard {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Unknown users pass; restriction is a property of an existing account.
    pub async fn ensure_not_restricted(&self, user_id: &str) -> Result<(), MarketplaceError> {
        let user = self.store.bounded(self.store.users.get(user_id)).await?;
        match user.and_then(|user| user.restriction) {
            Some(restriction) => {
                let reason = if restriction.reason.trim().is_empty() {
                    DEFAULT_RESTRICTION_REASON
                } else {
                    restriction.reason.as_str()
                };
                Err(MarketplaceError::Forbidden(format!(
                    "Account restricted by admin: {reason}"
                )))
            }
            None => Ok(()),
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use super::domain::{Role, User};
use super::error::MarketplaceError;
use super::Marketplace;

/// Header carrying the caller id, set by the upstream authenticator.
pub const PRINCIPAL_HEADER: &str = "x-user-id";

/// Authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub restricted: bool,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), MarketplaceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(MarketplaceError::admin_required())
        }
    }

    pub fn require_role(&self, role: Role, message: &str) -> Result<(), MarketplaceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(MarketplaceError::Forbidden(message.to_string()))
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            restricted: user.is_restricted(),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<Marketplace>> for Principal {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        market: &Arc<Marketplace>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| MarketplaceError::Unauthorized("Missing credentials".to_string()))?;

        market.accounts.principal(user_id).await
    }
}

/// Interceptor for photographer-owned mutations: restricted accounts are turned away before the
/// handler runs.
pub async fn enforce_restrictions(
    State(market): State<Arc<Marketplace>>,
    principal: Principal,
    request: Request,
    next: Next,
) -> Result<Response, MarketplaceError> {
    if let Err(err) = market.guard.ensure_not_restricted(&principal.id).await {
        warn!(user_id = %principal.id, path = %request.uri().path(), "restricted account blocked");
        return Err(err);
    }
    Ok(next.run(request).await)
}

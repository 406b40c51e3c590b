use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// Failure taxonomy shared by every marketplace operation.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl MarketplaceError {
    pub fn status(&self) -> StatusCode {
        match self {
            MarketplaceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MarketplaceError::Forbidden(_) => StatusCode::FORBIDDEN,
            MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
            MarketplaceError::Conflict(_) => StatusCode::CONFLICT,
            MarketplaceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn admin_required() -> Self {
        MarketplaceError::Forbidden("Admin access required".to_string())
    }
}

impl From<StoreError> for MarketplaceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict => MarketplaceError::Conflict("record already exists".to_string()),
            StoreError::NotFound => MarketplaceError::NotFound("record not found".to_string()),
            other @ (StoreError::Timeout(_) | StoreError::Unavailable(_)) => {
                MarketplaceError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        if let MarketplaceError::Internal(detail) = &self {
            tracing::error!(%detail, "marketplace request failed");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_timeouts_surface_as_internal_errors() {
        let err = MarketplaceError::from(StoreError::Timeout(Duration::from_secs(3)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("exceeded"));
    }

    #[test]
    fn taxonomy_maps_to_http_status() {
        let cases = [
            (MarketplaceError::InvalidArgument("x".into()), 400),
            (MarketplaceError::Unauthorized("x".into()), 401),
            (MarketplaceError::Forbidden("x".into()), 403),
            (MarketplaceError::NotFound("x".into()), 404),
            (MarketplaceError::Conflict("x".into()), 409),
            (MarketplaceError::from(StoreError::Unavailable("down".into())), 500),
        ];
        for (err, code) in cases {
            assert_eq!(err.into_response().status().as_u16(), code);
        }
    }
}

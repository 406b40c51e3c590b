use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::marketplace::auth::{Principal, PRINCIPAL_HEADER};
use crate::marketplace::domain::{
    ApprovalStatus, Notification, PackageDraft, PackageKind, PortfolioDraft, ProfileDraft,
    Registration, Report, ReportSubmission, Role,
};
use crate::marketplace::Marketplace;
use crate::store::{NotificationRepository, Store, StoreError};

pub(super) fn store() -> Store {
    Store::in_memory(&StoreConfig::default())
}

pub(super) fn marketplace() -> (Marketplace, Store) {
    let store = store();
    (Marketplace::new(store.clone()), store)
}

pub(super) async fn register(market: &Marketplace, email: &str, role: Role) -> Principal {
    let user = market
        .accounts
        .register(Registration {
            email: email.to_string(),
            full_name: format!("{} account", role.label()),
            role: role.label().to_string(),
            password_hash: "$argon2id$fixture".to_string(),
        })
        .await
        .expect("registration succeeds");
    market
        .accounts
        .principal(&user.id)
        .await
        .expect("principal resolves")
}

pub(super) fn profile_draft() -> ProfileDraft {
    ProfileDraft {
        bio: "Weddings and portraits around the harbour".to_string(),
        specialties: vec!["wedding".to_string(), "portrait".to_string()],
        experience_years: 6,
        phone: "+64 21 555 0101".to_string(),
        location: "Wellington".to_string(),
        profile_image: None,
        cover_image: None,
    }
}

pub(super) fn portfolio_draft() -> PortfolioDraft {
    PortfolioDraft {
        category: "wedding".to_string(),
        title: "Oriental Bay ceremony".to_string(),
        description: "Golden hour vows".to_string(),
        image_url: "https://cdn.example.test/p/1.jpg".to_string(),
    }
}

pub(super) fn package_draft() -> PackageDraft {
    PackageDraft {
        name: "Half day".to_string(),
        kind: PackageKind::Predefined,
        category: "wedding".to_string(),
        description: "Four hours of coverage".to_string(),
        price: 850.0,
        duration: "4 hours".to_string(),
        deliverables: vec!["120 edited photos".to_string()],
    }
}

/// A photographer with an approved profile and one portfolio item.
pub(super) async fn approved_photographer(
    market: &Marketplace,
    admin: &Principal,
    email: &str,
) -> Principal {
    let photographer = register(market, email, Role::Photographer).await;
    market
        .profiles
        .create(&photographer, profile_draft())
        .await
        .expect("profile created");
    market
        .profiles
        .set_approval(admin, &photographer.id, ApprovalStatus::Approved)
        .await
        .expect("profile approved");
    market
        .catalog
        .add_portfolio_item(&photographer, portfolio_draft())
        .await
        .expect("portfolio item added");
    photographer
}

pub(super) async fn file_report(
    market: &Marketplace,
    reporter: &Principal,
    photographer: &Principal,
    reason: &str,
) -> Report {
    market
        .reports
        .submit(ReportSubmission {
            user_id: reporter.id.clone(),
            photographer_id: photographer.id.clone(),
            reason: reason.to_string(),
            description: Some("Asked for payment off-platform".to_string()),
        })
        .await
        .expect("report submitted")
}

/// Cast of accounts most moderation scenarios need.
pub(super) struct Cast {
    pub(super) admin: Principal,
    pub(super) client: Principal,
    pub(super) photographer: Principal,
}

pub(super) async fn cast(market: &Marketplace) -> Cast {
    let admin = register(market, "admin@lens.test", Role::Admin).await;
    let client = register(market, "client@lens.test", Role::User).await;
    let photographer = approved_photographer(market, &admin, "shooter@lens.test").await;
    Cast {
        admin,
        client,
        photographer,
    }
}

pub(super) fn request(method: &str, uri: &str, caller: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(PRINCIPAL_HEADER, caller);
    }
    match body {
        Some(payload) => builder
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_error(response: Response, status: StatusCode, message: &str) {
    assert_eq!(response.status(), status);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], Value::String(message.to_string()));
}

/// Notification log that rejects every write.
pub(super) struct UnavailableNotifications;

#[async_trait]
impl NotificationRepository for UnavailableNotifications {
    async fn append(&self, _notification: Notification) -> Result<Notification, StoreError> {
        Err(StoreError::Unavailable("notification log offline".to_string()))
    }

    async fn list_for_reporter(&self, _reporter_id: &str) -> Result<Vec<Notification>, StoreError> {
        Err(StoreError::Unavailable("notification log offline".to_string()))
    }

    async fn list_for_photographer(
        &self,
        _photographer_id: &str,
    ) -> Result<Vec<Notification>, StoreError> {
        Err(StoreError::Unavailable("notification log offline".to_string()))
    }
}

pub(super) fn store_without_notifications() -> Store {
    let mut store = store();
    store.notifications = Arc::new(UnavailableNotifications);
    store
}

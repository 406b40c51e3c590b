use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::auth::{enforce_restrictions, Principal};
use super::bookings::BookingView;
use super::domain::{
    AboutMe, AboutMeDraft, AboutMePatch, ApprovalStatus, Booking, BookingDraft, Notification,
    Package, PackageDraft, PhotographerProfile, PortfolioDraft, PortfolioItem, ProfileDraft,
    ProfilePatch, PublicUser, Registration, ReportSubmission, ReviewSubmission,
};
use super::error::MarketplaceError;
use super::insights::{PhotographerDossier, PlatformStats};
use super::profiles::ProfileListing;
use super::reports::{EnrichedReport, ModerationOutcome, ReportView};
use super::reviews::{ReviewReceipt, ReviewView};
use super::Marketplace;

type Market = State<Arc<Marketplace>>;
type Reply<T> = Result<Json<T>, MarketplaceError>;

/// Router builder exposing the marketplace API under `/api`.
///
/// Photographer-owned mutations run behind [`enforce_restrictions`].
pub fn marketplace_router(market: Arc<Marketplace>) -> Router {
    let restricted = middleware::from_fn_with_state(market.clone(), enforce_restrictions);

    let api = Router::new()
        .route("/users", post(register))
        .route("/users/me", get(current_user))
        .route("/admin/users", get(list_users))
        .route(
            "/photographer/profile",
            post(create_profile)
                .put(update_profile)
                .route_layer(restricted.clone()),
        )
        .route("/photographer/profile/me", get(my_profile))
        .route("/photographer/profile/:user_id", get(profile))
        .route("/photographers", get(approved_photographers))
        .route("/admin/photographers/pending", get(pending_photographers))
        .route(
            "/admin/photographers/:user_id/approval",
            put(set_approval),
        )
        .route(
            "/admin/photographers/:user_id/full",
            get(photographer_full),
        )
        .route(
            "/about-me",
            post(create_about_me).route_layer(restricted.clone()),
        )
        .route(
            "/about-me/:user_id",
            get(about_me).merge(
                put(update_about_me)
                    .delete(delete_about_me)
                    .route_layer(restricted.clone()),
            ),
        )
        .route(
            "/portfolio",
            post(add_portfolio_item).route_layer(restricted.clone()),
        )
        .route("/portfolio/my", get(my_portfolio))
        .route("/portfolio/photographer/:user_id", get(portfolio_for))
        .route(
            "/portfolio/:item_id",
            delete(delete_portfolio_item).route_layer(restricted.clone()),
        )
        .route(
            "/packages",
            post(create_package).route_layer(restricted.clone()),
        )
        .route("/packages/my", get(my_packages))
        .route("/packages/photographer/:user_id", get(packages_for))
        .route(
            "/packages/:package_id",
            delete(delete_package).route_layer(restricted.clone()),
        )
        .route("/bookings", post(create_booking))
        .route("/bookings/my", get(my_bookings))
        .route(
            "/bookings/:booking_id/status",
            put(set_booking_status).route_layer(restricted),
        )
        .route("/admin/bookings", get(all_bookings))
        .route("/reviews", post(submit_review))
        .route("/reviews/:photographer_id", get(reviews_for))
        .route("/admin/reviews", get(all_reviews))
        .route("/reports", post(submit_report))
        .route("/reports/reasons", get(report_reasons))
        .route("/reports/pending", get(pending_reports))
        .route("/reports/:report_id/moderate", put(moderate_report))
        .route("/reports/photographer/:user_id", get(reports_for))
        .route("/notifications/user/:user_id", get(reporter_notifications))
        .route(
            "/notifications/photographer/:user_id",
            get(photographer_notifications),
        )
        .route("/admin/stats", get(stats));

    Router::new().nest("/api", api).with_state(market)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApprovalUpdate {
    pub(crate) approval_status: ApprovalStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingStatusUpdate {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModerationParams {
    pub(crate) action: String,
    pub(crate) admin_id: String,
}

fn acknowledged(message: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": message }))
}

async fn register(
    State(market): Market,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<PublicUser>), MarketplaceError> {
    let user = market.accounts.register(registration).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn current_user(State(market): Market, principal: Principal) -> Reply<PublicUser> {
    Ok(Json(market.accounts.get(&principal.id).await?))
}

async fn list_users(State(market): Market, principal: Principal) -> Reply<Vec<PublicUser>> {
    Ok(Json(market.accounts.list(&principal).await?))
}

async fn create_profile(
    State(market): Market,
    principal: Principal,
    Json(draft): Json<ProfileDraft>,
) -> Reply<PhotographerProfile> {
    Ok(Json(market.profiles.create(&principal, draft).await?))
}

async fn update_profile(
    State(market): Market,
    principal: Principal,
    Json(patch): Json<ProfilePatch>,
) -> Reply<PhotographerProfile> {
    Ok(Json(market.profiles.update(&principal, patch).await?))
}

async fn my_profile(State(market): Market, principal: Principal) -> Reply<PhotographerProfile> {
    Ok(Json(market.profiles.mine(&principal).await?))
}

async fn profile(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<PhotographerProfile> {
    Ok(Json(market.profiles.get(&user_id).await?))
}

async fn approved_photographers(State(market): Market) -> Reply<Vec<ProfileListing>> {
    Ok(Json(market.profiles.approved().await?))
}

async fn pending_photographers(
    State(market): Market,
    principal: Principal,
) -> Reply<Vec<ProfileListing>> {
    Ok(Json(market.profiles.pending(&principal).await?))
}

async fn set_approval(
    State(market): Market,
    principal: Principal,
    Path(user_id): Path<String>,
    Json(update): Json<ApprovalUpdate>,
) -> Reply<PhotographerProfile> {
    let profile = market
        .profiles
        .set_approval(&principal, &user_id, update.approval_status)
        .await?;
    Ok(Json(profile))
}

async fn photographer_full(
    State(market): Market,
    principal: Principal,
    Path(user_id): Path<String>,
) -> Reply<PhotographerDossier> {
    Ok(Json(
        market.insights.photographer_full(&principal, &user_id).await?,
    ))
}

async fn create_about_me(
    State(market): Market,
    principal: Principal,
    Json(draft): Json<AboutMeDraft>,
) -> Reply<AboutMe> {
    Ok(Json(market.profiles.create_about_me(&principal, draft).await?))
}

async fn about_me(State(market): Market, Path(user_id): Path<String>) -> Reply<AboutMe> {
    Ok(Json(market.profiles.about_me(&user_id).await?))
}

async fn update_about_me(
    State(market): Market,
    principal: Principal,
    Path(user_id): Path<String>,
    Json(patch): Json<AboutMePatch>,
) -> Reply<AboutMe> {
    let about = market
        .profiles
        .update_about_me(&principal, &user_id, patch)
        .await?;
    Ok(Json(about))
}

async fn delete_about_me(
    State(market): Market,
    principal: Principal,
    Path(user_id): Path<String>,
) -> Result<Response, MarketplaceError> {
    market.profiles.delete_about_me(&principal, &user_id).await?;
    Ok(acknowledged("About Me profile deleted successfully").into_response())
}

async fn add_portfolio_item(
    State(market): Market,
    principal: Principal,
    Json(draft): Json<PortfolioDraft>,
) -> Reply<PortfolioItem> {
    Ok(Json(
        market.catalog.add_portfolio_item(&principal, draft).await?,
    ))
}

async fn my_portfolio(State(market): Market, principal: Principal) -> Reply<Vec<PortfolioItem>> {
    Ok(Json(market.catalog.portfolio_for(&principal.id).await?))
}

async fn portfolio_for(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<Vec<PortfolioItem>> {
    Ok(Json(market.catalog.portfolio_for(&user_id).await?))
}

async fn delete_portfolio_item(
    State(market): Market,
    principal: Principal,
    Path(item_id): Path<String>,
) -> Result<Response, MarketplaceError> {
    market
        .catalog
        .delete_portfolio_item(&principal, &item_id)
        .await?;
    Ok(acknowledged("Portfolio item deleted").into_response())
}

async fn create_package(
    State(market): Market,
    principal: Principal,
    Json(draft): Json<PackageDraft>,
) -> Reply<Package> {
    Ok(Json(market.catalog.create_package(&principal, draft).await?))
}

async fn my_packages(State(market): Market, principal: Principal) -> Reply<Vec<Package>> {
    Ok(Json(market.catalog.packages_for(&principal.id).await?))
}

async fn packages_for(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<Vec<Package>> {
    Ok(Json(market.catalog.packages_for(&user_id).await?))
}

async fn delete_package(
    State(market): Market,
    principal: Principal,
    Path(package_id): Path<String>,
) -> Result<Response, MarketplaceError> {
    market.catalog.delete_package(&principal, &package_id).await?;
    Ok(acknowledged("Package deleted").into_response())
}

async fn create_booking(
    State(market): Market,
    principal: Principal,
    Json(draft): Json<BookingDraft>,
) -> Reply<Booking> {
    Ok(Json(market.bookings.create(&principal, draft).await?))
}

async fn my_bookings(State(market): Market, principal: Principal) -> Reply<Vec<BookingView>> {
    Ok(Json(market.bookings.mine(&principal).await?))
}

async fn set_booking_status(
    State(market): Market,
    principal: Principal,
    Path(booking_id): Path<String>,
    Json(update): Json<BookingStatusUpdate>,
) -> Reply<Booking> {
    let booking = market
        .bookings
        .set_status(&principal, &booking_id, &update.status)
        .await?;
    Ok(Json(booking))
}

async fn all_bookings(State(market): Market, principal: Principal) -> Reply<Vec<BookingView>> {
    Ok(Json(market.bookings.all(&principal).await?))
}

async fn submit_review(
    State(market): Market,
    Json(submission): Json<ReviewSubmission>,
) -> Reply<ReviewReceipt> {
    Ok(Json(market.reviews.submit(submission).await?))
}

async fn reviews_for(
    State(market): Market,
    Path(photographer_id): Path<String>,
) -> Reply<Vec<ReviewView>> {
    Ok(Json(market.reviews.reviews_for(&photographer_id).await?))
}

async fn all_reviews(State(market): Market, principal: Principal) -> Reply<Vec<ReviewView>> {
    Ok(Json(market.reviews.all(&principal).await?))
}

pub(crate) async fn submit_report(
    State(market): Market,
    Json(submission): Json<ReportSubmission>,
) -> Result<Response, MarketplaceError> {
    let report = market.reports.submit(submission).await?;
    let payload = json!({
        "message": "Report submitted successfully",
        "report_id": report.id,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

async fn report_reasons(State(market): Market) -> Json<Vec<&'static str>> {
    Json(market.reports.reasons())
}

async fn pending_reports(
    State(market): Market,
    principal: Principal,
) -> Reply<Vec<EnrichedReport>> {
    Ok(Json(market.reports.pending(&principal).await?))
}

pub(crate) async fn moderate_report(
    State(market): Market,
    Path(report_id): Path<String>,
    Query(params): Query<ModerationParams>,
) -> Reply<ModerationOutcome> {
    let admin = market.accounts.require_admin(&params.admin_id).await?;
    let outcome = market
        .reports
        .moderate(&report_id, &params.action, &admin.id)
        .await?;
    Ok(Json(outcome))
}

async fn reports_for(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<Vec<ReportView>> {
    Ok(Json(market.reports.reports_for(&user_id).await?))
}

async fn reporter_notifications(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<Vec<Notification>> {
    Ok(Json(market.notifications.for_reporter(&user_id).await?))
}

async fn photographer_notifications(
    State(market): Market,
    Path(user_id): Path<String>,
) -> Reply<Vec<Notification>> {
    Ok(Json(market.notifications.for_photographer(&user_id).await?))
}

async fn stats(State(market): Market, principal: Principal) -> Reply<PlatformStats> {
    Ok(Json(market.insights.stats(&principal).await?))
}

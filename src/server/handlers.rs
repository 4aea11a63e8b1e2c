//! HTTP handlers for the marketplace
//!
//! Handlers stay thin: extract, call [`Marketplace`], wrap the result in
//! JSON. Every failure is a [`MarketError`] and renders as an
//! `ErrorResponse`.

use crate::config::MarketConfig;
use crate::core::error::MarketError;
use crate::core::query::PaginatedResponse;
use crate::core::validation::Validated;
use crate::entities::{Course, Enrollment, Principal, Vendor};
use crate::market::forms::{
    CourseStatusUpdate, CourseSubmission, LoginForm, SeafarerRegistration, VendorRegistration,
    VendorReview,
};
use crate::market::{DashboardView, Marketplace, Session, SessionManager};
use crate::server::extractors::{CurrentSession, TableQuery};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub market: Marketplace,
    pub sessions: SessionManager,
    pub config: Arc<MarketConfig>,
}

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "coursedeck"
    }))
}

// === Auth ===

pub async fn login(
    State(state): State<AppState>,
    Validated(form): Validated<LoginForm>,
) -> Result<Json<Session>, MarketError> {
    let session = state.sessions.login(&form.email, &form.password).await?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<StatusCode, MarketError> {
    state.sessions.logout(&session.token)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_seafarer(
    State(state): State<AppState>,
    Validated(form): Validated<SeafarerRegistration>,
) -> Result<(StatusCode, Json<Principal>), MarketError> {
    let principal = state.market.register_seafarer(form).await?;
    Ok((StatusCode::CREATED, Json(principal)))
}

pub async fn register_vendor(
    State(state): State<AppState>,
    Validated(form): Validated<VendorRegistration>,
) -> Result<(StatusCode, Json<Principal>), MarketError> {
    let principal = state.market.register_vendor(form).await?;
    Ok((StatusCode::CREATED, Json(principal)))
}

// === Catalog ===

/// `GET /courses?page=&limit=&search=&filter=&sort=`
pub async fn list_courses(
    State(state): State<AppState>,
    TableQuery(params): TableQuery,
) -> Result<Json<PaginatedResponse<Course>>, MarketError> {
    Ok(Json(state.market.catalog(&params).await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, MarketError> {
    Ok(Json(state.market.published_course(&id).await?))
}

pub async fn enroll(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Enrollment>), MarketError> {
    let enrollment = state.market.enroll(&session, &id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

// === Dashboard ===

pub async fn dashboard_overview(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<DashboardView>, MarketError> {
    Ok(Json(state.market.overview(&session).await?))
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(page): Path<String>,
    TableQuery(params): TableQuery,
) -> Result<Json<DashboardView>, MarketError> {
    Ok(Json(state.market.dashboard(&session, &page, &params).await?))
}

// === Vendor ===

pub async fn submit_course(
    State(state): State<AppState>,
    session: CurrentSession,
    Validated(form): Validated<CourseSubmission>,
) -> Result<(StatusCode, Json<Course>), MarketError> {
    let course = state.market.submit_course(&session, form).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

// === Admin ===

pub async fn review_vendor(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Validated(review): Validated<VendorReview>,
) -> Result<Json<Vendor>, MarketError> {
    Ok(Json(state.market.review_vendor(&session, &id, review).await?))
}

pub async fn set_course_status(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(id): Path<String>,
    Validated(update): Validated<CourseStatusUpdate>,
) -> Result<Json<Course>, MarketError> {
    Ok(Json(
        state.market.set_course_status(&session, &id, update).await?,
    ))
}
